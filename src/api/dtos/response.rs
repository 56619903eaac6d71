use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// Envelope every endpoint answers with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Successful response without payload, used by deletes
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn failure<M: Into<String>>(message: M) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

pub trait ToSuccessResponse {
    /// `200 OK` with `self` wrapped in a successful envelope
    fn to_success_response(self) -> HttpResponse;
}

impl<T: Serialize> ToSuccessResponse for T {
    fn to_success_response(self) -> HttpResponse {
        HttpResponse::Ok().json(ApiResponse::success(self))
    }
}
