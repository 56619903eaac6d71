use actix_web::{
    error::{BlockingError, JsonPayloadError, PathError, QueryPayloadError},
    http, web, HttpRequest, HttpResponse, ResponseError,
};
use derive_more::Display;
use diesel::result::Error as DBError;

use super::dtos::response::ApiResponse;
use super::validation::FieldErrors;

pub const MALFORMED_BODY_MESSAGE: &str = "Malformed JSON or invalid request body";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Display)]
pub enum TodoApiError {
    #[display(fmt = "{}", INTERNAL_ERROR_MESSAGE)]
    InternalServerError,

    #[display(fmt = "Database connection error")]
    DatabaseConnectionError,

    #[display(fmt = "{}", _0)]
    Validation(FieldErrors),

    #[display(fmt = "{}", MALFORMED_BODY_MESSAGE)]
    MalformedBody,

    #[display(fmt = "{}", _0)]
    BadRequest(String),

    #[display(fmt = "Invalid date '{}', expected ISO-8601 local date-time", _0)]
    InvalidDate(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),
}

impl TodoApiError {
    pub fn todo_not_found(id: i64) -> Self {
        TodoApiError::NotFound(format!("Todo with id {} not found", id))
    }

    /// Message placed in the envelope, internal failures never leak their detail
    pub fn public_message(&self) -> String {
        match self {
            TodoApiError::InternalServerError | TodoApiError::DatabaseConnectionError => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl ResponseError for TodoApiError {
    fn status_code(&self) -> http::StatusCode {
        match self {
            TodoApiError::Validation(_)
            | TodoApiError::MalformedBody
            | TodoApiError::BadRequest(_)
            | TodoApiError::InvalidDate(_) => http::StatusCode::BAD_REQUEST,
            TodoApiError::NotFound(_) => http::StatusCode::NOT_FOUND,
            TodoApiError::InternalServerError | TodoApiError::DatabaseConnectionError => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ApiResponse::<()>::failure(self.public_message()))
    }
}

impl From<FieldErrors> for TodoApiError {
    fn from(errors: FieldErrors) -> Self {
        TodoApiError::Validation(errors)
    }
}

impl From<r2d2::Error> for TodoApiError {
    fn from(e: r2d2::Error) -> Self {
        log::error!("Could not get a database connection: {}", e);
        TodoApiError::DatabaseConnectionError
    }
}

impl From<DBError> for TodoApiError {
    fn from(error: DBError) -> Self {
        log::error!("Database error: {}", error);
        TodoApiError::InternalServerError
    }
}

impl From<BlockingError> for TodoApiError {
    fn from(e: BlockingError) -> Self {
        log::error!("Blocking task failed: {}", e);
        TodoApiError::InternalServerError
    }
}

/// Rejected JSON bodies share one fixed message
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        log::debug!("Rejected body for {} {}: {}", req.method(), req.path(), err);
        TodoApiError::MalformedBody.into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, req: &HttpRequest| {
        log::debug!("Rejected query for {}: {}", req.path(), err);
        TodoApiError::BadRequest("Invalid query parameters".to_string()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, req: &HttpRequest| {
        log::debug!("Rejected path {}: {}", req.path(), err);
        TodoApiError::BadRequest("Invalid todo id".to_string()).into()
    })
}

/// Fallback for routes that do not exist
pub async fn not_found() -> Result<HttpResponse, TodoApiError> {
    Err(TodoApiError::NotFound("Resource not found".to_string()))
}

#[cfg(test)]
mod test {
    use actix_web::{body::to_bytes, http::StatusCode, ResponseError};

    use super::{TodoApiError, MALFORMED_BODY_MESSAGE};
    use crate::api::validation::{FieldError, FieldErrors};

    async fn envelope(err: TodoApiError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_validation_error_joins_fields() {
        let err = TodoApiError::Validation(FieldErrors(vec![
            FieldError::new("title", "must not be blank"),
            FieldError::new("title", "size must be between 3 and 80"),
        ]));

        let (status, body) = envelope(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(
            body["error"],
            "title: must not be blank, title: size must be between 3 and 80"
        );
    }

    #[actix_web::test]
    async fn test_not_found_keeps_message() {
        let (status, body) = envelope(TodoApiError::todo_not_found(7)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Todo with id 7 not found");
    }

    #[actix_web::test]
    async fn test_internal_errors_are_opaque() {
        let (status, body) = envelope(TodoApiError::DatabaseConnectionError).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[actix_web::test]
    async fn test_malformed_body_message() {
        let (status, body) = envelope(TodoApiError::MalformedBody).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MALFORMED_BODY_MESSAGE);
        assert_eq!(TodoApiError::MalformedBody.to_string(), MALFORMED_BODY_MESSAGE);
    }

    #[actix_web::test]
    async fn test_invalid_date_names_input() {
        let (status, body) = envelope(TodoApiError::InvalidDate("yesterday".into())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("yesterday"));
    }
}
