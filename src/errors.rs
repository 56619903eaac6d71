use std::fmt::Display;

/// Failed request as reported by the server envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub status: u16,
    pub error: String,
}

#[derive(Debug)]
pub enum TodoError {
    ApiError(RequestError),
    HttpError(String),
    DecodeError(String),
    EmptyResponse,
}

pub type BaseError = Box<dyn std::error::Error>;

impl TodoError {
    /// Message shown to the user in notifications
    pub fn message(&self) -> String {
        match self {
            Self::ApiError(e) if !e.error.is_empty() => e.error.clone(),
            _ => self.to_string(),
        }
    }
}

impl Display for TodoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiError(e) => {
                write!(f, "Request failed with status {}: {}", e.status, e.error)
            }
            Self::HttpError(e) => {
                write!(f, "{}", e)
            }
            Self::DecodeError(e) => {
                write!(f, "Invalid response: {}", e)
            }
            Self::EmptyResponse => {
                write!(f, "Response carried no data")
            }
        }
    }
}

impl From<reqwest::Error> for TodoError {
    fn from(e: reqwest::Error) -> Self {
        TodoError::HttpError(e.to_string())
    }
}

impl From<serde_json::Error> for TodoError {
    fn from(e: serde_json::Error) -> Self {
        TodoError::DecodeError(e.to_string())
    }
}

impl std::error::Error for TodoError {}

#[cfg(test)]
mod test {
    use super::{RequestError, TodoError};

    #[test]
    fn test_message_prefers_server_error() {
        let err = TodoError::ApiError(RequestError {
            status: 404,
            error: "Todo with id 3 not found".into(),
        });

        assert_eq!(err.message(), "Todo with id 3 not found");
    }

    #[test]
    fn test_message_without_server_error() {
        let err = TodoError::ApiError(RequestError {
            status: 502,
            error: String::new(),
        });

        assert_eq!(err.message(), "Request failed with status 502: ");
        assert_eq!(TodoError::EmptyResponse.message(), "Response carried no data");
    }
}
