//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Storage failures are logged with full detail but only a generic message
//! is returned, so SQL and file paths never reach clients.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use uuid::Uuid;

use chatty_types::error::ChatError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat history errors (validation or storage).
    Chat(ChatError),
    /// Request body missing, not JSON, or not the expected shape.
    InvalidBody(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::InvalidUserId(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", format!("Invalid user id: {msg}"))
            }
            AppError::Chat(ChatError::InvalidMessage(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", format!("Invalid message: {msg}"))
            }
            AppError::InvalidBody(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", format!("Invalid request body: {msg}"))
            }
            AppError::Chat(ChatError::Storage(e)) => {
                error!(error = %e, "Chat history storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Chat history storage is unavailable".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        ApiResponse::error(status, code, message, Uuid::now_v7().to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatty_types::error::RepositoryError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::from(ChatError::InvalidMessage("message must not be empty".into()));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_hides_details() {
        let err = AppError::from(ChatError::Storage(RepositoryError::Query(
            "no such table: chat_messages".into(),
        )));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "STORAGE_ERROR");
        assert!(!message.contains("chat_messages"));
    }
}
