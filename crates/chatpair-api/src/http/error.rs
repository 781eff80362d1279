//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatpair_types::error::MessageError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Message-related errors.
    Message(MessageError),
    /// Request body or path could not be parsed.
    Validation(String),
}

impl From<MessageError> for AppError {
    fn from(e: MessageError) -> Self {
        AppError::Message(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Message(MessageError::NotFound) => (
                StatusCode::NOT_FOUND,
                "MESSAGE_NOT_FOUND",
                "Message not found".to_string(),
            ),
            AppError::Message(MessageError::ParentNotFound) => (
                StatusCode::NOT_FOUND,
                "MESSAGE_NOT_FOUND",
                "Parent message not found".to_string(),
            ),
            AppError::Message(MessageError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            AppError::Message(MessageError::InvalidContent(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Message(e @ MessageError::StorageError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", e.to_string())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, %message, "Request failed");
        }

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }],
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
