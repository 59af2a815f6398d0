//! Application error type mapping to HTTP status codes and the
//! `{"success": false, "error": ...}` envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use greenroom_core::notify::NotifyError;
use greenroom_types::error::{MessagingError, RepositoryError};

#[derive(Debug)]
pub enum AppError {
    Repository(RepositoryError),
    Messaging(MessagingError),
    /// Missing/invalid bearer token.
    Unauthorized(String),
    /// Entity absent or outside the caller's team.
    NotFound,
    /// Bad request payload or a domain rule violation.
    Validation(String),
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<MessagingError> for AppError {
    fn from(e: MessagingError) -> Self {
        AppError::Messaging(e)
    }
}

impl From<NotifyError> for AppError {
    fn from(e: NotifyError) -> Self {
        match e {
            NotifyError::Repository(e) => AppError::Repository(e),
            NotifyError::Messaging(e) => AppError::Messaging(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Repository(RepositoryError::NotFound) => {
                (StatusCode::NOT_FOUND, "not found".to_string())
            }
            AppError::Repository(RepositoryError::Conflict(msg)) => {
                (StatusCode::CONFLICT, msg.clone())
            }
            AppError::Repository(e) => {
                error!(%e, "repository error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
            AppError::Messaging(e) => {
                error!(%e, "messaging error");
                (StatusCode::BAD_GATEWAY, "messaging API error".to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                error!(message = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::Repository(RepositoryError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_400() {
        let response = AppError::Validation("bad date".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
