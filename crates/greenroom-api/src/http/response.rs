//! Envelope response format for all API responses.
//!
//! Every success is `{"success": true, "data": ...}`, every failure
//! `{"success": false, "error": "..."}`. Failures are produced by
//! [`crate::http::error::AppError`]; this type only ever carries
//! successes.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
