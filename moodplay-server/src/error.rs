//! Error types for moodplay-server HTTP handlers

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body missing, not JSON, or of the wrong shape
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// No route for the requested path (404)
    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::InvalidBody(rejection) => {
                warn!("Rejected request body: {}", rejection.body_text());
                (rejection.status(), "INVALID_BODY", rejection.body_text())
            }
            ApiError::NotFound(path) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("No route for {}", path),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
