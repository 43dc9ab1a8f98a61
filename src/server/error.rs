//! HTTP error responses

use crate::domain::VigilError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors surfaced at the HTTP boundary
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong bearer credential
    #[error("Unauthorized")]
    Unauthorized,

    /// Any failure while moderating
    #[error("Internal server error: {0}")]
    Internal(#[from] VigilError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::Internal(e) => {
                crate::log_error_with_context!(e, "Moderation request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
