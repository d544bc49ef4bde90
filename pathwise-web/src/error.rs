//! Error types for pathwise-web

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pathwise_common::Error;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// pathwise-common error, mapped by kind
    #[error(transparent)]
    Common(#[from] Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Common(err) => match err {
                Error::InvalidInterestPair { .. } => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_INTEREST_PAIR",
                    "Invalid second interest selected. Please choose a valid option.".to_string(),
                ),
                Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg),
                Error::Conflict(msg) => (StatusCode::BAD_REQUEST, "CONFLICT", msg),
                Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
                other => {
                    error!("Request failed: {}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        other.to_string(),
                    )
                }
            },
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
