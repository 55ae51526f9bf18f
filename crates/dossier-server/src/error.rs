//! API error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use dossier_core::GateError;

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    /// Refused by the auth gate or rate limiter.
    Gate(GateError),
    /// Malformed request body (empty query or text).
    Validation(String),
    /// Pipeline or backend failure, surfaced as a 500 with the raw message.
    Internal(String),
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        Self::Gate(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Gate(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let body = match err.retry_after_secs() {
                    Some(retry_after) => json!({
                        "error": "Rate limit exceeded",
                        "message": err.to_string(),
                        "retry_after": retry_after,
                    }),
                    None => json!({ "detail": err.to_string() }),
                };
                (status, Json(body)).into_response()
            }
            Self::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": message })),
            )
                .into_response(),
            Self::Internal(message) => {
                error!(%message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": message })),
                )
                    .into_response()
            }
        }
    }
}
