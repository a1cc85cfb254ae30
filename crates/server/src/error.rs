//! Structured errors for the search proxy.
//!
//! Each variant maps to one HTTP status and a small JSON body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use livesearch_client::CommerceError;
use serde_json::json;

/// Structured errors for the search proxy.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Request origin rejected by the strict CORS policy.
    #[error("CORS blocked")]
    CorsBlocked,

    /// Query string that could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unknown path.
    #[error("Not found")]
    NotFound,

    /// Upstream or configuration failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CommerceError> for ProxyError {
    fn from(err: CommerceError) -> Self {
        ProxyError::Internal(err.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ProxyError::CorsBlocked => (StatusCode::FORBIDDEN, json!({ "error": "CORS blocked" })),
            ProxyError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": "Bad request", "message": message }))
            }
            ProxyError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Not found" })),
            ProxyError::Internal(message) => {
                tracing::error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal error", "message": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}
