//! Commerce API client error types.

use std::sync::Arc;

/// Maximum number of body characters kept in an error message.
pub(crate) const ERROR_BODY_CHARS: usize = 300;

/// Errors from the commerce API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CommerceError {
    /// Store id or token not configured.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Non-success response from the API.
    #[error("commerce API error {status}: {body}")]
    HttpError { status: u16, body: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CommerceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { CommerceError::Timeout } else { CommerceError::Network(Arc::new(err)) }
    }
}

impl From<CommerceError> for livesearch_core::Error {
    fn from(err: CommerceError) -> Self {
        match err {
            CommerceError::MissingCredentials(msg) => livesearch_core::Error::MissingCredentials(msg),
            CommerceError::HttpError { status, body } => livesearch_core::Error::Upstream { status, message: body },
            other => livesearch_core::Error::Transport(other.to_string()),
        }
    }
}

/// Keep the head of an error body, counted in characters.
pub(crate) fn truncate_body(body: &str) -> String {
    body.chars().take(ERROR_BODY_CHARS).collect()
}
