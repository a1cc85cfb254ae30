//! Unified error types for live-search.

/// Unified error types shared by the proxy client and the widget port.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a malformed proxy base URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Store id or API token absent from the process configuration.
    #[error("MISSING_CREDENTIALS: {0}")]
    MissingCredentials(String),

    /// The remote side answered with a non-success status.
    #[error("UPSTREAM_ERROR: HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Network failure or undecodable response body.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),
}
