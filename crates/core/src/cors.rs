//! Cross-origin policy for the proxy.
//!
//! Two modes:
//! - No allow-list configured: every origin is accepted and answered with `*`.
//!   This is a deliberate permissive default for first deployments.
//! - Strict origin configured: only that exact origin is echoed back; any
//!   other request is answered with the sentinel `null` origin.

/// Header value sent to callers that fail the strict check.
pub const BLOCKED_ORIGIN: &str = "null";

/// Origin policy resolved once from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorsPolicy {
    allowed: Option<String>,
}

/// Outcome of checking one request's `Origin` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// Permissive mode.
    Any,
    /// Strict mode, request origin matched.
    Exact(String),
    /// Strict mode, request origin missing or different.
    Blocked,
}

impl CorsPolicy {
    /// Build a policy. Blank strings count as "not configured".
    pub fn new(allowed_origin: Option<&str>) -> Self {
        let allowed = allowed_origin.map(str::trim).filter(|o| !o.is_empty()).map(str::to_string);
        Self { allowed }
    }

    pub fn is_strict(&self) -> bool {
        self.allowed.is_some()
    }

    pub fn decide(&self, request_origin: Option<&str>) -> OriginDecision {
        match &self.allowed {
            None => OriginDecision::Any,
            Some(allowed) if request_origin == Some(allowed.as_str()) => OriginDecision::Exact(allowed.clone()),
            Some(_) => OriginDecision::Blocked,
        }
    }
}

impl OriginDecision {
    /// Value for `Access-Control-Allow-Origin`.
    pub fn header_value(&self) -> &str {
        match self {
            OriginDecision::Any => "*",
            OriginDecision::Exact(origin) => origin,
            OriginDecision::Blocked => BLOCKED_ORIGIN,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, OriginDecision::Blocked)
    }
}
