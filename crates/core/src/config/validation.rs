//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Upper bound the upstream accepts for a product `limit`.
const MAX_UPSTREAM_LIMIT: usize = 100;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_products` is 0 or exceeds the upstream limit of 100
    /// - `max_categories` is 0
    /// - `min_query_chars` is 0
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `category_ttl_secs` is 0
    /// - `api_base_url` is not an http(s) URL
    /// - `user_agent` or `service_name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_products == 0 || self.max_products > MAX_UPSTREAM_LIMIT {
            return Err(ConfigError::Invalid {
                field: "max_products".into(),
                reason: format!("must be between 1 and {MAX_UPSTREAM_LIMIT}"),
            });
        }

        if self.max_categories == 0 {
            return Err(ConfigError::Invalid {
                field: "max_categories".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.min_query_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "min_query_chars".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.category_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "category_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                field: "api_base_url".into(),
                reason: "must be an http(s) URL".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.service_name.is_empty() {
            return Err(ConfigError::Invalid { field: "service_name".into(), reason: "must not be empty".into() });
        }

        if self.allowed_origin.as_deref().is_none_or(|o| o.trim().is_empty()) {
            tracing::warn!("allowed_origin is not set; CORS will accept every origin");
        }

        Ok(())
    }
}
