//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LIVE_SEARCH_*)
//! 2. TOML config file (if LIVE_SEARCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::cors::CorsPolicy;

mod validation;

pub use validation::ConfigError;

/// Default base URL of the upstream commerce API.
pub const DEFAULT_API_BASE_URL: &str = "https://app.ecwid.com/api/v3";

/// Proxy configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LIVE_SEARCH_*)
/// 2. TOML config file (if LIVE_SEARCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream store identifier.
    ///
    /// Set via LIVE_SEARCH_STORE_ID environment variable.
    /// Checked when an upstream call is made, not at startup.
    #[serde(default, deserialize_with = "string_or_number")]
    pub store_id: Option<String>,

    /// Upstream bearer token with catalog read scope.
    ///
    /// Set via LIVE_SEARCH_API_TOKEN environment variable.
    #[serde(default, deserialize_with = "string_or_number")]
    pub api_token: Option<String>,

    /// Strict CORS origin. When unset every origin is allowed.
    ///
    /// Set via LIVE_SEARCH_ALLOWED_ORIGIN environment variable.
    #[serde(default)]
    pub allowed_origin: Option<String>,

    /// Upstream API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Socket address the proxy listens on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Name reported by the liveness endpoint.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// User-Agent string for upstream requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upstream request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Category cache lifetime in seconds.
    #[serde(default = "default_category_ttl_secs")]
    pub category_ttl_secs: u64,

    /// Maximum products per response (also the upstream `limit`).
    #[serde(default = "default_max_products")]
    pub max_products: usize,

    /// Maximum categories per response.
    #[serde(default = "default_max_categories")]
    pub max_categories: usize,

    /// Minimum normalized query length before upstream is contacted.
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
}

/// Env values that look numeric arrive as integers; store ids usually do.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
    }))
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.into()
}

fn default_bind() -> String {
    "0.0.0.0:8787".into()
}

fn default_service_name() -> String {
    "live-search-proxy".into()
}

fn default_user_agent() -> String {
    "live-search/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_category_ttl_secs() -> u64 {
    6 * 60 * 60
}

fn default_max_products() -> usize {
    8
}

fn default_max_categories() -> usize {
    6
}

fn default_min_query_chars() -> usize {
    2
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_id: None,
            api_token: None,
            allowed_origin: None,
            api_base_url: default_api_base_url(),
            bind: default_bind(),
            service_name: default_service_name(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            category_ttl_secs: default_category_ttl_secs(),
            max_products: default_max_products(),
            max_categories: default_max_categories(),
            min_query_chars: default_min_query_chars(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Category cache lifetime as a chrono duration.
    pub fn category_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.category_ttl_secs).unwrap_or(i64::MAX))
    }

    /// CORS policy derived from `allowed_origin`. Blank values mean "allow all".
    pub fn cors_policy(&self) -> CorsPolicy {
        CorsPolicy::new(self.allowed_origin.as_deref())
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LIVE_SEARCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LIVE_SEARCH_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Return `(store_id, api_token)` when both are set and non-blank.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first absent field.
    pub fn require_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let store_id = non_blank(self.store_id.as_deref()).ok_or_else(|| ConfigError::Missing {
            field: "store_id".into(),
            hint: "Set LIVE_SEARCH_STORE_ID environment variable".into(),
        })?;
        let api_token = non_blank(self.api_token.as_deref()).ok_or_else(|| ConfigError::Missing {
            field: "api_token".into(),
            hint: "Set LIVE_SEARCH_API_TOKEN environment variable".into(),
        })?;
        Ok((store_id, api_token))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
