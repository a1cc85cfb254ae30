//! Commerce API client.
//!
//! Read-only access to the storefront catalog for the search proxy.
//!
//! ### Specification
//!
//! - **Base**: `https://app.ecwid.com/api/v3/{storeId}`
//! - **Authentication**: `Authorization: Bearer <token>`, never forwarded to browsers.
//! - **Calls**:
//!   - `GET /products`: keyword search, storefront-visible, relevance order, limited.
//!   - `GET /categories`: non-hidden categories, one page of up to 250.
//! - **Credentials**: checked per call, so a misconfigured process still starts.
//! - **Errors**: non-2xx responses carry the status and the head of the body.
//! - **No retries.**

pub mod error;
pub mod request;
pub mod response;

pub use error::CommerceError;
pub use request::{CategoryListRequest, ProductSearchRequest};
pub use response::{RawCategory, RawProduct};

use async_trait::async_trait;
use livesearch_core::AppConfig;
use reqwest::header;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::commerce::error::truncate_body;
use crate::commerce::response::ItemsPage;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "live-search/0.1";

/// Read-only catalog operations the proxy depends on.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Search products by keyword.
    async fn search_products(&self, req: &ProductSearchRequest) -> Result<Vec<RawProduct>, CommerceError>;

    /// List every visible category in upstream order.
    async fn list_categories(&self, req: &CategoryListRequest) -> Result<Vec<RawCategory>, CommerceError>;
}

/// Commerce client configuration.
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    pub store_id: Option<String>,
    pub api_token: Option<String>,
    /// Base URL (default: https://app.ecwid.com/api/v3).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            store_id: None,
            api_token: None,
            base_url: livesearch_core::config::DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for CommerceConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            store_id: config.store_id.clone(),
            api_token: config.api_token.clone(),
            base_url: config.api_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl CommerceConfig {
    /// Trimmed `(store_id, api_token)`, or the name of the missing one.
    fn credentials(&self) -> Result<(&str, &str), CommerceError> {
        let store_id = self.store_id.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let api_token = self.api_token.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (store_id, api_token) {
            (Some(store_id), Some(api_token)) => Ok((store_id, api_token)),
            _ => Err(CommerceError::MissingCredentials("store_id and api_token must both be configured".into())),
        }
    }
}

/// HTTP implementation of [`Catalog`].
#[derive(Debug, Clone)]
pub struct CommerceClient {
    http: reqwest::Client,
    config: CommerceConfig,
}

impl CommerceClient {
    /// Create a new client. Missing credentials are reported per call, not here.
    pub fn new(config: CommerceConfig) -> Result<Self, CommerceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| CommerceError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Build the store-scoped URL for an API path.
    fn endpoint(&self, store_id: &str, path: &str) -> String {
        format!("{}/{}/{}", self.config.base_url.trim_end_matches('/'), store_id, path)
    }

    /// Authenticated GET returning the `items` array of a paged response.
    async fn get_items<Q, T>(&self, path: &str, query: &Q) -> Result<Vec<T>, CommerceError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (store_id, api_token) = self.config.credentials()?;
        let url = self.endpoint(store_id, path);
        let start = Instant::now();

        let http_response = self
            .http
            .get(&url)
            .bearer_auth(api_token)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(path, %status, "commerce API response");

        if !status.is_success() {
            let body = http_response.text().await.unwrap_or_default();
            return Err(CommerceError::HttpError { status: status.as_u16(), body: truncate_body(&body) });
        }

        let bytes = http_response.bytes().await?;
        let page: ItemsPage<T> = serde_json::from_slice(&bytes).map_err(|e| CommerceError::Parse(e.to_string()))?;

        tracing::debug!(path, items = page.items.len(), elapsed = ?start.elapsed(), "commerce API call completed");

        Ok(page.items)
    }
}

#[async_trait]
impl Catalog for CommerceClient {
    async fn search_products(&self, req: &ProductSearchRequest) -> Result<Vec<RawProduct>, CommerceError> {
        req.validate()?;
        tracing::debug!(keyword = %req.keyword, limit = req.limit, "searching products");
        self.get_items("products", req).await
    }

    async fn list_categories(&self, req: &CategoryListRequest) -> Result<Vec<RawCategory>, CommerceError> {
        tracing::debug!(limit = req.limit, "listing categories");
        self.get_items("categories", req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig {
            store_id: Some("12345678".into()),
            api_token: Some("secret".into()),
            timeout_ms: 2_500,
            ..Default::default()
        };
        let config = CommerceConfig::from(&app);
        assert_eq!(config.base_url, "https://app.ecwid.com/api/v3");
        assert_eq!(config.timeout, Duration::from_millis(2_500));
        assert_eq!(config.credentials().unwrap(), ("12345678", "secret"));
    }

    #[test]
    fn test_endpoint_joins_store_and_path() {
        let config = CommerceConfig {
            store_id: Some("42".into()),
            base_url: "https://api.test/v3/".into(),
            ..Default::default()
        };
        let client = CommerceClient::new(config).unwrap();
        assert_eq!(client.endpoint("42", "products"), "https://api.test/v3/42/products");
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_per_call() {
        let client = CommerceClient::new(CommerceConfig::default()).expect("client builds without credentials");

        let result = client.search_products(&ProductSearchRequest::storefront("drill", 8)).await;
        assert!(matches!(result, Err(CommerceError::MissingCredentials(_))));

        let result = client.list_categories(&CategoryListRequest::default()).await;
        assert!(matches!(result, Err(CommerceError::MissingCredentials(_))));
    }

    #[tokio::test]
    async fn test_blank_token_is_missing() {
        let config =
            CommerceConfig { store_id: Some("42".into()), api_token: Some("   ".into()), ..Default::default() };
        let client = CommerceClient::new(config).unwrap();
        let result = client.list_categories(&CategoryListRequest::default()).await;
        assert!(matches!(result, Err(CommerceError::MissingCredentials(_))));
    }
}
