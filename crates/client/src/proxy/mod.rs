//! Widget-side client for the search proxy.
//!
//! Talks only to the proxy, never to the commerce API, and carries no secrets.

use async_trait::async_trait;
use livesearch_core::{Error, SearchBackend, SearchResponse};
use std::time::Duration;
use url::Url;

/// Default request timeout for proxy calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Proxy client configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Deployed proxy base URL, with or without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl ProxyConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout: DEFAULT_TIMEOUT }
    }
}

/// HTTP implementation of [`SearchBackend`].
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base: Url,
}

impl ProxyClient {
    pub fn new(config: ProxyConfig) -> Result<Self, Error> {
        let base = Self::parse_base(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { http, base })
    }

    /// Normalize the base so that `join` appends instead of replacing the last segment.
    fn parse_base(raw: &str) -> Result<Url, Error> {
        let trimmed = raw.trim().trim_end_matches('/');
        let url = Url::parse(&format!("{trimmed}/")).map_err(|e| Error::InvalidInput(format!("{raw}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(Error::InvalidInput(format!("unsupported scheme: {scheme}"))),
        }
    }

    /// URL for `GET /search?q=<query>`.
    pub fn search_url(&self, query: &str) -> Result<Url, Error> {
        let mut url = self.base.join("search").map_err(|e| Error::InvalidInput(e.to_string()))?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    pub fn warm_url(&self) -> Result<Url, Error> {
        self.base.join("warm").map_err(|e| Error::InvalidInput(e.to_string()))
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, Error> {
        let response = self.http.get(url).send().await.map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Upstream { status: status.as_u16(), message });
        }
        Ok(response)
    }
}

#[async_trait]
impl SearchBackend for ProxyClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, Error> {
        let url = self.search_url(query)?;
        tracing::debug!(%url, "querying search proxy");
        self.get(url)
            .await?
            .json::<SearchResponse>()
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }

    async fn warm(&self) -> Result<(), Error> {
        self.get(self.warm_url()?).await.map(|_| ())
    }
}
