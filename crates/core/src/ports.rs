//! Port between the widget and whatever answers its searches.

use async_trait::async_trait;

use crate::{Error, SearchResponse};

/// Search backend seen from the widget: normally the HTTP proxy client.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a search for an already-normalized term.
    async fn search(&self, query: &str) -> Result<SearchResponse, Error>;

    /// Ask the backend to prime its category cache.
    async fn warm(&self) -> Result<(), Error>;
}
