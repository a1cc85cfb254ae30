//! Search payload exchanged between the proxy and the widget.

use serde::{Deserialize, Serialize};

/// A product row, reduced from the upstream product shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResult {
    pub id: Option<i64>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Display price, already formatted by the upstream when available.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(rename = "thumb", default)]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "url", default)]
    pub target_url: Option<String>,
}

/// A category row matched locally against the cached category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "url", default)]
    pub target_url: Option<String>,
    #[serde(rename = "thumb", default)]
    pub thumbnail_url: Option<String>,
}

/// Body of `GET /search`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "q", default)]
    pub query: String,
    #[serde(default)]
    pub products: Vec<ProductResult>,
    #[serde(default)]
    pub categories: Vec<CategoryResult>,
}

impl SearchResponse {
    /// Response for a query that never reached the upstream.
    pub fn empty(query: impl Into<String>) -> Self {
        Self { query: query.into(), products: Vec::new(), categories: Vec::new() }
    }

    /// Cut both lists down to their maxima.
    pub fn truncated(mut self, max_products: usize, max_categories: usize) -> Self {
        self.products.truncate(max_products);
        self.categories.truncate(max_categories);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.categories.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.products.len() + self.categories.len()
    }
}
