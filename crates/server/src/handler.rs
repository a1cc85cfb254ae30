//! Search proxy service.
//!
//! One instance per process. Holds the upstream catalog, the category cache
//! slot and the response limits; everything else is per request.

use std::sync::Arc;

use livesearch_client::{Catalog, CategoryListRequest, CommerceError, ProductSearchRequest, RawCategory};
use livesearch_core::{
    AppConfig, CategoryCache, CategoryResult, Clock, ProductResult, SearchQuery, SearchResponse, SystemClock,
};

use crate::error::ProxyError;

/// Per-response caps and the minimum query length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_products: usize,
    pub max_categories: usize,
    pub min_query_chars: usize,
}

impl From<&AppConfig> for SearchLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_products: config.max_products,
            max_categories: config.max_categories,
            min_query_chars: config.min_query_chars,
        }
    }
}

/// The proxy's shared state.
pub struct ProxyService {
    catalog: Arc<dyn Catalog>,
    category_cache: CategoryCache<RawCategory>,
    clock: Arc<dyn Clock>,
    limits: SearchLimits,
}

impl ProxyService {
    pub fn new(catalog: Arc<dyn Catalog>, config: &AppConfig) -> Self {
        Self::with_clock(catalog, config, Arc::new(SystemClock))
    }

    pub fn with_clock(catalog: Arc<dyn Catalog>, config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            category_cache: CategoryCache::new(config.category_ttl()),
            clock,
            limits: SearchLimits::from(config),
        }
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Normalize `raw`, then search products and match categories.
    ///
    /// Short queries return empty lists without touching the upstream. A
    /// product failure fails the request; a category failure only empties
    /// the category list.
    pub async fn search(&self, raw: &str) -> Result<SearchResponse, ProxyError> {
        let query = SearchQuery::normalize(raw);
        if !query.is_searchable(self.limits.min_query_chars) {
            return Ok(SearchResponse::empty(query.into_inner()));
        }

        let product_req = ProductSearchRequest::storefront(query.as_str(), self.limits.max_products);
        let (products, categories) = tokio::join!(self.catalog.search_products(&product_req), self.categories());

        let products: Vec<ProductResult> = products?.into_iter().map(ProductResult::from).collect();

        let categories = match categories {
            Ok(all) => match_categories(&all, query.as_str(), self.limits.max_categories),
            Err(e) => {
                tracing::warn!(error = %e, "category lookup failed; returning products only");
                Vec::new()
            }
        };

        tracing::debug!(query = %query, products = products.len(), categories = categories.len(), "search completed");

        Ok(SearchResponse { query: query.into_inner(), products, categories }
            .truncated(self.limits.max_products, self.limits.max_categories))
    }

    /// Cached category list, refreshed from the upstream once the TTL has passed.
    ///
    /// No lock is held during the upstream call, so concurrent refreshes may
    /// both fetch; the later store wins.
    pub async fn categories(&self) -> Result<Arc<Vec<RawCategory>>, CommerceError> {
        let now = self.clock.now();
        if let Some(items) = self.category_cache.fresh(now).await {
            tracing::debug!(count = items.len(), "category cache hit");
            return Ok(items);
        }

        let items = self.catalog.list_categories(&CategoryListRequest::default()).await?;
        tracing::debug!(count = items.len(), "category cache refreshed");
        Ok(self.category_cache.store(items, now).await)
    }

    /// Make sure the category cache is populated and fresh.
    pub async fn warm(&self) -> Result<(), ProxyError> {
        self.categories().await?;
        Ok(())
    }
}

/// Case-insensitive substring match over named categories, upstream order,
/// at most `limit` results.
pub fn match_categories(all: &[RawCategory], query: &str, limit: usize) -> Vec<CategoryResult> {
    let needle = query.to_lowercase();
    all.iter()
        .filter(|c| c.display_name().is_some_and(|name| name.to_lowercase().contains(&needle)))
        .take(limit)
        .map(RawCategory::to_result)
        .collect()
}
