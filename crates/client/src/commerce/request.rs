//! Commerce API request types and validation.

use serde::Serialize;

use crate::commerce::CommerceError;

/// Field projection for the category listing, so image URLs come back.
pub const CATEGORY_RESPONSE_FIELDS: &str =
    "items(id,name,url,thumbnailUrl,imageUrl,image(url,url160px,url320px)),count,limit,offset,total";

/// Largest page the category listing accepts.
pub const CATEGORY_PAGE_LIMIT: u16 = 250;

/// Largest product page the API accepts.
pub const PRODUCT_PAGE_LIMIT: usize = 100;

/// Query string for `GET /{storeId}/products`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchRequest {
    /// Keyword with a trailing `*` for prefix matching.
    pub keyword: String,
    pub search_method: SearchMethod,
    pub enabled: bool,
    pub visible_in_storefront: bool,
    pub sort_by: SortBy,
    pub limit: usize,
    pub clean_urls: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchMethod {
    Storefront,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    Relevance,
}

impl ProductSearchRequest {
    /// Storefront-visible, enabled products, relevance order, `limit` rows.
    pub fn storefront(query: &str, limit: usize) -> Self {
        Self {
            keyword: format!("{query}*"),
            search_method: SearchMethod::Storefront,
            enabled: true,
            visible_in_storefront: true,
            sort_by: SortBy::Relevance,
            limit,
            clean_urls: true,
        }
    }

    /// Reject requests the API would refuse or that make no sense.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.keyword.trim_end_matches('*').trim().is_empty() {
            return Err(CommerceError::Parse("keyword cannot be empty".to_string()));
        }
        if !(1..=PRODUCT_PAGE_LIMIT).contains(&self.limit) {
            return Err(CommerceError::Parse(format!("limit must be 1-{PRODUCT_PAGE_LIMIT}")));
        }
        Ok(())
    }
}

/// Query string for `GET /{storeId}/categories`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryListRequest {
    pub hidden_categories: bool,
    pub limit: u16,
    #[serde(rename = "responseFields")]
    pub response_fields: String,
}

impl Default for CategoryListRequest {
    fn default() -> Self {
        Self { hidden_categories: false, limit: CATEGORY_PAGE_LIMIT, response_fields: CATEGORY_RESPONSE_FIELDS.into() }
    }
}
