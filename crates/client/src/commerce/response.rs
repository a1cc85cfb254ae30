//! Commerce API response types and reduction to the search model.
//!
//! Every field is optional on the way in. Anything missing degrades to
//! `None` on the way out instead of failing the whole response.

use livesearch_core::{CategoryResult, ProductResult};
use serde::Deserialize;
use serde_json::Value;

/// Paged envelope shared by the product and category listings.
#[derive(Debug, Deserialize)]
pub struct ItemsPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Product as returned by the API, trimmed to the fields we read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub id: Option<i64>,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub default_displayed_price_formatted: Option<String>,
    /// Usually a number; tolerated in any JSON form.
    pub price: Option<Value>,
    pub quantity: Option<Value>,
    pub in_stock: Option<bool>,
    pub thumbnail_url: Option<String>,
    pub media: Option<RawMedia>,
    pub url: Option<String>,
    pub clean_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMedia {
    #[serde(default)]
    pub images: Vec<RawMediaImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMediaImage {
    pub image160px_url: Option<String>,
}

/// Category as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub image: Option<RawCategoryImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCategoryImage {
    pub url: Option<String>,
    #[serde(rename = "url160px")]
    pub url_160px: Option<String>,
    #[serde(rename = "url320px")]
    pub url_320px: Option<String>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn owned(value: Option<&str>) -> Option<String> {
    present(value).map(str::to_string)
}

impl RawProduct {
    /// Formatted price first, then the raw price value as text.
    fn display_price(&self) -> Option<String> {
        if let Some(formatted) = present(self.default_displayed_price_formatted.as_deref()) {
            return Some(formatted.to_string());
        }
        match self.price.as_ref()? {
            Value::Null => None,
            Value::String(s) => owned(Some(s.as_str())),
            other => Some(other.to_string()),
        }
    }

    /// A numeric quantity wins over the boolean flag.
    fn is_in_stock(&self) -> bool {
        match self.quantity.as_ref().and_then(Value::as_f64) {
            Some(quantity) => quantity > 0.0,
            None => self.in_stock == Some(true),
        }
    }

    fn thumbnail(&self) -> Option<String> {
        owned(self.thumbnail_url.as_deref()).or_else(|| {
            let first = self.media.as_ref()?.images.first()?;
            owned(first.image160px_url.as_deref())
        })
    }
}

impl From<RawProduct> for ProductResult {
    fn from(raw: RawProduct) -> Self {
        ProductResult {
            id: raw.id,
            sku: owned(raw.sku.as_deref()),
            name: raw.name.clone().unwrap_or_default(),
            price: raw.display_price(),
            in_stock: raw.is_in_stock(),
            thumbnail_url: raw.thumbnail(),
            target_url: owned(raw.url.as_deref()).or_else(|| owned(raw.clean_url.as_deref())),
        }
    }
}

impl RawCategory {
    /// Category name, if it has a non-empty one.
    pub fn display_name(&self) -> Option<&str> {
        present(self.name.as_deref())
    }

    /// First image URL in order of preference.
    pub fn thumbnail(&self) -> Option<String> {
        let image = self.image.as_ref();
        [
            self.thumbnail_url.as_deref(),
            self.image_url.as_deref(),
            image.and_then(|i| i.url_160px.as_deref()),
            image.and_then(|i| i.url_320px.as_deref()),
            image.and_then(|i| i.url.as_deref()),
        ]
        .into_iter()
        .find_map(present)
        .map(str::to_string)
    }

    pub fn to_result(&self) -> CategoryResult {
        CategoryResult {
            id: self.id,
            name: self.name.clone().unwrap_or_default(),
            target_url: owned(self.url.as_deref()),
            thumbnail_url: self.thumbnail(),
        }
    }
}
