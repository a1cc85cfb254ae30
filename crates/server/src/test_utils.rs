//! In-process doubles for the upstream catalog and the clock.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use livesearch_client::{Catalog, CategoryListRequest, CommerceError, ProductSearchRequest, RawCategory, RawProduct};
use livesearch_core::Clock;

/// Catalog that serves fixed data, counts calls and can be told to fail.
///
/// Limits in the request are ignored so callers see the full upstream volume.
#[derive(Default)]
pub struct FakeCatalog {
    products: Vec<RawProduct>,
    categories: Vec<RawCategory>,
    product_calls: AtomicUsize,
    category_calls: AtomicUsize,
    fail_products: AtomicBool,
    fail_categories: AtomicBool,
    last_keyword: Mutex<Option<String>>,
}

impl FakeCatalog {
    pub fn with_data(products: Vec<RawProduct>, categories: Vec<RawCategory>) -> Self {
        Self { products, categories, ..Default::default() }
    }

    pub fn fail_products(&self, fail: bool) {
        self.fail_products.store(fail, Ordering::SeqCst);
    }

    pub fn fail_categories(&self, fail: bool) {
        self.fail_categories.store(fail, Ordering::SeqCst);
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    pub fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }

    pub fn last_keyword(&self) -> Option<String> {
        self.last_keyword.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search_products(&self, req: &ProductSearchRequest) -> Result<Vec<RawProduct>, CommerceError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_keyword.lock().unwrap() = Some(req.keyword.clone());
        if self.fail_products.load(Ordering::SeqCst) {
            return Err(CommerceError::HttpError { status: 503, body: "products unavailable".into() });
        }
        Ok(self.products.clone())
    }

    async fn list_categories(&self, _req: &CategoryListRequest) -> Result<Vec<RawCategory>, CommerceError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_categories.load(Ordering::SeqCst) {
            return Err(CommerceError::Timeout);
        }
        Ok(self.categories.clone())
    }
}

/// Clock that only moves when told to.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl Default for ManualClock {
    fn default() -> Self {
        let start = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap().with_timezone(&Utc);
        Self(Mutex::new(start))
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub fn product(id: i64, name: &str) -> RawProduct {
    RawProduct {
        id: Some(id),
        name: Some(name.to_string()),
        default_displayed_price_formatted: Some("$10.00".into()),
        quantity: Some(serde_json::json!(3)),
        url: Some(format!("https://shop.test/p/{id}")),
        ..Default::default()
    }
}

pub fn category(id: i64, name: &str) -> RawCategory {
    RawCategory {
        id: Some(id),
        name: Some(name.to_string()),
        url: Some(format!("https://shop.test/c/{id}")),
        ..Default::default()
    }
}
