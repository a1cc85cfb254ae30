//! In-memory, single-slot cache for the upstream category list.
//!
//! The slot is process-wide and shared by every request:
//!
//! - One entry at a time, replaced wholesale on refresh
//! - Entries expire after a fixed TTL; nothing else invalidates them
//! - Concurrent refreshes race and the last writer wins
//! - Nothing survives a process restart

mod clock;

pub use clock::{Clock, SystemClock};

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A cached list together with the time it was fetched.
#[derive(Debug)]
struct Slot<T> {
    fetched_at: DateTime<Utc>,
    items: Arc<Vec<T>>,
}

/// Single-slot TTL cache.
///
/// The lock is only held to copy the `Arc` in or out, never while the
/// caller talks to the upstream.
#[derive(Debug)]
pub struct CategoryCache<T> {
    slot: RwLock<Option<Slot<T>>>,
    ttl: Duration,
}

impl<T> CategoryCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { slot: RwLock::new(None), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached items if they were fetched less than one TTL before `now`.
    ///
    /// An empty list never counts as fresh, so a store with no categories
    /// keeps asking the upstream.
    pub async fn fresh(&self, now: DateTime<Utc>) -> Option<Arc<Vec<T>>> {
        let guard = self.slot.read().await;
        let slot = guard.as_ref()?;
        if slot.items.is_empty() || now - slot.fetched_at >= self.ttl {
            return None;
        }
        Some(Arc::clone(&slot.items))
    }

    /// Replace the slot with a freshly fetched list.
    pub async fn store(&self, items: Vec<T>, fetched_at: DateTime<Utc>) -> Arc<Vec<T>> {
        let items = Arc::new(items);
        *self.slot.write().await = Some(Slot { fetched_at, items: Arc::clone(&items) });
        items
    }

    /// When the current entry was fetched, if there is one.
    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.slot.read().await.as_ref().map(|s| s.fetched_at)
    }
}
