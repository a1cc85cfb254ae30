//! Wall-clock source for cache expiry.

use chrono::{DateTime, Utc};

/// Source of the current time. Swapped out in tests to step past the TTL.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
