//! Widget tuning constants.
//!
//! The touch-related windows were tuned against one storefront theme on
//! mobile Safari; treat them as starting values.

use std::time::Duration;

use livesearch_core::config::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Deployed proxy base URL.
    pub proxy_base_url: String,
    pub min_chars: usize,
    pub debounce_ms: u64,
    /// Value poll period while the field is focused.
    pub value_poll_ms: u64,
    /// Input re-resolution period.
    pub rebind_poll_ms: u64,
    /// Delay before any loading indicator appears.
    pub loading_delay_ms: u64,
    /// Gap between the input's bottom edge and the panel.
    pub panel_offset_px: f64,
    /// Outside clicks are ignored this long after a tap starts inside the panel.
    pub tap_suppress_ms: u64,
    /// Focus-out grace period while a panel tap is resolving.
    pub focus_out_grace_ms: u64,
    /// Minimum gap between two touch navigations.
    pub nav_lock_ms: u64,
    pub max_products: usize,
    pub max_categories: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            proxy_base_url: "http://127.0.0.1:8787".into(),
            min_chars: 2,
            debounce_ms: 200,
            value_poll_ms: 150,
            rebind_poll_ms: 800,
            loading_delay_ms: 120,
            panel_offset_px: 8.0,
            tap_suppress_ms: 700,
            focus_out_grace_ms: 250,
            nav_lock_ms: 1500,
            max_products: 8,
            max_categories: 6,
        }
    }
}

impl WidgetConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn value_poll(&self) -> Duration {
        Duration::from_millis(self.value_poll_ms)
    }

    pub fn rebind_poll(&self) -> Duration {
        Duration::from_millis(self.rebind_poll_ms)
    }

    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }

    pub fn tap_suppress(&self) -> Duration {
        Duration::from_millis(self.tap_suppress_ms)
    }

    pub fn focus_out_grace(&self) -> Duration {
        Duration::from_millis(self.focus_out_grace_ms)
    }

    pub fn nav_lock(&self) -> Duration {
        Duration::from_millis(self.nav_lock_ms)
    }

    /// Reject values that would stall the timers or hide every result.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [("value_poll_ms", self.value_poll_ms), ("rebind_poll_ms", self.rebind_poll_ms)];
        for (field, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be greater than 0".into() });
            }
        }
        if self.min_chars == 0 {
            return Err(ConfigError::Invalid { field: "min_chars".into(), reason: "must be greater than 0".into() });
        }
        if self.max_products == 0 && self.max_categories == 0 {
            return Err(ConfigError::Invalid {
                field: "max_products".into(),
                reason: "products and categories cannot both be capped at 0".into(),
            });
        }
        if self.proxy_base_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "proxy_base_url".into(),
                hint: "point the widget at the deployed proxy".into(),
            });
        }
        Ok(())
    }
}
