//! Core types and shared functionality for live-search.
//!
//! This crate provides:
//! - The search data model and query normalization
//! - The single-slot category cache
//! - The CORS origin policy
//! - Unified error types
//! - Configuration structures
//! - The `SearchBackend` port used by the widget

pub mod cache;
pub mod config;
pub mod cors;
pub mod error;
pub mod model;
pub mod ports;
pub mod query;

pub use cache::{CategoryCache, Clock, SystemClock};
pub use config::AppConfig;
pub use cors::{CorsPolicy, OriginDecision};
pub use error::Error;
pub use model::{CategoryResult, ProductResult, SearchResponse};
pub use ports::SearchBackend;
pub use query::SearchQuery;
