//! Client code for live-search.
//!
//! This crate provides the two HTTP clients of the system:
//! - `commerce`: the proxy's view of the upstream commerce API
//! - `proxy`: the widget's view of the proxy

pub mod commerce;
pub mod proxy;

pub use commerce::{
    Catalog, CategoryListRequest, CommerceClient, CommerceConfig, CommerceError, ProductSearchRequest, RawCategory,
    RawProduct,
};
pub use proxy::{ProxyClient, ProxyConfig};
