//! Storefront typeahead widget.
//!
//! This crate provides:
//! - Search input discovery and value/rebind polling over an [`InputHost`]
//! - The panel state machine and a pure view builder
//! - [`WidgetController`], the synchronous, effect-returning core
//! - [`WidgetRuntime`], a tokio driver that talks to the proxy through a
//!   [`livesearch_core::SearchBackend`]

pub mod config;
pub mod controller;
pub mod debounce;
pub mod discovery;
pub mod dropdown;
pub mod host;
pub mod observe;
pub mod runtime;
pub mod view;

#[cfg(test)]
mod test_utils;

pub use config::WidgetConfig;
pub use controller::{Effect, HostEvent, Key, RequestToken, WidgetController};
pub use dropdown::{Dropdown, PanelPosition, PanelState};
pub use host::{InputCandidate, InputHost, NodeId, Rect, ScrollOffset};
pub use runtime::{Surface, WidgetRuntime};
pub use view::{Panel, STYLESHEET, ViewNode};
