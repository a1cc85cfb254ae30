//! Locating the storefront search field.
//!
//! Themes differ in markup, so a fixed list of selector strategies is tried in
//! order and a loose heuristic catches the rest. A match that is disabled or
//! not laid out is skipped.

use crate::host::{InputCandidate, NodeId};

/// Selector strategies in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorStrategy {
    /// `input.ins-header__search-field[name="keyword"]`: the storefront header field.
    HeaderSearchField,
    /// `form[role="search"] input[name="keyword"]`.
    SearchFormKeyword,
}

impl SelectorStrategy {
    pub const ORDERED: [SelectorStrategy; 2] =
        [SelectorStrategy::HeaderSearchField, SelectorStrategy::SearchFormKeyword];

    pub fn matches(&self, candidate: &InputCandidate) -> bool {
        match self {
            Self::HeaderSearchField => candidate.has_class("ins-header__search-field") && candidate.name == "keyword",
            Self::SearchFormKeyword => candidate.in_search_form && candidate.name == "keyword",
        }
    }
}

/// Resolve the search input: first visible strategy match, else the first
/// visible input that looks like a search field.
pub fn find_search_input(candidates: &[InputCandidate]) -> Option<NodeId> {
    for strategy in SelectorStrategy::ORDERED {
        if let Some(found) = candidates.iter().find(|c| strategy.matches(c) && c.is_visible()) {
            return Some(found.node);
        }
    }

    candidates.iter().find(|c| c.is_visible() && looks_like_search(c)).map(|c| c.node)
}

/// Whether a focused node is one the widget attaches to on focus. Only the
/// selector strategies qualify; the heuristic is for discovery alone.
pub fn is_search_target(candidate: &InputCandidate) -> bool {
    SelectorStrategy::ORDERED.iter().any(|s| s.matches(candidate))
}

fn looks_like_search(candidate: &InputCandidate) -> bool {
    let text_like = matches!(candidate.input_type.as_str(), "" | "text" | "search");
    if !text_like {
        return false;
    }
    if candidate.input_type == "search" {
        return true;
    }

    let name = candidate.name.to_lowercase();
    let placeholder = candidate.placeholder.to_lowercase();
    matches!(name.as_str(), "q" | "keyword" | "query") || name.contains("search") || placeholder.contains("search")
}
