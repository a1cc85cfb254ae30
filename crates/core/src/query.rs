//! Search term normalization.

use std::fmt;

/// Default minimum query length, in characters.
pub const MIN_QUERY_CHARS: usize = 2;

/// A trimmed, whitespace-collapsed search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Normalize raw user input: trim both ends and collapse internal runs of
    /// whitespace to a single space.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the term is long enough to be sent upstream.
    pub fn is_searchable(&self, min_chars: usize) -> bool {
        self.char_len() >= min_chars
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
