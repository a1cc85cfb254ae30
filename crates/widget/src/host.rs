//! The host document as the widget sees it.
//!
//! A browser adapter implements [`InputHost`] over the live DOM; tests use an
//! in-memory page. Nothing else in the crate touches the document.

/// Opaque handle to an element in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(pub u64);

/// Viewport-relative bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Page scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Snapshot of one `<input>` element, enough to run discovery.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputCandidate {
    pub node: NodeId,
    /// Lowercased `type` attribute; empty when absent.
    pub input_type: String,
    pub name: String,
    pub placeholder: String,
    pub classes: Vec<String>,
    /// Inside a `form[role="search"]`.
    pub in_search_form: bool,
    pub disabled: bool,
    /// Has an offset parent, i.e. takes part in layout.
    pub laid_out: bool,
    /// Computed `visibility: hidden` or `display: none`.
    pub css_hidden: bool,
}

impl InputCandidate {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_visible(&self) -> bool {
        !self.disabled && self.laid_out && !self.css_hidden
    }
}

/// Read access to the host document.
pub trait InputHost {
    /// Every input element, in document order.
    fn inputs(&self) -> Vec<InputCandidate>;

    /// Element that currently has keyboard focus.
    fn focused(&self) -> Option<NodeId>;

    /// Current value of an input, `None` if the node is gone.
    fn value(&self, node: NodeId) -> Option<String>;

    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;

    fn scroll_offset(&self) -> ScrollOffset;

    /// `(hover: hover) and (pointer: fine)`.
    fn is_desktop_pointer(&self) -> bool;
}
