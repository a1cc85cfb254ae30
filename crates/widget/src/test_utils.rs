//! In-memory host page for widget tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::host::{InputCandidate, InputHost, NodeId, Rect, ScrollOffset};

#[derive(Debug, Default)]
struct Page {
    inputs: Vec<InputCandidate>,
    values: HashMap<NodeId, String>,
    rects: HashMap<NodeId, Rect>,
    focused: Option<NodeId>,
    scroll: ScrollOffset,
    desktop: bool,
}

/// Shared handle: clones see the same page, so a test can keep typing while a
/// runtime owns another handle.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    inner: Arc<Mutex<Page>>,
}

impl FakePage {
    /// Desktop page with one storefront header search field.
    pub fn storefront() -> (Self, NodeId) {
        let page = Self::default();
        let node = NodeId(1);
        page.add_input(
            InputCandidate {
                node,
                input_type: "text".into(),
                name: "keyword".into(),
                classes: vec!["ins-header__search-field".into()],
                laid_out: true,
                ..Default::default()
            },
            Rect { left: 100.0, top: 40.0, width: 320.0, height: 36.0 },
        );
        page.set_desktop(true);
        (page, node)
    }

    fn with<R>(&self, f: impl FnOnce(&mut Page) -> R) -> R {
        let mut page = self.inner.lock().unwrap();
        f(&mut page)
    }

    pub fn add_input(&self, candidate: InputCandidate, rect: Rect) {
        self.with(|p| {
            p.values.insert(candidate.node, String::new());
            p.rects.insert(candidate.node, rect);
            p.inputs.push(candidate);
        });
    }

    pub fn remove_input(&self, node: NodeId) {
        self.with(|p| {
            p.inputs.retain(|c| c.node != node);
            p.values.remove(&node);
            p.rects.remove(&node);
            if p.focused == Some(node) {
                p.focused = None;
            }
        });
    }

    pub fn focus(&self, node: Option<NodeId>) {
        self.with(|p| p.focused = node);
    }

    pub fn type_text(&self, node: NodeId, value: &str) {
        self.with(|p| {
            p.values.insert(node, value.to_string());
        });
    }

    pub fn set_desktop(&self, desktop: bool) {
        self.with(|p| p.desktop = desktop);
    }

    pub fn scroll_to(&self, x: f64, y: f64) {
        self.with(|p| p.scroll = ScrollOffset { x, y });
    }
}

impl InputHost for FakePage {
    fn inputs(&self) -> Vec<InputCandidate> {
        self.with(|p| p.inputs.clone())
    }

    fn focused(&self) -> Option<NodeId> {
        self.with(|p| p.focused)
    }

    fn value(&self, node: NodeId) -> Option<String> {
        self.with(|p| p.values.get(&node).cloned())
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.with(|p| p.rects.get(&node).copied())
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.with(|p| p.scroll)
    }

    fn is_desktop_pointer(&self) -> bool {
        self.with(|p| p.desktop)
    }
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}
