//! Panel state: what is shown, which row is active, and where it sits.

use crate::host::{Rect, ScrollOffset};
use crate::view::{self, Panel, ViewNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Hidden,
    /// Skeleton rows; nothing usable to show yet.
    LoadingSkeleton,
    Populated,
    /// Previous results still shown with a "Searching…" footer.
    InlineLoading,
}

/// Document-relative panel placement, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPosition {
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

/// Place the panel `offset` pixels under the input, matching its width.
/// Values are rounded to whole pixels.
pub fn position_under(rect: Rect, scroll: ScrollOffset, offset: f64) -> PanelPosition {
    PanelPosition {
        left: (rect.left + scroll.x).round(),
        top: (rect.bottom() + scroll.y + offset).round(),
        width: rect.width.round(),
    }
}

#[derive(Debug, Clone)]
pub struct Dropdown {
    state: PanelState,
    content: Option<Panel>,
    content_query: Option<String>,
    active: Option<usize>,
    position: Option<PanelPosition>,
}

impl Default for Dropdown {
    fn default() -> Self {
        Self { state: PanelState::Hidden, content: None, content_query: None, active: None, position: None }
    }
}

impl Dropdown {
    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state != PanelState::Hidden
    }

    /// Results are on screen (possibly under a loading footer).
    pub fn shows_results(&self) -> bool {
        matches!(self.state, PanelState::Populated | PanelState::InlineLoading) && self.content.is_some()
    }

    /// Query the retained results were rendered for.
    pub fn content_query(&self) -> Option<&str> {
        self.content_query.as_deref()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn row_count(&self) -> usize {
        self.content.as_ref().map_or(0, Panel::row_count)
    }

    pub fn position(&self) -> Option<PanelPosition> {
        self.position
    }

    pub fn set_position(&mut self, position: PanelPosition) {
        self.position = Some(position);
    }

    pub fn populate(&mut self, panel: Panel, query: &str) {
        self.content = Some(panel);
        self.content_query = Some(query.to_string());
        self.active = None;
        self.state = PanelState::Populated;
    }

    /// Skeleton replaces whatever was rendered.
    pub fn show_skeleton(&mut self) {
        self.content = None;
        self.content_query = None;
        self.active = None;
        self.state = PanelState::LoadingSkeleton;
    }

    /// Only applies while results are showing.
    pub fn show_inline_loading(&mut self) -> bool {
        if self.state == PanelState::Populated && self.content.is_some() {
            self.state = PanelState::InlineLoading;
            return true;
        }
        false
    }

    /// Hide the panel; with `clear` the retained results are dropped too.
    pub fn hide(&mut self, clear: bool) {
        self.state = PanelState::Hidden;
        self.active = None;
        if clear {
            self.content = None;
            self.content_query = None;
        }
    }

    /// Show retained results again if they belong to `query`.
    pub fn reveal(&mut self, query: &str) -> bool {
        if self.state == PanelState::Hidden && self.content.is_some() && self.content_query.as_deref() == Some(query) {
            self.state = PanelState::Populated;
            return true;
        }
        false
    }

    pub fn move_down(&mut self) {
        let rows = self.row_count();
        if rows == 0 {
            return;
        }
        self.active = Some(self.active.map_or(0, |i| (i + 1).min(rows - 1)));
    }

    pub fn move_up(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        self.active = Some(self.active.map_or(0, |i| i.saturating_sub(1)));
    }

    pub fn set_active(&mut self, index: usize) {
        let rows = self.row_count();
        self.active = (rows > 0).then(|| index.min(rows - 1));
    }

    pub fn active_target(&self) -> Option<&str> {
        let index = self.active?;
        self.content.as_ref()?.targets.get(index).map(String::as_str)
    }

    /// Full panel tree for the current state, `None` when hidden.
    pub fn render(&self) -> Option<ViewNode> {
        let content = match self.state {
            PanelState::Hidden => return None,
            PanelState::LoadingSkeleton => view::skeleton_view(),
            PanelState::Populated => self.content.as_ref()?.content.with_active_row(self.active),
            PanelState::InlineLoading => {
                let results = self.content.as_ref()?.content.with_active_row(self.active);
                view::Element::new("div").child(results).child(view::inline_loading_footer()).into()
            }
        };
        Some(view::panel(content))
    }
}
