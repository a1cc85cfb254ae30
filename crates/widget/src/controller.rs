//! The typeahead state machine.
//!
//! [`WidgetController`] never performs I/O. Hosts feed it [`HostEvent`]s,
//! clock ticks and search outcomes; it answers with [`Effect`]s for the host to
//! carry out. All times are offsets from an arbitrary origin chosen by the
//! driver.

use std::time::Duration;

use livesearch_core::{Error, SearchQuery, SearchResponse};

use crate::config::WidgetConfig;
use crate::debounce::Debouncer;
use crate::discovery::{find_search_input, is_search_target};
use crate::dropdown::{Dropdown, PanelPosition, position_under};
use crate::host::{InputHost, NodeId};
use crate::observe::{Observation, PollingObserver};
use crate::view::{self, ViewNode};

/// Identifies one issued search; responses carrying any other token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    FocusIn { node: NodeId },
    FocusOut { node: NodeId },
    Key(Key),
    /// `pointerdown` or `touchstart`.
    PointerDown { inside_panel: bool },
    /// `touchend`; `href` is the enclosing row link, if any.
    TouchEnd { inside_panel: bool, href: Option<String> },
    Click { on_input: bool, inside_panel: bool },
    RowHover(usize),
    Resize,
    Scroll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch { token: RequestToken, query: String },
    Cancel(RequestToken),
    /// Fire-and-forget cache warm-up.
    Warm,
    /// Show the panel with exactly this tree.
    Show(ViewNode),
    Hide,
    Position(PanelPosition),
    Navigate(String),
    /// Suppress the default action of the event being handled.
    PreventDefault,
}

#[derive(Debug, Clone)]
struct InFlight {
    token: RequestToken,
    loading_at: Option<Duration>,
}

#[derive(Debug)]
pub struct WidgetController {
    config: WidgetConfig,
    observer: PollingObserver,
    debouncer: Debouncer,
    dropdown: Dropdown,
    in_flight: Option<InFlight>,
    next_token: u64,
    warmed: bool,
    tap_suppressed_until: Option<Duration>,
    nav_locked_until: Option<Duration>,
}

impl WidgetController {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            observer: PollingObserver::new(config.value_poll(), config.rebind_poll()),
            debouncer: Debouncer::new(config.debounce()),
            dropdown: Dropdown::default(),
            in_flight: None,
            next_token: 0,
            warmed: false,
            tap_suppressed_until: None,
            nav_locked_until: None,
            config,
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn dropdown(&self) -> &Dropdown {
        &self.dropdown
    }

    pub fn active_input(&self) -> Option<NodeId> {
        self.observer.active()
    }

    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight.as_ref().map(|f| f.token)
    }

    /// Page boot: warm the proxy once and attach to an already focused field.
    pub fn start(&mut self, host: &impl InputHost, now: Duration) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.warmed {
            self.warmed = true;
            effects.push(Effect::Warm);
        }
        if let Some(node) = find_search_input(&host.inputs())
            && host.focused() == Some(node)
        {
            self.observer.bind(node, host.value(node).unwrap_or_default(), now);
            effects.extend(self.reposition(host));
        }
        effects
    }

    /// Earliest time at which [`tick`](Self::tick) has something to do.
    pub fn next_wakeup(&self) -> Duration {
        let mut at = self.observer.next_wakeup();
        if let Some(deadline) = self.debouncer.deadline() {
            at = at.min(deadline);
        }
        if let Some(loading) = self.in_flight.as_ref().and_then(|f| f.loading_at) {
            at = at.min(loading);
        }
        at
    }

    pub fn tick(&mut self, host: &impl InputHost, now: Duration) -> Vec<Effect> {
        let mut effects = Vec::new();

        for observation in self.observer.poll(host, now) {
            match observation {
                Observation::ValueChanged { .. } => self.debouncer.schedule(now),
                Observation::Rebound { node } => {
                    tracing::debug!(node = node.0, "search input rebound");
                    effects.extend(self.reposition(host));
                }
            }
        }

        if self.debouncer.fire(now) {
            effects.extend(self.run_search(host, now));
        }

        if let Some(flight) = self.in_flight.as_mut()
            && flight.loading_at.is_some_and(|at| now >= at)
        {
            flight.loading_at = None;
            effects.push(self.show_loading());
        }

        effects
    }

    pub fn handle(&mut self, host: &impl InputHost, event: HostEvent, now: Duration) -> Vec<Effect> {
        match event {
            HostEvent::FocusIn { node } => self.on_focus_in(host, node, now),
            HostEvent::FocusOut { node } => {
                if self.observer.active() == Some(node) {
                    let grace = self.tap_suppressed(now).then(|| self.config.focus_out_grace());
                    self.observer.stop(now, grace);
                }
                Vec::new()
            }
            HostEvent::Key(key) => self.on_key(host, key),
            HostEvent::PointerDown { inside_panel } => {
                if inside_panel {
                    self.tap_suppressed_until = Some(now + self.config.tap_suppress());
                }
                Vec::new()
            }
            HostEvent::TouchEnd { inside_panel, href } => self.on_touch_end(inside_panel, href, now),
            HostEvent::Click { on_input, inside_panel } => {
                if self.tap_suppressed(now) || on_input || inside_panel || !self.dropdown.is_visible() {
                    return Vec::new();
                }
                self.dropdown.hide(false);
                vec![Effect::Hide]
            }
            HostEvent::RowHover(index) => {
                if !host.is_desktop_pointer() || !self.dropdown.shows_results() {
                    return Vec::new();
                }
                self.dropdown.set_active(index);
                vec![self.render()]
            }
            HostEvent::Resize | HostEvent::Scroll => self.reposition(host).into_iter().collect(),
        }
    }

    /// Apply the outcome of the search identified by `token`.
    pub fn on_response(&mut self, token: RequestToken, outcome: Result<SearchResponse, Error>) -> Vec<Effect> {
        if self.in_flight() != Some(token) {
            tracing::debug!(?token, "discarding stale search response");
            return Vec::new();
        }
        self.in_flight = None;

        match outcome {
            Ok(response) => {
                let panel = view::results_view(&response, self.config.max_products, self.config.max_categories);
                self.dropdown.populate(panel, &response.query);
                vec![self.render()]
            }
            Err(e) => {
                tracing::debug!(error = %e, "search failed");
                self.dropdown.hide(false);
                vec![Effect::Hide]
            }
        }
    }

    fn on_focus_in(&mut self, host: &impl InputHost, node: NodeId, now: Duration) -> Vec<Effect> {
        let target = host.inputs().into_iter().find(|c| c.node == node);
        if !target.as_ref().is_some_and(is_search_target) {
            return Vec::new();
        }

        let value = host.value(node).unwrap_or_default();
        let query = SearchQuery::normalize(&value);
        self.observer.bind(node, value, now);

        let mut effects: Vec<Effect> = self.reposition(host).into_iter().collect();
        if self.dropdown.reveal(query.as_str()) {
            effects.push(self.render());
        }
        effects
    }

    fn on_key(&mut self, host: &impl InputHost, key: Key) -> Vec<Effect> {
        if !host.is_desktop_pointer() || !self.dropdown.is_visible() {
            return Vec::new();
        }
        match self.observer.active() {
            Some(active) if host.focused() == Some(active) => {}
            _ => return Vec::new(),
        }

        match key {
            Key::Escape => {
                self.dropdown.hide(false);
                vec![Effect::Hide]
            }
            Key::ArrowDown => {
                self.dropdown.move_down();
                vec![Effect::PreventDefault, self.render()]
            }
            Key::ArrowUp => {
                self.dropdown.move_up();
                vec![Effect::PreventDefault, self.render()]
            }
            Key::Enter => match self.dropdown.active_target() {
                Some(target) => vec![Effect::PreventDefault, Effect::Navigate(target.to_string())],
                None => Vec::new(),
            },
            Key::Other => Vec::new(),
        }
    }

    fn on_touch_end(&mut self, inside_panel: bool, href: Option<String>, now: Duration) -> Vec<Effect> {
        if !inside_panel || self.nav_locked_until.is_some_and(|until| now < until) {
            return Vec::new();
        }
        let Some(href) = href.filter(|h| !h.is_empty()) else {
            return Vec::new();
        };
        self.nav_locked_until = Some(now + self.config.nav_lock());
        vec![Effect::Navigate(href)]
    }

    fn run_search(&mut self, host: &impl InputHost, now: Duration) -> Vec<Effect> {
        let Some(node) = self.observer.active() else {
            return Vec::new();
        };
        let mut effects: Vec<Effect> = self.reposition(host).into_iter().collect();

        if let Some(previous) = self.in_flight.take() {
            effects.push(Effect::Cancel(previous.token));
        }

        let query = SearchQuery::normalize(&host.value(node).unwrap_or_default());
        if !query.is_searchable(self.config.min_chars) {
            self.dropdown.hide(true);
            effects.push(Effect::Hide);
            return effects;
        }

        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.in_flight = Some(InFlight { token, loading_at: Some(now + self.config.loading_delay()) });
        effects.push(Effect::Fetch { token, query: query.into_inner() });
        effects
    }

    fn show_loading(&mut self) -> Effect {
        if self.dropdown.shows_results() {
            self.dropdown.show_inline_loading();
        } else {
            self.dropdown.show_skeleton();
        }
        self.render()
    }

    fn render(&self) -> Effect {
        match self.dropdown.render() {
            Some(node) => Effect::Show(node),
            None => Effect::Hide,
        }
    }

    fn reposition(&mut self, host: &impl InputHost) -> Option<Effect> {
        let node = self.observer.active()?;
        let rect = host.bounding_rect(node)?;
        let position = position_under(rect, host.scroll_offset(), self.config.panel_offset_px);
        self.dropdown.set_position(position);
        Some(Effect::Position(position))
    }

    fn tap_suppressed(&self, now: Duration) -> bool {
        self.tap_suppressed_until.is_some_and(|until| now < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dropdown::PanelState;
    use crate::test_utils::{FakePage, ms};
    use livesearch_core::ProductResult;

    struct Harness {
        page: FakePage,
        node: NodeId,
        ctrl: WidgetController,
        now: Duration,
    }

    impl Harness {
        fn focused() -> Self {
            let (page, node) = FakePage::storefront();
            page.focus(Some(node));
            let mut ctrl = WidgetController::new(WidgetConfig::default());
            ctrl.handle(&page, HostEvent::FocusIn { node }, Duration::ZERO);
            Self { page, node, ctrl, now: Duration::ZERO }
        }

        /// Tick every 10ms until `until`, collecting effects.
        fn advance_to(&mut self, until: Duration) -> Vec<Effect> {
            let mut effects = Vec::new();
            while self.now < until {
                self.now += ms(10);
                effects.extend(self.ctrl.tick(&self.page, self.now));
            }
            effects
        }

        fn event(&mut self, event: HostEvent) -> Vec<Effect> {
            self.ctrl.handle(&self.page, event, self.now)
        }

        fn type_text(&self, value: &str) {
            self.page.type_text(self.node, value);
        }
    }

    fn fetches(effects: &[Effect]) -> Vec<(RequestToken, String)> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Fetch { token, query } => Some((*token, query.clone())),
                _ => None,
            })
            .collect()
    }

    fn results(query: &str, names: &[&str]) -> SearchResponse {
        let products = names
            .iter()
            .enumerate()
            .map(|(i, name)| ProductResult {
                id: Some(i as i64),
                sku: None,
                name: (*name).into(),
                price: Some("$5.00".into()),
                in_stock: true,
                thumbnail_url: None,
                target_url: Some(format!("https://shop.test/p/{i}")),
            })
            .collect();
        SearchResponse { query: query.into(), products, categories: Vec::new() }
    }

    /// Type `value`, let the debounce fire, and return the issued token.
    fn search(h: &mut Harness, value: &str) -> RequestToken {
        h.type_text(value);
        let until = h.now + ms(400);
        let issued = fetches(&h.advance_to(until));
        assert_eq!(issued.len(), 1, "expected one fetch for {value}");
        issued[0].0
    }

    #[test]
    fn test_typing_within_debounce_issues_one_fetch() {
        let mut h = Harness::focused();
        h.type_text("a");
        let mut effects = h.advance_to(ms(160));
        h.type_text("ab");
        effects.extend(h.advance_to(ms(1000)));

        let issued = fetches(&effects);
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].1, "ab");
    }

    #[test]
    fn test_value_is_normalized() {
        let mut h = Harness::focused();
        h.type_text("  cordless   drill ");
        let issued = fetches(&h.advance_to(ms(600)));
        assert_eq!(issued[0].1, "cordless drill");
    }

    #[test]
    fn test_start_warms_once() {
        let (page, _) = FakePage::storefront();
        let mut ctrl = WidgetController::new(WidgetConfig::default());
        let first = ctrl.start(&page, Duration::ZERO);
        let second = ctrl.start(&page, Duration::ZERO);
        assert_eq!(first.iter().filter(|e| **e == Effect::Warm).count(), 1);
        assert!(!second.contains(&Effect::Warm));
    }

    #[test]
    fn test_focus_on_unrelated_input_ignored() {
        let (page, _) = FakePage::storefront();
        let mut ctrl = WidgetController::new(WidgetConfig::default());
        assert!(ctrl.handle(&page, HostEvent::FocusIn { node: NodeId(99) }, Duration::ZERO).is_empty());
        assert_eq!(ctrl.active_input(), None);
    }

    #[test]
    fn test_response_populates_panel() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        let effects = h.ctrl.on_response(token, Ok(results("drill", &["Cordless Drill"])));

        assert_eq!(h.ctrl.dropdown().state(), PanelState::Populated);
        let Some(Effect::Show(node)) = effects.first() else { panic!("expected show, got {effects:?}") };
        assert!(node.to_html().contains("<mark>Drill</mark>"));
        assert_eq!(h.ctrl.in_flight(), None);
    }

    #[test]
    fn test_new_query_cancels_previous_and_stale_response_is_ignored() {
        let mut h = Harness::focused();
        let first = search(&mut h, "dr");
        h.type_text("dri");
        let effects = h.advance_to(h.now + ms(400));

        assert!(effects.contains(&Effect::Cancel(first)));
        let second = fetches(&effects)[0].0;
        assert_ne!(first, second);

        assert!(h.ctrl.on_response(first, Ok(results("dr", &["Drum"]))).is_empty());
        assert!(!h.ctrl.on_response(second, Ok(results("dri", &["Drill"]))).is_empty());
        assert_eq!(h.ctrl.dropdown().content_query(), Some("dri"));
    }

    #[test]
    fn test_short_query_cancels_and_clears() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        h.ctrl.on_response(token, Ok(results("drill", &["Drill"])));

        let pending = search(&mut h, "drills");
        h.type_text("d");
        let effects = h.advance_to(h.now + ms(400));
        assert!(effects.contains(&Effect::Cancel(pending)));
        assert!(effects.contains(&Effect::Hide));
        assert!(fetches(&effects).is_empty());
        assert_eq!(h.ctrl.dropdown().row_count(), 0);
        assert_eq!(h.ctrl.in_flight(), None);
    }

    #[test]
    fn test_skeleton_after_loading_delay_when_empty() {
        let mut h = Harness::focused();
        h.type_text("drill");
        h.advance_to(ms(350));
        assert!(h.ctrl.in_flight().is_some());
        assert_eq!(h.ctrl.dropdown().state(), PanelState::Hidden);

        h.advance_to(ms(500));
        assert_eq!(h.ctrl.dropdown().state(), PanelState::LoadingSkeleton);
    }

    #[test]
    fn test_fast_response_shows_no_loading_state() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        h.ctrl.on_response(token, Ok(results("drill", &["Drill"])));
        let effects = h.advance_to(h.now + ms(300));
        assert!(!effects.iter().any(|e| matches!(e, Effect::Show(_))));
        assert_eq!(h.ctrl.dropdown().state(), PanelState::Populated);
    }

    #[test]
    fn test_inline_loading_over_existing_results() {
        let mut h = Harness::focused();
        let token = search(&mut h, "dril");
        h.ctrl.on_response(token, Ok(results("dril", &["Drill"])));

        h.type_text("drill");
        h.advance_to(h.now + ms(600));
        assert_eq!(h.ctrl.dropdown().state(), PanelState::InlineLoading);
        let token = h.ctrl.in_flight().unwrap();
        h.ctrl.on_response(token, Ok(results("drill", &["Drill", "Drill bit"])));
        assert_eq!(h.ctrl.dropdown().state(), PanelState::Populated);
        assert_eq!(h.ctrl.dropdown().row_count(), 2);
    }

    #[test]
    fn test_failure_hides_without_clearing() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        h.ctrl.on_response(token, Ok(results("drill", &["Drill"])));

        let token = search(&mut h, "drills");
        let effects = h.ctrl.on_response(token, Err(Error::Upstream { status: 500, message: "boom".into() }));
        assert_eq!(effects, vec![Effect::Hide]);
        assert_eq!(h.ctrl.dropdown().row_count(), 1);
        assert_eq!(h.ctrl.dropdown().content_query(), Some("drill"));
    }

    #[test]
    fn test_superseded_response_leaves_panel_untouched() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        h.ctrl.on_response(token, Ok(results("drill", &["Drill"])));

        let superseded = search(&mut h, "drills");
        h.type_text("drillz");
        let effects = h.advance_to(h.now + ms(400));
        assert!(effects.contains(&Effect::Cancel(superseded)));

        let effects = h.ctrl.on_response(superseded, Ok(results("drills", &["Drill set"])));
        assert!(effects.is_empty());
        assert_eq!(h.ctrl.dropdown().state(), PanelState::InlineLoading);
        assert_eq!(h.ctrl.dropdown().content_query(), Some("drill"));
        assert_ne!(h.ctrl.in_flight(), Some(superseded));
    }

    #[test]
    fn test_keyboard_navigation() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        h.ctrl.on_response(token, Ok(results("drill", &["A", "B", "C"])));

        h.event(HostEvent::Key(Key::ArrowDown));
        h.event(HostEvent::Key(Key::ArrowDown));
        let effects = h.event(HostEvent::Key(Key::ArrowUp));
        assert_eq!(effects[0], Effect::PreventDefault);
        assert_eq!(h.ctrl.dropdown().active_index(), Some(0));

        let effects = h.event(HostEvent::Key(Key::Enter));
        assert_eq!(effects, vec![Effect::PreventDefault, Effect::Navigate("https://shop.test/p/0".into())]);

        assert_eq!(h.event(HostEvent::Key(Key::Escape)), vec![Effect::Hide]);
        assert_eq!(h.ctrl.dropdown().row_count(), 3);
        assert!(h.event(HostEvent::Key(Key::ArrowDown)).is_empty());
    }

    #[test]
    fn test_enter_without_selection_does_nothing() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        h.ctrl.on_response(token, Ok(results("drill", &["A"])));
        assert!(h.event(HostEvent::Key(Key::Enter)).is_empty());
    }

    #[test]
    fn test_keys_ignored_on_touch_devices() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        h.ctrl.on_response(token, Ok(results("drill", &["A"])));
        h.page.set_desktop(false);
        assert!(h.event(HostEvent::Key(Key::ArrowDown)).is_empty());
        assert!(h.event(HostEvent::RowHover(0)).is_empty());
    }

    #[test]
    fn test_hover_sets_active_row() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        h.ctrl.on_response(token, Ok(results("drill", &["A", "B"])));
        h.event(HostEvent::RowHover(7));
        assert_eq!(h.ctrl.dropdown().active_index(), Some(1));
    }

    #[test]
    fn test_outside_click_closes_unless_suppressed() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        h.ctrl.on_response(token, Ok(results("drill", &["A"])));

        assert!(h.event(HostEvent::Click { on_input: true, inside_panel: false }).is_empty());
        h.event(HostEvent::PointerDown { inside_panel: true });
        assert!(h.event(HostEvent::Click { on_input: false, inside_panel: false }).is_empty());

        h.now += ms(700);
        assert_eq!(h.event(HostEvent::Click { on_input: false, inside_panel: false }), vec![Effect::Hide]);
    }

    #[test]
    fn test_focus_in_reveals_cached_results() {
        let mut h = Harness::focused();
        let token = search(&mut h, "drill");
        h.ctrl.on_response(token, Ok(results("drill", &["A"])));
        h.event(HostEvent::Key(Key::Escape));

        let node = h.node;
        let effects = h.event(HostEvent::FocusIn { node });
        assert!(effects.iter().any(|e| matches!(e, Effect::Show(_))));
        assert!(effects.iter().any(|e| matches!(e, Effect::Position(_))));
        assert_eq!(h.ctrl.dropdown().state(), PanelState::Populated);
    }

    #[test]
    fn test_focus_out_grace_during_tap() {
        let mut h = Harness::focused();
        h.event(HostEvent::PointerDown { inside_panel: true });
        let node = h.node;
        h.event(HostEvent::FocusOut { node });

        h.type_text("drill");
        let effects = h.advance_to(ms(200));
        assert!(effects.is_empty());
        h.advance_to(ms(300));
        assert!(h.ctrl.debouncer.deadline().is_some());

        let mut h = Harness::focused();
        let node = h.node;
        h.event(HostEvent::FocusOut { node });
        h.type_text("drill");
        h.advance_to(ms(600));
        assert!(h.ctrl.in_flight().is_none());
    }

    #[test]
    fn test_touch_navigation_lock() {
        let mut h = Harness::focused();
        let href = Some("https://shop.test/p/1".to_string());

        assert!(h.event(HostEvent::TouchEnd { inside_panel: false, href: href.clone() }).is_empty());
        assert_eq!(
            h.event(HostEvent::TouchEnd { inside_panel: true, href: href.clone() }),
            vec![Effect::Navigate("https://shop.test/p/1".into())]
        );
        h.now += ms(1000);
        assert!(h.event(HostEvent::TouchEnd { inside_panel: true, href: href.clone() }).is_empty());
        h.now += ms(500);
        assert_eq!(h.event(HostEvent::TouchEnd { inside_panel: true, href }).len(), 1);
    }

    #[test]
    fn test_scroll_repositions() {
        let mut h = Harness::focused();
        h.page.scroll_to(0.0, 200.0);
        let effects = h.event(HostEvent::Scroll);
        assert_eq!(effects, vec![Effect::Position(PanelPosition { left: 100.0, top: 284.0, width: 320.0 })]);
    }
}
