//! Async driver for [`WidgetController`].
//!
//! Runs the controller on a tokio task: host events arrive over a channel,
//! timers are a single `sleep_until` on the controller's next wakeup, and each
//! search runs as its own task that is aborted once superseded.

use std::sync::Arc;

use livesearch_client::{ProxyClient, ProxyConfig};
use livesearch_core::{Error, SearchBackend, SearchResponse};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::config::WidgetConfig;
use crate::controller::{Effect, HostEvent, RequestToken, WidgetController};
use crate::dropdown::PanelPosition;
use crate::host::InputHost;
use crate::view::ViewNode;

/// Where the panel lives. Implemented by the host adapter.
pub trait Surface {
    fn show(&mut self, panel: ViewNode);
    fn hide(&mut self);
    fn position(&mut self, position: PanelPosition);
    fn navigate(&mut self, url: &str);
    /// Hosts that dispatch events asynchronously can ignore this; default
    /// prevention only works while the original event is still being handled.
    fn prevent_default(&mut self) {}
}

type Outcome = (RequestToken, Result<SearchResponse, Error>);

pub struct WidgetRuntime<H, S> {
    controller: WidgetController,
    host: H,
    surface: S,
    backend: Arc<dyn SearchBackend>,
    search_task: Option<(RequestToken, JoinHandle<()>)>,
    outcomes_tx: mpsc::UnboundedSender<Outcome>,
    outcomes_rx: mpsc::UnboundedReceiver<Outcome>,
    origin: Instant,
}

impl<H: InputHost, S: Surface> WidgetRuntime<H, S> {
    pub fn new(config: WidgetConfig, host: H, surface: S, backend: Arc<dyn SearchBackend>) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            controller: WidgetController::new(config),
            host,
            surface,
            backend,
            search_task: None,
            outcomes_tx,
            outcomes_rx,
            origin: Instant::now(),
        }
    }

    /// Runtime talking to the proxy at `config.proxy_base_url`.
    pub fn with_proxy(config: WidgetConfig, host: H, surface: S) -> Result<Self, Error> {
        config.validate().map_err(|e| Error::InvalidInput(e.to_string()))?;
        let client = ProxyClient::new(ProxyConfig::new(config.proxy_base_url.clone()))?;
        Ok(Self::new(config, host, surface, Arc::new(client)))
    }

    pub fn controller(&self) -> &WidgetController {
        &self.controller
    }

    /// Drive the widget until the event channel closes.
    pub async fn run(mut self, mut events: mpsc::Receiver<HostEvent>) {
        let effects = self.controller.start(&self.host, self.origin.elapsed());
        self.apply(effects);

        loop {
            let wake = self.origin + self.controller.next_wakeup();
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    let effects = self.controller.handle(&self.host, event, self.origin.elapsed());
                    self.apply(effects);
                }
                Some((token, outcome)) = self.outcomes_rx.recv() => {
                    if self.search_task.as_ref().is_some_and(|(t, _)| *t == token) {
                        self.search_task = None;
                    }
                    let effects = self.controller.on_response(token, outcome);
                    self.apply(effects);
                }
                _ = time::sleep_until(wake) => {
                    let effects = self.controller.tick(&self.host, self.origin.elapsed());
                    self.apply(effects);
                }
            }
        }

        if let Some((_, task)) = self.search_task.take() {
            task.abort();
        }
        tracing::debug!("widget runtime stopped");
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch { token, query } => self.spawn_search(token, query),
                Effect::Cancel(token) => {
                    if let Some((current, task)) = self.search_task.take() {
                        if current == token {
                            task.abort();
                        } else {
                            self.search_task = Some((current, task));
                        }
                    }
                }
                Effect::Warm => {
                    let backend = Arc::clone(&self.backend);
                    tokio::spawn(async move {
                        if let Err(e) = backend.warm().await {
                            tracing::debug!(error = %e, "warm-up failed");
                        }
                    });
                }
                Effect::Show(panel) => self.surface.show(panel),
                Effect::Hide => self.surface.hide(),
                Effect::Position(position) => self.surface.position(position),
                Effect::Navigate(url) => self.surface.navigate(&url),
                Effect::PreventDefault => self.surface.prevent_default(),
            }
        }
    }

    fn spawn_search(&mut self, token: RequestToken, query: String) {
        if let Some((_, previous)) = self.search_task.take() {
            previous.abort();
        }
        let backend = Arc::clone(&self.backend);
        let tx = self.outcomes_tx.clone();
        let task = tokio::spawn(async move {
            let outcome = backend.search(&query).await;
            let _ = tx.send((token, outcome));
        });
        self.search_task = Some((token, task));
    }
}
