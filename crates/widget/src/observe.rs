//! Value and input observation.
//!
//! Storefront themes set the field value from script and re-render the header
//! without firing input events, so both the value and the element itself are
//! polled: the value every `value_poll` while focused, the element every
//! `rebind_poll` regardless.

use std::time::Duration;

use crate::discovery::find_search_input;
use crate::host::{InputHost, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// The focused active input holds a different value than last seen.
    ValueChanged { node: NodeId, value: String },
    /// Discovery now resolves to a different, focused element.
    Rebound { node: NodeId },
}

#[derive(Debug, Clone)]
pub struct PollingObserver {
    value_period: Duration,
    rebind_period: Duration,
    active: Option<NodeId>,
    last_value: String,
    polling: bool,
    stop_at: Option<Duration>,
    next_value_poll: Duration,
    next_rebind_poll: Duration,
}

impl PollingObserver {
    pub fn new(value_period: Duration, rebind_period: Duration) -> Self {
        Self {
            value_period,
            rebind_period,
            active: None,
            last_value: String::new(),
            polling: false,
            stop_at: None,
            next_value_poll: Duration::ZERO,
            next_rebind_poll: rebind_period,
        }
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn last_value(&self) -> &str {
        &self.last_value
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// Attach to `node` and start value polling if it is not already running.
    pub fn bind(&mut self, node: NodeId, value: String, now: Duration) {
        self.active = Some(node);
        self.last_value = value;
        self.stop_at = None;
        if !self.polling {
            self.polling = true;
            self.next_value_poll = now + self.value_period;
        }
    }

    /// Stop value polling, optionally after a grace period.
    pub fn stop(&mut self, now: Duration, grace: Option<Duration>) {
        match grace {
            Some(delay) if self.polling => self.stop_at = Some(now + delay),
            _ => {
                self.polling = false;
                self.stop_at = None;
            }
        }
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do.
    pub fn next_wakeup(&self) -> Duration {
        let mut at = self.next_rebind_poll;
        if self.polling {
            at = at.min(self.next_value_poll);
        }
        if let Some(stop) = self.stop_at {
            at = at.min(stop);
        }
        at
    }

    pub fn poll(&mut self, host: &impl InputHost, now: Duration) -> Vec<Observation> {
        let mut observations = Vec::new();

        if let Some(stop) = self.stop_at
            && now >= stop
        {
            self.polling = false;
            self.stop_at = None;
        }

        if now >= self.next_rebind_poll {
            self.next_rebind_poll = now + self.rebind_period;
            if let Some(found) = find_search_input(&host.inputs())
                && host.focused() == Some(found)
                && self.active != Some(found)
            {
                self.active = Some(found);
                observations.push(Observation::Rebound { node: found });
            }
        }

        if self.polling && now >= self.next_value_poll {
            self.next_value_poll = now + self.value_period;
            if let Some(node) = self.active
                && host.focused() == Some(node)
            {
                let value = host.value(node).unwrap_or_default();
                if value != self.last_value {
                    self.last_value.clone_from(&value);
                    observations.push(Observation::ValueChanged { node, value });
                }
            }
        }

        observations
    }
}
