//! Named-event notification used for collision and trigger events.

use log::debug;
use std::collections::HashMap;

/// Receiver of events fired by the physics system.
pub trait EventSink {
    /// Delivers `name`. Returns true when some listener handled it.
    fn fire_event(&mut self, name: &str) -> bool;
}

/// Records every fired name, in order. Handy for tests and tools.
impl EventSink for Vec<String> {
    fn fire_event(&mut self, name: &str) -> bool {
        self.push(name.to_string());
        true
    }
}

type Subscriber = Box<dyn FnMut(&str) -> bool>;

/// Dispatches events by name to any number of subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<String, Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `name`. Callbacks run in subscription order.
    pub fn subscribe<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: FnMut(&str) -> bool + 'static,
    {
        self.subscribers
            .entry(name.into())
            .or_default()
            .push(Box::new(callback));
    }

    /// Drops every subscriber of `name`; returns how many there were.
    pub fn unsubscribe_all(&mut self, name: &str) -> usize {
        self.subscribers.remove(name).map_or(0, |subs| subs.len())
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.subscribers.get(name).map_or(0, Vec::len)
    }
}

impl EventSink for EventBus {
    /// Every subscriber of `name` is called, even after one reports it handled.
    fn fire_event(&mut self, name: &str) -> bool {
        let Some(subscribers) = self.subscribers.get_mut(name) else {
            debug!("Event '{}' has no subscribers", name);
            return false;
        };
        let mut handled = false;
        for callback in subscribers.iter_mut() {
            handled |= callback(name);
        }
        handled
    }
}
