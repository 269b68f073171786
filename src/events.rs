//! Per-session publish/subscribe channel.

use serde::Serialize;
use serde_json::Value;

/// Listener name that receives every event.
pub const WILDCARD: &str = "all";

/// Event emitted by the editor when its content changed.
pub const CHANGED: &str = "changed";

/// A notification delivered to listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub name: String,
    pub args: Vec<Value>,
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type Callback = Box<dyn FnMut(&Event)>;

struct Listener {
    id: SubscriptionId,
    name: String,
    callback: Callback,
}

/// Named events with explicit subscription handles.
///
/// Listeners run synchronously in subscription order. A listener for
/// [`WILDCARD`] sees every event.
pub struct EventBus {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, name: &str, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            name: name.to_string(),
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver an event to its listeners and to wildcard listeners.
    pub fn notify(&mut self, name: &str, args: Vec<Value>) {
        let event = Event {
            name: name.to_string(),
            args,
        };
        tracing::trace!(target: "markwell::events", name, "notify");
        for listener in &mut self.listeners {
            if listener.name == name || listener.name == WILDCARD {
                (listener.callback)(&event);
            }
        }
    }
}
