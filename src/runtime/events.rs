//! Named-event emitter shared by the runtime components.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

pub const LOADING_START: &str = "loading:start";
pub const LOADING_PROGRESS: &str = "loading:progress";
pub const LOADING_COMPLETE: &str = "loading:complete";
pub const LOADING_ERROR: &str = "loading:error";
pub const LOADING_RETRY: &str = "loading:retry";
pub const MANIFEST_LOADED: &str = "manifest:loaded";
pub const APP_READY: &str = "app:ready";
pub const RELOAD_REQUESTED: &str = "reload:requested";

type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: FxHashMap<String, Vec<(u64, Handler)>>,
}

/// Event emitter. Cloning shares the subscriber registry.
#[derive(Clone, Default)]
pub struct EventBridge {
    registry: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        let mut names: Vec<_> = registry.handlers.keys().collect();
        names.sort();
        f.debug_struct("EventBridge").field("events", &names).finish()
    }
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `event`.
    pub fn on<F>(&self, event: &str, handler: F) -> Unsubscribe
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .handlers
            .entry(event.to_string())
            .or_default()
            .push((id, Arc::new(handler)));

        Unsubscribe {
            registry: Arc::downgrade(&self.registry),
            event: event.to_string(),
            id,
        }
    }

    /// Call the subscribers of `event` in subscription order.
    ///
    /// The subscriber list is copied before dispatch, so handlers may
    /// subscribe, unsubscribe or emit without affecting this round.
    pub fn emit(&self, event: &str, payload: &Value) {
        let snapshot: Vec<Handler> = {
            let registry = self.registry.lock();
            match registry.handlers.get(event) {
                Some(list) => list.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => return,
            }
        };
        for handler in snapshot {
            handler(payload);
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.registry
            .lock()
            .handlers
            .get(event)
            .map_or(0, Vec::len)
    }
}

/// Handle returned by [`EventBridge::on`].
///
/// Dropping the handle keeps the subscription; call
/// [`Unsubscribe::unsubscribe`] to remove it.
#[must_use = "keep the handle to be able to unsubscribe"]
#[derive(Debug)]
pub struct Unsubscribe {
    registry: Weak<Mutex<Registry>>,
    event: String,
    id: u64,
}

impl Unsubscribe {
    pub fn unsubscribe(self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.lock();
        if let Some(list) = registry.handlers.get_mut(&self.event) {
            list.retain(|(id, _)| *id != self.id);
            if list.is_empty() {
                registry.handlers.remove(&self.event);
            }
        }
    }
}
