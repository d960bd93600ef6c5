use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

/// Subscribing to this name receives every published event.
pub const WILDCARD: &str = "*";

pub const GOAL_CREATED: &str = "goal.created";
pub const GOAL_UPDATED: &str = "goal.updated";
pub const GOAL_COMPLETED: &str = "goal.completed";
pub const GOAL_DELETED: &str = "goal.deleted";
pub const REVIEW_CREATED: &str = "review.created";
pub const REVIEW_UPDATED: &str = "review.updated";
pub const REVIEW_COMPLETED: &str = "review.completed";
pub const REVIEW_DELETED: &str = "review.deleted";
pub const USER_UPDATED: &str = "user.updated";
pub const REMINDER_DUE: &str = "reminder.due";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    pub name: String,
    pub payload: Value,
    pub emitted_at: DateTime<Utc>,
}

type Handler = Arc<dyn Fn(&DomainEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    handlers: RwLock<HashMap<String, Vec<(u64, Handler)>>>,
}

impl Registry {
    fn remove(&self, name: &str, id: u64) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let Some(entries) = handlers.get_mut(name) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            handlers.remove(name);
        }
        removed
    }
}

/// In-process publish/subscribe bus for domain events. Cloning shares the
/// same registry; build a fresh bus for an isolated context.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Registry>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.registry.handlers.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("EventBus")
            .field("event_names", &handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[must_use = "dropping a subscription keeps the handler registered; call unsubscribe to remove it"]
pub struct Subscription {
    registry: Weak<Registry>,
    name: String,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.remove(&self.name, self.id),
            None => false,
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, name: &str, handler: F) -> Subscription
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let mut handlers = self.registry.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers
            .entry(name.to_string())
            .or_default()
            .push((id, Arc::new(handler)));
        Subscription {
            registry: Arc::downgrade(&self.registry),
            name: name.to_string(),
            id,
        }
    }

    /// Delivers the event to the handlers registered for `name` and then to
    /// wildcard handlers. Returns how many handlers ran to completion.
    pub fn publish(&self, name: &str, payload: Value) -> usize {
        let event = DomainEvent {
            name: name.to_string(),
            payload,
            emitted_at: Utc::now(),
        };

        // Dispatch runs on a snapshot so handlers may (un)subscribe freely.
        let targets = {
            let handlers = self.registry.handlers.read().unwrap_or_else(PoisonError::into_inner);
            let mut targets: Vec<Handler> = Vec::new();
            if name != WILDCARD {
                if let Some(entries) = handlers.get(name) {
                    targets.extend(entries.iter().map(|(_, handler)| handler.clone()));
                }
            }
            if let Some(entries) = handlers.get(WILDCARD) {
                targets.extend(entries.iter().map(|(_, handler)| handler.clone()));
            }
            targets
        };

        let mut delivered = 0usize;
        for handler in targets {
            match catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(()) => delivered += 1,
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|reason| reason.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    tracing::error!(event = %event.name, reason = %reason, "event handler failed");
                }
            }
        }
        tracing::debug!(event = %event.name, delivered, "event published");
        delivered
    }

    pub fn publish_json<T: Serialize>(&self, name: &str, payload: &T) -> usize {
        match serde_json::to_value(payload) {
            Ok(value) => self.publish(name, value),
            Err(error) => {
                tracing::error!(event = name, error = %error, "event payload could not be serialized");
                0
            }
        }
    }

    pub fn handler_count(&self, name: &str) -> usize {
        let handlers = self.registry.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.get(name).map(Vec::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, GOAL_COMPLETED, GOAL_CREATED, WILDCARD};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn delivers_to_matching_handlers_only() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let _subscription = bus.subscribe(GOAL_CREATED, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.publish(GOAL_CREATED, json!({ "id": "g1" })), 1);
        assert_eq!(bus.publish(GOAL_COMPLETED, json!({ "id": "g1" })), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let subscription = bus.subscribe(GOAL_CREATED, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(subscription.unsubscribe());
        bus.publish(GOAL_CREATED, json!({}));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.handler_count(GOAL_CREATED), 0);
    }

    #[test]
    fn wildcard_sees_every_event_with_its_name() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = bus.subscribe(WILDCARD, move |event| {
            sink.lock().expect("sink").push(event.name.clone());
        });

        bus.publish(GOAL_CREATED, json!({}));
        bus.publish("review.updated", json!({}));
        assert_eq!(*seen.lock().expect("seen"), vec!["goal.created", "review.updated"]);
    }

    #[test]
    fn panicking_handler_does_not_break_publisher() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let _faulty = bus.subscribe(GOAL_CREATED, |_| panic!("subscriber bug"));
        let _healthy = bus.subscribe(GOAL_CREATED, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.publish(GOAL_CREATED, json!({})), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handler_may_subscribe_during_dispatch() {
        let bus = EventBus::new();
        let inner_bus = bus.clone();
        let _subscription = bus.subscribe(GOAL_CREATED, move |_| {
            let _late = inner_bus.subscribe(GOAL_CREATED, |_| {});
        });
        assert_eq!(bus.publish(GOAL_CREATED, json!({})), 1);
        assert_eq!(bus.handler_count(GOAL_CREATED), 2);
    }

    #[test]
    fn separate_buses_are_isolated() {
        let first = EventBus::new();
        let second = EventBus::new();
        let _subscription = first.subscribe(GOAL_CREATED, |_| {});
        assert_eq!(second.publish(GOAL_CREATED, json!({})), 0);
    }
}
