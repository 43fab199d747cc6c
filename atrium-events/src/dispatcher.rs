//! Post-commit event dispatch
//!
//! Mutating service operations collect the events they owe into a list and
//! hand it to the dispatcher after their storage work has committed.
//! Publication is best-effort: a publish failure is logged and never
//! surfaced to the operation that emitted the event, so notification
//! problems cannot fail committed business work.

use std::sync::Arc;

use crate::bus::EventBus;
use crate::types::Event;

/// Publishes post-commit event lists against an [`EventBus`].
#[derive(Clone)]
pub struct EventDispatcher {
    bus: Arc<dyn EventBus>,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher").finish()
    }
}

impl EventDispatcher {
    /// Creates a dispatcher over the given bus.
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }

    /// The bus this dispatcher publishes to.
    ///
    /// Exposed so embedders can register handlers and subscriptions on the
    /// same bus their services publish through.
    pub fn bus(&self) -> Arc<dyn EventBus> {
        self.bus.clone()
    }

    /// Publishes a single event, swallowing and logging any failure.
    pub async fn dispatch_one(&self, event: Event) {
        let topic = event.topic();
        if let Err(error) = self.bus.publish(event).await {
            tracing::warn!(topic = %topic, error = %error, "failed to publish event");
        }
    }

    /// Publishes every event in a post-commit list, in order.
    pub async fn dispatch(&self, events: Vec<Event>) {
        for event in events {
            self.dispatch_one(event).await;
        }
    }
}
