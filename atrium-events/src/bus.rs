//! Event bus implementation
//!
//! This module provides the event bus abstraction and the in-memory
//! implementation used for single-process deployments and tests.

use crate::types::Event;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

#[cfg(feature = "memory")]
use std::collections::HashMap;
#[cfg(feature = "memory")]
use tokio::sync::RwLock;

/// Event bus error types.
#[derive(Debug, Error)]
pub enum EventBusError {
    /// Failed to publish event
    #[error("Failed to publish event: {0}")]
    PublishError(String),

    /// Failed to subscribe
    #[error("Failed to subscribe: {0}")]
    SubscribeError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A registered handler failed to process an event
    #[error("Handler failed: {0}")]
    HandlerError(String),

    /// Channel closed
    #[error("Channel closed")]
    ChannelClosed,
}

/// Result type for event bus operations.
pub type EventBusResult<T> = Result<T, EventBusError>;

/// Subscription handle for receiving events.
pub struct Subscription {
    /// Subscription ID
    pub id: String,
    /// Topic pattern
    pub topic: String,
    /// Event receiver
    pub receiver: broadcast::Receiver<Event>,
}

impl Subscription {
    /// Receive the next event.
    pub async fn recv(&mut self) -> EventBusResult<Event> {
        self.receiver
            .recv()
            .await
            .map_err(|_| EventBusError::ChannelClosed)
    }
}

/// Event handler trait for processing events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle an event.
    async fn handle(&self, event: Event) -> EventBusResult<()>;

    /// Get the topic patterns this handler is interested in.
    fn topics(&self) -> Vec<String>;
}

/// Event bus trait for publish/subscribe operations.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event.
    async fn publish(&self, event: Event) -> EventBusResult<()>;

    /// Subscribe to a topic pattern.
    ///
    /// Topic patterns support wildcards:
    /// - `*` matches any single segment
    /// - `#` matches zero or more segments
    ///
    /// Examples:
    /// - `tenancy.tenant.*` matches `tenancy.tenant.created`, `tenancy.tenant.updated`
    /// - `*.user.deleted` matches user deletion from any source module
    async fn subscribe(&self, topic: &str) -> EventBusResult<Subscription>;

    /// Register an event handler.
    async fn register_handler(&self, handler: Arc<dyn EventHandler>) -> EventBusResult<()>;
}

/// Check if a topic matches a wildcard pattern.
///
/// `*` consumes exactly one segment, `#` consumes any number of segments
/// including none.
pub(crate) fn topic_matches(pattern: &str, topic: &str) -> bool {
    fn segments_match(pattern: &[&str], topic: &[&str]) -> bool {
        let Some((head, rest)) = pattern.split_first() else {
            return topic.is_empty();
        };
        match *head {
            "#" => {
                if rest.is_empty() {
                    return true;
                }
                (0..=topic.len()).any(|skip| segments_match(rest, &topic[skip..]))
            }
            "*" => match topic.split_first() {
                Some((_, remaining)) => segments_match(rest, remaining),
                None => false,
            },
            literal => match topic.split_first() {
                Some((segment, remaining)) => {
                    literal == *segment && segments_match(rest, remaining)
                }
                None => false,
            },
        }
    }

    let pattern: Vec<&str> = pattern.split('.').collect();
    let topic: Vec<&str> = topic.split('.').collect();
    segments_match(&pattern, &topic)
}

/// In-memory event bus implementation.
///
/// Suitable for single-process applications and testing. Subscribers
/// receive matching events through broadcast channels; registered handlers
/// run on their own tasks so a slow handler cannot stall the publisher.
#[cfg(feature = "memory")]
pub struct MemoryEventBus {
    /// Topic subscribers
    subscribers: Arc<RwLock<HashMap<String, broadcast::Sender<Event>>>>,
    /// Registered handlers
    handlers: Arc<RwLock<Vec<Arc<dyn EventHandler>>>>,
    /// Default channel capacity
    channel_capacity: usize,
}

#[cfg(feature = "memory")]
impl std::fmt::Debug for MemoryEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEventBus")
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}

#[cfg(feature = "memory")]
impl MemoryEventBus {
    /// Create a new in-memory event bus.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create with custom channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            handlers: Arc::new(RwLock::new(Vec::new())),
            channel_capacity: capacity,
        }
    }
}

#[cfg(feature = "memory")]
impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "memory")]
#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: Event) -> EventBusResult<()> {
        let topic = event.topic();

        // Notify matching subscribers
        let subscribers = self.subscribers.read().await;
        for (pattern, sender) in subscribers.iter() {
            if topic_matches(pattern, &topic) {
                let _ = sender.send(event.clone());
            }
        }

        // Notify handlers
        let handlers = self.handlers.read().await;
        for handler in handlers.iter() {
            for handler_topic in handler.topics() {
                if topic_matches(&handler_topic, &topic) {
                    let handler = handler.clone();
                    let event = event.clone();
                    tokio::task::spawn(async move {
                        if let Err(error) = handler.handle(event).await {
                            tracing::error!(error = %error, "event handler failed");
                        }
                    });
                    break;
                }
            }
        }

        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> EventBusResult<Subscription> {
        let id = uuid::Uuid::now_v7().to_string();

        let receiver = {
            let mut subscribers = self.subscribers.write().await;

            if let Some(sender) = subscribers.get(topic) {
                sender.subscribe()
            } else {
                let (sender, receiver) = broadcast::channel(self.channel_capacity);
                subscribers.insert(topic.to_string(), sender);
                receiver
            }
        };

        Ok(Subscription {
            id,
            topic: topic.to_string(),
            receiver,
        })
    }

    async fn register_handler(&self, handler: Arc<dyn EventHandler>) -> EventBusResult<()> {
        let mut handlers = self.handlers.write().await;
        handlers.push(handler);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
