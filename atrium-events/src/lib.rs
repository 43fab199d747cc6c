//! # Atrium Events
//!
//! This crate provides the event plumbing for the Atrium platform: the
//! event envelope, strongly-typed tenancy and identity events, the bus
//! abstraction, and the post-commit dispatcher used by mutating services.
//!
//! ## Overview
//!
//! The atrium-events crate handles:
//! - **Event envelope**: Generic event record with source, name, and payload
//! - **Typed events**: `TenantEvent` and `UserEvent` payloads with stable names
//! - **Event bus**: Publish/subscribe messaging with wildcard topics
//! - **Dispatcher**: Best-effort publication of post-commit event lists
//!
//! ## Usage
//!
//! ### Publishing events
//!
//! ```rust,no_run
//! use atrium_events::{EventBus, MemoryEventBus, TenantEvent};
//! use uuid::Uuid;
//!
//! async fn publish_example() {
//!     let bus = MemoryEventBus::new();
//!
//!     let event = TenantEvent::Created {
//!         tenant_id: Uuid::now_v7(),
//!         tenant_code: "acme".to_string(),
//!         domain_id: Some(Uuid::now_v7()),
//!         actor_id: Some(Uuid::now_v7()),
//!     };
//!
//!     bus.publish(event.to_event()).await.unwrap();
//! }
//! ```
//!
//! ### Subscribing to events
//!
//! ```rust,no_run
//! use atrium_events::{EventBus, MemoryEventBus};
//!
//! async fn subscribe_example() {
//!     let bus = MemoryEventBus::new();
//!
//!     // All tenant events from the tenancy module
//!     let mut sub = bus.subscribe("tenancy.tenant.*").await.unwrap();
//!
//!     while let Ok(event) = sub.recv().await {
//!         println!("received: {}", event.name);
//!     }
//! }
//! ```
//!
//! ## Topic Patterns
//!
//! Topics are structured as `{source}.{event name}`:
//! - `tenancy.tenant.created` - Specific event
//! - `tenancy.tenant.*` - All tenant lifecycle events
//! - `*.user.deleted` - User deletion from any source module
//! - `#` - All events
//!
//! Wildcards:
//! - `*` matches exactly one segment
//! - `#` matches zero or more segments
//!
//! ## Feature Flags
//!
//! - `memory` (default): In-memory event bus for single-process apps

pub mod bus;
pub mod dispatcher;
pub mod types;

// Re-export main types
pub use bus::{EventBus, EventBusError, EventBusResult, EventHandler, Subscription};
pub use dispatcher::EventDispatcher;
pub use types::{Event, TenantEvent, UserEvent};

#[cfg(feature = "memory")]
pub use bus::MemoryEventBus;
