//! Event types for cross-module communication
//!
//! This module defines the event envelope and the typed events exchanged
//! between the Atrium platform modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Cross-module event envelope.
///
/// All events are wrapped in this envelope which provides metadata
/// for routing, tracing, and processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    pub id: Uuid,

    /// Event name (e.g., "tenant.created", "user.deleted")
    pub name: String,

    /// Source module (e.g., "tenancy", "identity")
    pub source: String,

    /// Timestamp when event was created
    pub timestamp: DateTime<Utc>,

    /// Domain context
    pub domain_id: Option<Uuid>,

    /// User who triggered the event
    pub actor_id: Option<Uuid>,

    /// Event version for schema evolution
    pub version: u32,

    /// Event payload
    pub payload: serde_json::Value,

    /// Additional metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Event {
    /// Create a new event.
    ///
    /// # Arguments
    ///
    /// * `name` - The event name
    /// * `source` - The publishing module
    /// * `payload` - The event payload
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            source: source.into(),
            timestamp: Utc::now(),
            domain_id: None,
            actor_id: None,
            version: 1,
            payload,
            metadata: HashMap::new(),
        }
    }

    /// Set domain context.
    pub fn with_domain(mut self, domain_id: Uuid) -> Self {
        self.domain_id = Some(domain_id);
        self
    }

    /// Set the triggering user.
    pub fn with_actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Add metadata.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get the topic for this event.
    ///
    /// Topics are structured as: `{source}.{name}`
    pub fn topic(&self) -> String {
        format!("{}.{}", self.source, self.name)
    }

    /// Parse the payload into a specific type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

// ============================================================================
// Tenancy Events
// ============================================================================

/// Tenant lifecycle and membership events from the tenancy module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TenantEvent {
    /// Tenant was created
    Created {
        tenant_id: Uuid,
        tenant_code: String,
        domain_id: Option<Uuid>,
        actor_id: Option<Uuid>,
    },
    /// Tenant fields were updated
    Updated {
        tenant_id: Uuid,
        tenant_code: String,
        domain_id: Option<Uuid>,
        actor_id: Option<Uuid>,
    },
    /// Tenant was soft-deleted
    Deleted {
        tenant_id: Uuid,
        tenant_code: String,
        domain_id: Option<Uuid>,
        actor_id: Option<Uuid>,
    },
    /// A user joined the tenant
    MemberAdded {
        tenant_id: Uuid,
        user_id: Uuid,
        role: String,
        actor_id: Option<Uuid>,
    },
    /// A user left the tenant
    MemberRemoved {
        tenant_id: Uuid,
        user_id: Uuid,
        actor_id: Option<Uuid>,
    },
}

impl TenantEvent {
    /// The module that publishes these events.
    pub const SOURCE: &'static str = "tenancy";

    /// Stable event name carried in the envelope.
    pub fn event_name(&self) -> &'static str {
        match self {
            TenantEvent::Created { .. } => "tenant.created",
            TenantEvent::Updated { .. } => "tenant.updated",
            TenantEvent::Deleted { .. } => "tenant.deleted",
            TenantEvent::MemberAdded { .. } => "tenant.member.added",
            TenantEvent::MemberRemoved { .. } => "tenant.member.removed",
        }
    }

    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        Event::new(
            self.event_name(),
            Self::SOURCE,
            serde_json::to_value(self).unwrap(),
        )
    }
}

// ============================================================================
// Identity Events
// ============================================================================

/// User directory events consumed by the platform modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserEvent {
    /// User account was deleted
    Deleted { user_id: Uuid },
}

impl UserEvent {
    /// The module that publishes these events.
    pub const SOURCE: &'static str = "identity";

    /// Stable event name carried in the envelope.
    pub fn event_name(&self) -> &'static str {
        match self {
            UserEvent::Deleted { .. } => "user.deleted",
        }
    }

    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        Event::new(
            self.event_name(),
            Self::SOURCE,
            serde_json::to_value(self).unwrap(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_topic() {
        let event = Event::new("tenant.created", "tenancy", serde_json::json!({}));
        assert_eq!(event.topic(), "tenancy.tenant.created");
    }

    #[test]
    fn test_tenant_event_round_trip() {
        let tenant_id = Uuid::now_v7();
        let actor = Uuid::now_v7();

        let event = TenantEvent::MemberAdded {
            tenant_id,
            user_id: actor,
            role: "member".to_string(),
            actor_id: Some(actor),
        }
        .to_event();

        assert_eq!(event.name, "tenant.member.added");
        assert_eq!(event.source, "tenancy");

        let parsed: TenantEvent = event.parse_payload().unwrap();
        match parsed {
            TenantEvent::MemberAdded { tenant_id: t, role, .. } => {
                assert_eq!(t, tenant_id);
                assert_eq!(role, "member");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_user_event_name() {
        let event = UserEvent::Deleted {
            user_id: Uuid::now_v7(),
        }
        .to_event();
        assert_eq!(event.topic(), "identity.user.deleted");
    }

    #[test]
    fn test_envelope_builders() {
        let domain = Uuid::now_v7();
        let actor = Uuid::now_v7();

        let event = Event::new("tenant.updated", "tenancy", serde_json::json!({}))
            .with_domain(domain)
            .with_actor(actor)
            .with_metadata("request_id", serde_json::json!("r-1"));

        assert_eq!(event.domain_id, Some(domain));
        assert_eq!(event.actor_id, Some(actor));
        assert_eq!(event.version, 1);
        assert!(event.metadata.contains_key("request_id"));
    }
}
