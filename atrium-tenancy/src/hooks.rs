//! Event hooks
//!
//! Connects the membership reconciler to the event bus so tenant
//! memberships stay consistent with upstream identity changes.

use std::sync::Arc;

use async_trait::async_trait;

use atrium_events::{Event, EventBusError, EventBusResult, EventHandler, UserEvent};

use crate::members::MembershipReconciler;

/// Sweeps a user's tenant memberships when a user-deletion event arrives.
///
/// Register with the event bus; it listens for `user.deleted` events from
/// any source. Payloads that do not parse as user events are logged and
/// ignored so unrelated publishers cannot break the subscription.
#[derive(Debug)]
pub struct MembershipCleanupHandler {
    reconciler: Arc<MembershipReconciler>,
}

impl MembershipCleanupHandler {
    /// Creates a handler backed by the given reconciler.
    pub fn new(reconciler: Arc<MembershipReconciler>) -> Self {
        Self { reconciler }
    }
}

#[async_trait]
impl EventHandler for MembershipCleanupHandler {
    async fn handle(&self, event: Event) -> EventBusResult<()> {
        let parsed = match event.parse_payload::<UserEvent>() {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::warn!(
                    topic = %event.topic(),
                    error = %error,
                    "ignoring unrecognized user event payload"
                );
                return Ok(());
            }
        };

        let UserEvent::Deleted { user_id } = parsed;
        self.reconciler
            .on_user_deleted(user_id)
            .await
            .map_err(|err| EventBusError::HandlerError(err.to_string()))
    }

    fn topics(&self) -> Vec<String> {
        vec!["*.user.deleted".to_string()]
    }
}
