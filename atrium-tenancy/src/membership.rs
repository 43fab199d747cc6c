//! Tenant membership models
//!
//! This module provides the Membership entity linking users to tenants,
//! plus the decision function that keeps membership writes idempotent and
//! the per-user default-tenant selection consistent.
//!
//! The core invariant: a user has at most one active membership with
//! `is_default = true`, and their first membership becomes the default
//! automatically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a tenant membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Membership is in force
    Active,
    /// Membership is retained but not in force
    Inactive,
}

impl MembershipStatus {
    /// Returns the wire identifier for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's membership in a tenant.
///
/// At most one row exists per (tenant, user); the store enforces that
/// uniqueness. Removal soft-deletes the row, and a later re-add reactivates
/// it instead of inserting a duplicate.
///
/// # Examples
///
/// ```
/// use atrium_tenancy::Membership;
/// use uuid::Uuid;
///
/// let membership = Membership::new(Uuid::now_v7(), Uuid::now_v7(), "member");
/// assert!(membership.is_live());
/// assert!(!membership.is_default);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Unique identifier
    pub id: Uuid,

    /// Tenant the user belongs to
    pub tenant_id: Uuid,

    /// The member
    pub user_id: Uuid,

    /// Role within the tenant, free-form
    pub role: String,

    /// Whether this tenant is the user's default
    pub is_default: bool,

    /// Membership status
    pub status: MembershipStatus,

    /// When the membership was created
    pub created_at: DateTime<Utc>,

    /// When the membership was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete timestamp; `None` while the membership exists
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Membership {
    /// Creates an active, non-default membership.
    pub fn new(tenant_id: Uuid, user_id: Uuid, role: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            tenant_id,
            user_id,
            role: role.into(),
            is_default: false,
            status: MembershipStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Sets the default flag.
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Whether the membership is active and not soft-deleted.
    pub fn is_live(&self) -> bool {
        self.status == MembershipStatus::Active && self.deleted_at.is_none()
    }

    /// Whether the membership counts toward the user's default selection:
    /// not deleted and flagged default.
    pub fn holds_default(&self) -> bool {
        self.is_default && self.deleted_at.is_none()
    }

    /// Marks the membership as removed at the given instant.
    pub fn mark_removed(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }
}

/// Write decision produced by [`plan_membership`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipPlan {
    /// An equivalent live membership already exists; nothing to write.
    Noop,
    /// Update the existing row to this reactivated state.
    Reactivate(Membership),
    /// Insert this fresh row.
    Insert(Membership),
}

/// Decides how to establish a membership for (tenant, user).
///
/// The same decision drives both the transactional path (owner membership
/// during tenant creation) and the direct path (AddMember):
///
/// - An existing live row means nothing to do.
/// - An existing dead row is reactivated in place: delete mark cleared,
///   status set active, the requested role applied. The default flag is
///   recomputed rather than carried over, since the dead row may still
///   hold a stale `is_default` from before its removal.
/// - Otherwise a fresh row is inserted.
///
/// In both write cases the row becomes the default when `force_default`
/// is set or the user holds no other live default membership, which makes
/// every user's first (or only remaining) membership their default.
///
/// `has_other_default` must reflect the user's non-deleted default
/// memberships at the time of the decision.
pub fn plan_membership(
    existing: Option<Membership>,
    tenant_id: Uuid,
    user_id: Uuid,
    role: &str,
    force_default: bool,
    has_other_default: bool,
) -> MembershipPlan {
    let is_default = force_default || !has_other_default;
    match existing {
        Some(membership) if membership.is_live() => MembershipPlan::Noop,
        Some(mut membership) => {
            membership.deleted_at = None;
            membership.status = MembershipStatus::Active;
            membership.role = role.to_string();
            membership.is_default = is_default;
            membership.updated_at = Utc::now();
            MembershipPlan::Reactivate(membership)
        }
        None => {
            let membership = Membership::new(tenant_id, user_id, role).with_default(is_default);
            MembershipPlan::Insert(membership)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dead_membership(tenant_id: Uuid, user_id: Uuid) -> Membership {
        let mut membership = Membership::new(tenant_id, user_id, "member");
        membership.mark_removed(Utc::now());
        membership
    }

    #[test]
    fn test_live_membership_is_noop() {
        let tenant_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let existing = Membership::new(tenant_id, user_id, "member");

        let plan = plan_membership(Some(existing), tenant_id, user_id, "owner", true, false);
        assert_eq!(plan, MembershipPlan::Noop);
    }

    #[test]
    fn test_dead_membership_is_reactivated() {
        let tenant_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let existing = dead_membership(tenant_id, user_id);
        let existing_id = existing.id;

        let plan = plan_membership(Some(existing), tenant_id, user_id, "auditor", false, true);
        match plan {
            MembershipPlan::Reactivate(membership) => {
                assert_eq!(membership.id, existing_id);
                assert!(membership.is_live());
                assert_eq!(membership.role, "auditor");
                assert!(!membership.is_default);
            }
            other => panic!("expected reactivate, got {other:?}"),
        }
    }

    #[test]
    fn test_reactivation_can_force_default() {
        let tenant_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let existing = dead_membership(tenant_id, user_id);

        let plan = plan_membership(Some(existing), tenant_id, user_id, "member", true, false);
        match plan {
            MembershipPlan::Reactivate(membership) => assert!(membership.is_default),
            other => panic!("expected reactivate, got {other:?}"),
        }
    }

    #[test]
    fn test_reactivation_drops_stale_default_flag() {
        let tenant_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        // The row was the default when it was removed, so the flag is
        // still set on the dead row. The user's default has since moved
        // to another tenant.
        let mut existing = Membership::new(tenant_id, user_id, "member").with_default(true);
        existing.mark_removed(Utc::now());

        let plan = plan_membership(Some(existing), tenant_id, user_id, "member", false, true);
        match plan {
            MembershipPlan::Reactivate(membership) => assert!(!membership.is_default),
            other => panic!("expected reactivate, got {other:?}"),
        }
    }

    #[test]
    fn test_reactivation_restores_default_when_user_has_none() {
        let tenant_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let existing = dead_membership(tenant_id, user_id);

        let plan = plan_membership(Some(existing), tenant_id, user_id, "member", false, false);
        match plan {
            MembershipPlan::Reactivate(membership) => assert!(membership.is_default),
            other => panic!("expected reactivate, got {other:?}"),
        }
    }

    #[test]
    fn test_first_membership_becomes_default() {
        let tenant_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();

        let plan = plan_membership(None, tenant_id, user_id, "member", false, false);
        match plan {
            MembershipPlan::Insert(membership) => {
                assert!(membership.is_default);
                assert_eq!(membership.role, "member");
                assert!(membership.is_live());
            }
            other => panic!("expected insert, got {other:?}"),
        }
    }

    #[test]
    fn test_later_membership_is_not_default() {
        let plan = plan_membership(None, Uuid::now_v7(), Uuid::now_v7(), "member", false, true);
        match plan {
            MembershipPlan::Insert(membership) => assert!(!membership.is_default),
            other => panic!("expected insert, got {other:?}"),
        }
    }

    #[test]
    fn test_forced_insert_overrides_existing_default() {
        let plan =
            plan_membership(None, Uuid::now_v7(), Uuid::now_v7(), "tenant_admin", true, true);
        match plan {
            MembershipPlan::Insert(membership) => {
                assert!(membership.is_default);
                assert_eq!(membership.role, "tenant_admin");
            }
            other => panic!("expected insert, got {other:?}"),
        }
    }
}
