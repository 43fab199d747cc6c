//! Subtree resolution
//!
//! [`SubtreeResolver`] answers the membership questions the access-control
//! layer asks: who belongs to a node, who belongs to a node's whole
//! subtree, and which organization is a user's primary one. Subtree
//! selection rides on the materialized path: every descendant's path
//! starts with the ancestor's path, so one prefix query replaces a
//! recursive walk.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{OrgUnitError, OrgUnitResult};
use crate::organization::OrgMembership;
use crate::store::OrgUnitStore;

/// Resolves organization membership sets and primary assignments.
#[derive(Clone)]
pub struct SubtreeResolver {
    store: Arc<dyn OrgUnitStore>,
}

impl std::fmt::Debug for SubtreeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubtreeResolver").finish()
    }
}

impl SubtreeResolver {
    /// Creates a new resolver.
    pub fn new(store: Arc<dyn OrgUnitStore>) -> Self {
        Self { store }
    }

    /// Returns the ids of users assigned directly to the organization.
    ///
    /// An unknown organization yields an empty list rather than an error;
    /// duplicates are removed with the first occurrence kept.
    pub async fn list_organization_user_ids(
        &self,
        domain_id: Uuid,
        organization_id: Uuid,
    ) -> OrgUnitResult<Vec<Uuid>> {
        let members = self.store.org_members(domain_id, organization_id).await?;
        Ok(unique_user_ids(members))
    }

    /// Returns the ids of users assigned anywhere in the organization's
    /// subtree, the organization itself included.
    ///
    /// # Errors
    ///
    /// * [`OrgUnitError::OrganizationNotFound`] when the subtree root does
    ///   not resolve within the domain
    pub async fn list_subtree_user_ids(
        &self,
        domain_id: Uuid,
        organization_id: Uuid,
    ) -> OrgUnitResult<Vec<Uuid>> {
        let root = self
            .store
            .node(domain_id, organization_id)
            .await?
            .ok_or(OrgUnitError::OrganizationNotFound)?;

        let nodes = self
            .store
            .nodes_with_path_prefix(domain_id, &root.path)
            .await?;
        if nodes.is_empty() {
            return Ok(Vec::new());
        }

        let organization_ids: Vec<Uuid> = nodes.into_iter().map(|n| n.id).collect();
        let members = self
            .store
            .members_of_orgs(domain_id, &organization_ids)
            .await?;
        Ok(unique_user_ids(members))
    }

    /// Returns the user's primary organization in the domain.
    ///
    /// When no membership carries the primary flag, the oldest membership
    /// stands in, so a transiently missing flag degrades instead of
    /// failing.
    ///
    /// # Errors
    ///
    /// * [`OrgUnitError::MembershipNotFound`] when the user has no
    ///   organization membership in the domain at all
    pub async fn primary_organization_id(
        &self,
        domain_id: Uuid,
        user_id: Uuid,
    ) -> OrgUnitResult<Uuid> {
        let memberships = self.store.user_org_memberships(domain_id, user_id).await?;

        if let Some(primary) = memberships.iter().find(|m| m.is_primary) {
            return Ok(primary.organization_id);
        }
        memberships
            .first()
            .map(|m| m.organization_id)
            .ok_or(OrgUnitError::MembershipNotFound)
    }
}

/// Deduplicates member rows down to user ids, preserving first-seen order.
fn unique_user_ids(members: Vec<OrgMembership>) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(members.len());
    members
        .into_iter()
        .filter_map(|m| seen.insert(m.user_id).then_some(m.user_id))
        .collect()
}
