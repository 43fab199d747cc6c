//! Org-unit storage traits
//!
//! The service owns path construction and the primary-demotion rule;
//! implementations of this trait own persistence and the uniqueness
//! constraints: (domain, path) is unique across nodes, which is what
//! rejects duplicate sibling codes, and at most one membership row exists
//! per (domain, organization, user).

use async_trait::async_trait;
use uuid::Uuid;

use atrium_core::StoreResult;

use crate::organization::{OrgMembership, OrganizationNode};

/// Storage backing the org-unit services.
///
/// All queries are domain-scoped; nodes and memberships from other
/// domains are never visible through these methods.
#[async_trait]
pub trait OrgUnitStore: Send + Sync {
    /// Verifies the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Inserts a node. Fails with a conflict when the domain already has
    /// a node with the same path.
    async fn insert_node(&self, node: &OrganizationNode) -> StoreResult<()>;

    /// Returns a node by id within the domain.
    async fn node(&self, domain_id: Uuid, id: Uuid) -> StoreResult<Option<OrganizationNode>>;

    /// Returns all of the domain's nodes ordered by path, so parents sort
    /// before their descendants.
    async fn nodes_in_domain(&self, domain_id: Uuid) -> StoreResult<Vec<OrganizationNode>>;

    /// Returns the domain's nodes whose path starts with `prefix`.
    async fn nodes_with_path_prefix(
        &self,
        domain_id: Uuid,
        prefix: &str,
    ) -> StoreResult<Vec<OrganizationNode>>;

    /// Inserts a membership row. Fails with a conflict when a row for
    /// (domain, organization, user) already exists.
    async fn insert_member(&self, membership: &OrgMembership) -> StoreResult<()>;

    /// Drops the primary flag from every membership the user holds in the
    /// domain.
    async fn clear_primary(&self, domain_id: Uuid, user_id: Uuid) -> StoreResult<()>;

    /// Returns the members assigned directly to the organization, oldest
    /// first.
    async fn org_members(
        &self,
        domain_id: Uuid,
        organization_id: Uuid,
    ) -> StoreResult<Vec<OrgMembership>>;

    /// Returns the members of every listed organization, oldest first.
    async fn members_of_orgs(
        &self,
        domain_id: Uuid,
        organization_ids: &[Uuid],
    ) -> StoreResult<Vec<OrgMembership>>;

    /// Returns the user's memberships in the domain, oldest first.
    async fn user_org_memberships(
        &self,
        domain_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<OrgMembership>>;
}
