//! Tenancy storage traits
//!
//! The services own the business rules; implementations of these traits
//! own persistence and the uniqueness constraints: tenant codes are unique
//! across all rows (soft-deleted ones included, so codes are never
//! recycled), and at most one membership row exists per (tenant, user).
//! A partial unique index on (user, is_default = true) over non-deleted
//! memberships is the recommended storage-level backstop for the
//! single-default invariant; the services tolerate its absence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_core::{PageRequest, PageResult, StoreResult};

use crate::membership::Membership;
use crate::tenant::{Tenant, TenantStatus};

/// Filters applied by [`TenancyStore::list_tenants`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantFilter {
    /// Case-insensitive substring matched against code and name
    pub query: Option<String>,

    /// Only tenants with this status
    pub status: Option<TenantStatus>,

    /// Include soft-deleted tenants
    pub include_deleted: bool,
}

impl TenantFilter {
    /// Creates an empty filter matching all live tenants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the substring query.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets the status filter.
    pub fn with_status(mut self, status: TenantStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Includes soft-deleted tenants in the listing.
    pub fn including_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }
}

/// A tenancy transaction.
///
/// Writes issued through a transaction become visible to the rest of the
/// store only on [`TenancyTx::commit`]. Dropping an uncommitted transaction
/// discards its writes, so early returns roll back without ceremony.
#[async_trait]
pub trait TenancyTx: Send {
    /// Inserts a tenant row. Fails with a conflict when any tenant row,
    /// deleted or not, already uses the code.
    async fn insert_tenant(&mut self, tenant: &Tenant) -> StoreResult<()>;

    /// Returns the membership row for (tenant, user) regardless of status
    /// or deletion.
    async fn find_membership(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Membership>>;

    /// Whether the user holds any non-deleted default membership.
    async fn has_default_membership(&mut self, user_id: Uuid) -> StoreResult<bool>;

    /// Inserts a membership row. Fails with a conflict when a row for
    /// (tenant, user) already exists.
    async fn insert_membership(&mut self, membership: &Membership) -> StoreResult<()>;

    /// Replaces the membership row with the same id.
    async fn update_membership(&mut self, membership: &Membership) -> StoreResult<()>;

    /// Makes the transaction's writes visible. Implementations must apply
    /// the commit atomically: once this returns, either all writes are
    /// visible or, on error, none are.
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Discards the transaction's writes.
    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Storage backing the tenancy services.
///
/// Read methods never filter by tenant context: membership queries span
/// all tenants by construction, which is what the cross-tenant paths
/// (default reassignment, self-service listings, deletion sweeps) rely on.
#[async_trait]
pub trait TenancyStore: Send + Sync {
    /// Verifies the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Opens a transaction.
    async fn begin(&self) -> StoreResult<Box<dyn TenancyTx>>;

    /// Returns a tenant by id, including soft-deleted rows.
    async fn tenant(&self, id: Uuid) -> StoreResult<Option<Tenant>>;

    /// Returns the live tenant with the given code.
    async fn tenant_by_code(&self, code: &str) -> StoreResult<Option<Tenant>>;

    /// Returns the tenants whose ids appear in `ids`, in no particular
    /// order. Missing ids are skipped.
    async fn tenants_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Tenant>>;

    /// Lists tenants matching the filter, newest first.
    async fn list_tenants(
        &self,
        filter: &TenantFilter,
        page: PageRequest,
    ) -> StoreResult<PageResult<Tenant>>;

    /// Replaces the tenant row with the same id.
    async fn update_tenant(&self, tenant: &Tenant) -> StoreResult<()>;

    /// Returns the membership row for (tenant, user) regardless of status
    /// or deletion.
    async fn find_membership(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Membership>>;

    /// Returns the user's non-deleted memberships across all tenants.
    async fn user_memberships(&self, user_id: Uuid) -> StoreResult<Vec<Membership>>;

    /// Returns the tenant's live memberships.
    async fn active_members(&self, tenant_id: Uuid) -> StoreResult<Vec<Membership>>;

    /// Lists the tenant's live memberships, newest first.
    async fn list_members(
        &self,
        tenant_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<PageResult<Membership>>;

    /// Whether the user holds any non-deleted default membership.
    async fn has_default_membership(&self, user_id: Uuid) -> StoreResult<bool>;

    /// Inserts a membership row. Fails with a conflict when a row for
    /// (tenant, user) already exists.
    async fn insert_membership(&self, membership: &Membership) -> StoreResult<()>;

    /// Replaces the membership row with the same id.
    async fn update_membership(&self, membership: &Membership) -> StoreResult<()>;
}
