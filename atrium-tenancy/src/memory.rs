//! In-memory tenancy store
//!
//! Single-process implementation of [`TenancyStore`] for tests and
//! embedders that run without a relational backend. State lives behind
//! `Arc<RwLock<...>>`; a transaction takes the write lock for its whole
//! lifetime and keeps a snapshot of the pre-transaction state, so other
//! operations wait while one is open and an uncommitted transaction
//! restores the snapshot when dropped.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use atrium_core::{PageRequest, PageResult, StoreError, StoreResult};

use crate::membership::Membership;
use crate::store::{TenancyStore, TenancyTx, TenantFilter};
use crate::tenant::Tenant;

#[derive(Clone, Default)]
struct TenancyState {
    tenants: HashMap<Uuid, Tenant>,
    memberships: HashMap<Uuid, Membership>,
}

impl TenancyState {
    fn insert_tenant(&mut self, tenant: &Tenant) -> StoreResult<()> {
        if self.tenants.contains_key(&tenant.id) {
            return Err(StoreError::conflict("tenant"));
        }
        // Codes are never recycled: deleted rows still hold theirs.
        if self.tenants.values().any(|t| t.code == tenant.code) {
            return Err(StoreError::conflict("tenant"));
        }
        self.tenants.insert(tenant.id, tenant.clone());
        Ok(())
    }

    fn update_tenant(&mut self, tenant: &Tenant) -> StoreResult<()> {
        match self.tenants.get_mut(&tenant.id) {
            Some(row) => {
                *row = tenant.clone();
                Ok(())
            }
            None => Err(StoreError::not_found("tenant")),
        }
    }

    fn find_membership(&self, tenant_id: Uuid, user_id: Uuid) -> Option<Membership> {
        self.memberships
            .values()
            .find(|m| m.tenant_id == tenant_id && m.user_id == user_id)
            .cloned()
    }

    fn has_default_membership(&self, user_id: Uuid) -> bool {
        self.memberships
            .values()
            .any(|m| m.user_id == user_id && m.holds_default())
    }

    fn insert_membership(&mut self, membership: &Membership) -> StoreResult<()> {
        if self.memberships.contains_key(&membership.id)
            || self.find_membership(membership.tenant_id, membership.user_id).is_some()
        {
            return Err(StoreError::conflict("membership"));
        }
        self.memberships.insert(membership.id, membership.clone());
        Ok(())
    }

    fn update_membership(&mut self, membership: &Membership) -> StoreResult<()> {
        match self.memberships.get_mut(&membership.id) {
            Some(row) => {
                *row = membership.clone();
                Ok(())
            }
            None => Err(StoreError::not_found("membership")),
        }
    }
}

/// In-memory [`TenancyStore`].
///
/// Clones share the same state. A transaction opened with `begin` holds
/// the store's write lock until it commits, rolls back, or is dropped.
#[derive(Clone, Default)]
pub struct MemoryTenancyStore {
    state: Arc<RwLock<TenancyState>>,
}

impl std::fmt::Debug for MemoryTenancyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTenancyStore").finish()
    }
}

impl MemoryTenancyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

struct MemoryTenancyTx {
    guard: OwnedRwLockWriteGuard<TenancyState>,
    snapshot: Option<TenancyState>,
    committed: bool,
}

impl Drop for MemoryTenancyTx {
    fn drop(&mut self) {
        if !self.committed {
            if let Some(snapshot) = self.snapshot.take() {
                *self.guard = snapshot;
            }
        }
    }
}

#[async_trait]
impl TenancyTx for MemoryTenancyTx {
    async fn insert_tenant(&mut self, tenant: &Tenant) -> StoreResult<()> {
        self.guard.insert_tenant(tenant)
    }

    async fn find_membership(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Membership>> {
        Ok(self.guard.find_membership(tenant_id, user_id))
    }

    async fn has_default_membership(&mut self, user_id: Uuid) -> StoreResult<bool> {
        Ok(self.guard.has_default_membership(user_id))
    }

    async fn insert_membership(&mut self, membership: &Membership) -> StoreResult<()> {
        self.guard.insert_membership(membership)
    }

    async fn update_membership(&mut self, membership: &Membership) -> StoreResult<()> {
        self.guard.update_membership(membership)
    }

    async fn commit(mut self: Box<Self>) -> StoreResult<()> {
        // The guard is still held, so the flag flip and the drop that
        // publishes the writes happen with no await point between them.
        self.committed = true;
        self.snapshot = None;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        // Dropping uncommitted restores the snapshot.
        Ok(())
    }
}

#[async_trait]
impl TenancyStore for MemoryTenancyStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn begin(&self) -> StoreResult<Box<dyn TenancyTx>> {
        let guard = self.state.clone().write_owned().await;
        let snapshot = Some(guard.clone());
        Ok(Box::new(MemoryTenancyTx {
            guard,
            snapshot,
            committed: false,
        }))
    }

    async fn tenant(&self, id: Uuid) -> StoreResult<Option<Tenant>> {
        let state = self.state.read().await;
        Ok(state.tenants.get(&id).cloned())
    }

    async fn tenant_by_code(&self, code: &str) -> StoreResult<Option<Tenant>> {
        let state = self.state.read().await;
        Ok(state
            .tenants
            .values()
            .find(|t| t.code == code && !t.is_deleted())
            .cloned())
    }

    async fn tenants_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Tenant>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.tenants.get(id))
            .cloned()
            .collect())
    }

    async fn list_tenants(
        &self,
        filter: &TenantFilter,
        page: PageRequest,
    ) -> StoreResult<PageResult<Tenant>> {
        let state = self.state.read().await;
        let query = filter.query.as_ref().map(|q| q.to_lowercase());

        let mut matches: Vec<Tenant> = state
            .tenants
            .values()
            .filter(|t| filter.include_deleted || !t.is_deleted())
            .filter(|t| filter.status.is_none_or(|status| t.status == status))
            .filter(|t| {
                query.as_ref().is_none_or(|q| {
                    t.code.to_lowercase().contains(q) || t.name.to_lowercase().contains(q)
                })
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matches.len() as u64;
        let start = page.offset().min(matches.len());
        let end = (start + page.page_size as usize).min(matches.len());
        Ok(PageResult::new(matches[start..end].to_vec(), total, page))
    }

    async fn update_tenant(&self, tenant: &Tenant) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.update_tenant(tenant)
    }

    async fn find_membership(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Membership>> {
        let state = self.state.read().await;
        Ok(state.find_membership(tenant_id, user_id))
    }

    async fn user_memberships(&self, user_id: Uuid) -> StoreResult<Vec<Membership>> {
        let state = self.state.read().await;
        let mut rows: Vec<Membership> = state
            .memberships
            .values()
            .filter(|m| m.user_id == user_id && m.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn active_members(&self, tenant_id: Uuid) -> StoreResult<Vec<Membership>> {
        let state = self.state.read().await;
        let mut rows: Vec<Membership> = state
            .memberships
            .values()
            .filter(|m| m.tenant_id == tenant_id && m.is_live())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn list_members(
        &self,
        tenant_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<PageResult<Membership>> {
        let state = self.state.read().await;
        let mut rows: Vec<Membership> = state
            .memberships
            .values()
            .filter(|m| m.tenant_id == tenant_id && m.is_live())
            .cloned()
            .collect();

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = rows.len() as u64;
        let start = page.offset().min(rows.len());
        let end = (start + page.page_size as usize).min(rows.len());
        Ok(PageResult::new(rows[start..end].to_vec(), total, page))
    }

    async fn has_default_membership(&self, user_id: Uuid) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state.has_default_membership(user_id))
    }

    async fn insert_membership(&self, membership: &Membership) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.insert_membership(membership)
    }

    async fn update_membership(&self, membership: &Membership) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.update_membership(membership)
    }
}
