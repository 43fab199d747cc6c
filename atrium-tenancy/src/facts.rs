//! Cross-module tenant queries
//!
//! Other subsystems consult tenant facts through the narrow
//! [`TenantFacts`] trait instead of depending on tenancy storage or the
//! full service surface. [`TenancyFacade`] adapts the tenancy services to
//! that trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TenancyResult;
use crate::lifecycle::TenantLifecycle;
use crate::members::MembershipReconciler;
use crate::tenant::{TenantDetails, TenantSummary};

/// Read-only tenant facts exposed to other subsystems.
#[async_trait]
pub trait TenantFacts: Send + Sync {
    /// Returns a tenant summary by id.
    async fn get_tenant(&self, id: Uuid) -> TenancyResult<TenantSummary>;

    /// Returns a tenant summary by code.
    async fn get_tenant_by_code(&self, code: &str) -> TenancyResult<TenantSummary>;

    /// Reports whether the user belongs to the tenant.
    async fn is_member(&self, tenant_id: Uuid, user_id: Uuid) -> TenancyResult<bool>;

    /// Resolves the domain id backing a tenant code.
    async fn domain_id(&self, code: &str) -> TenancyResult<Uuid>;
}

/// [`TenantFacts`] implementation backed by the tenancy services.
#[derive(Debug, Clone)]
pub struct TenancyFacade {
    lifecycle: TenantLifecycle,
    members: MembershipReconciler,
}

impl TenancyFacade {
    /// Creates a facade over the lifecycle and membership services.
    pub fn new(lifecycle: TenantLifecycle, members: MembershipReconciler) -> Self {
        Self { lifecycle, members }
    }
}

fn summarize(details: TenantDetails) -> TenantSummary {
    TenantSummary {
        id: details.id,
        code: details.code,
        name: details.name,
        status: details.status,
        domain_id: details.domain_id,
    }
}

#[async_trait]
impl TenantFacts for TenancyFacade {
    async fn get_tenant(&self, id: Uuid) -> TenancyResult<TenantSummary> {
        Ok(summarize(self.lifecycle.get_tenant(id).await?))
    }

    async fn get_tenant_by_code(&self, code: &str) -> TenancyResult<TenantSummary> {
        Ok(summarize(self.lifecycle.get_tenant_by_code(code).await?))
    }

    async fn is_member(&self, tenant_id: Uuid, user_id: Uuid) -> TenancyResult<bool> {
        self.members.is_member(tenant_id, user_id).await
    }

    async fn domain_id(&self, code: &str) -> TenancyResult<Uuid> {
        self.lifecycle.domain_id(code).await
    }
}
