//! Tenant lifecycle coordination
//!
//! [`TenantLifecycle`] orchestrates tenant provisioning and administration.
//! Creating a tenant is a multi-step unit: the tenant row, its backing
//! domain, the seeded baseline roles, and the owner membership all land
//! in one store transaction, so a failure at any step leaves no partial
//! state behind. Events are dispatched after the transaction commits and
//! never affect the outcome of the operation that produced them.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use atrium_core::{DomainDirectory, PageRequest, PageResult, RequestContext, RoleSeeder};
use atrium_events::{EventDispatcher, TenantEvent};

use crate::config::TenancyConfig;
use crate::error::{TenancyError, TenancyResult};
use crate::membership::{plan_membership, MembershipPlan};
use crate::store::{TenancyStore, TenancyTx, TenantFilter};
use crate::tenant::{CreateTenantInput, Tenant, TenantDetails, TenantRef, UpdateTenantInput};

/// Fails with [`TenancyError::PlatformDomainRequired`] unless the caller is
/// operating in the platform domain.
pub(crate) fn require_platform(ctx: &RequestContext) -> TenancyResult<()> {
    if ctx.is_platform_domain() {
        Ok(())
    } else {
        Err(TenancyError::PlatformDomainRequired)
    }
}

/// Service coordinating tenant create/update/delete and tenant lookups.
///
/// # Architecture
///
/// ```text
/// TenantLifecycle
///   ├─ TenancyStore      (tenant + membership rows, transactions)
///   ├─ DomainDirectory   (domain records, domain memberships)
///   ├─ RoleSeeder        (baseline roles per domain)
///   └─ EventDispatcher   (post-commit notifications)
/// ```
///
/// Administrative operations (create, update, delete, list) require a
/// platform-domain context. The single-tenant lookups are ungated so other
/// subsystems can consult tenant facts without platform privileges.
#[derive(Clone)]
pub struct TenantLifecycle {
    store: Arc<dyn TenancyStore>,
    directory: Arc<dyn DomainDirectory>,
    roles: Arc<dyn RoleSeeder>,
    events: EventDispatcher,
    config: TenancyConfig,
}

impl std::fmt::Debug for TenantLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantLifecycle")
            .field("config", &self.config)
            .finish()
    }
}

impl TenantLifecycle {
    /// Creates a new lifecycle service.
    ///
    /// # Arguments
    ///
    /// * `store` - Tenant and membership persistence
    /// * `directory` - Domain directory collaborator
    /// * `roles` - Baseline role seeder
    /// * `events` - Dispatcher for post-commit events
    /// * `config` - Tenancy configuration
    pub fn new(
        store: Arc<dyn TenancyStore>,
        directory: Arc<dyn DomainDirectory>,
        roles: Arc<dyn RoleSeeder>,
        events: EventDispatcher,
        config: TenancyConfig,
    ) -> Self {
        Self {
            store,
            directory,
            roles,
            events,
            config,
        }
    }

    /// Verifies store connectivity.
    pub async fn ping(&self) -> TenancyResult<()> {
        self.store.ping().await.map_err(Into::into)
    }

    /// Creates a tenant together with its domain, baseline roles, and
    /// owner membership.
    ///
    /// The tenant row, role seeding, and owner membership are committed as
    /// one transaction; any step failing rolls the whole unit back. When
    /// the context carries an acting user, that user becomes the owner and
    /// receives a default membership with the configured owner role.
    ///
    /// # Errors
    ///
    /// * [`TenancyError::PlatformDomainRequired`] outside the platform domain
    /// * [`TenancyError::InvalidTenant`] when code or name is blank
    /// * [`TenancyError::ParentTenantInvalid`] when the parent reference
    ///   does not resolve to a live tenant
    /// * [`TenancyError::TenantCodeExists`] when the code is already taken
    pub async fn create_tenant(
        &self,
        ctx: &RequestContext,
        input: CreateTenantInput,
    ) -> TenancyResult<TenantDetails> {
        require_platform(ctx)?;

        let code = input.code.trim().to_string();
        let name = input.name.trim().to_string();
        if code.is_empty() || name.is_empty() {
            return Err(TenancyError::invalid("code and name must be non-empty"));
        }

        // Parent lookups go through the store directly, so resolve before
        // the transaction takes hold of it.
        let parent_id = self.resolve_parent(input.parent.as_ref(), None).await?;

        let mut tenant = Tenant::new(code, name);
        tenant.description = input.description;
        tenant.parent_tenant_id = parent_id;
        tenant.owner_id = ctx.actor_id();
        if let Some(status) = input.status {
            tenant.status = status;
        }

        let mut tx = self.store.begin().await?;

        tx.insert_tenant(&tenant).await.map_err(|err| {
            if err.is_conflict() {
                TenancyError::TenantCodeExists
            } else {
                err.into()
            }
        })?;

        // The domain comes first so role seeding has its id.
        let domain = self
            .directory
            .ensure_domain(&self.config.domain_type_code, &tenant.code, &tenant.name)
            .await?;
        self.roles.seed_baseline_roles(domain.id).await?;

        if let Some(owner_id) = tenant.owner_id {
            self.directory
                .add_membership(domain.id, owner_id, &self.config.owner_role, true)
                .await?;
            ensure_membership_in_tx(
                tx.as_mut(),
                tenant.id,
                owner_id,
                true,
                &self.config.owner_role,
            )
            .await?;
        }

        tx.commit().await?;

        self.events
            .dispatch(vec![TenantEvent::Created {
                tenant_id: tenant.id,
                tenant_code: tenant.code.clone(),
                domain_id: Some(domain.id),
                actor_id: tenant.owner_id,
            }
            .to_event()])
            .await;

        Ok(TenantDetails::new(tenant, Some(domain.id)))
    }

    /// Updates the supplied fields of a tenant.
    ///
    /// Blank string fields are ignored rather than applied, so an update
    /// cannot clear a name or description. A supplied parent reference is
    /// validated the same way as on create, with the tenant's own id
    /// excluded as a parent candidate.
    pub async fn update_tenant(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: UpdateTenantInput,
    ) -> TenancyResult<TenantDetails> {
        require_platform(ctx)?;

        let mut tenant = self.load_live(id).await?;

        if let Some(parent_id) = self
            .resolve_parent(input.parent.as_ref(), Some(id))
            .await?
        {
            tenant.parent_tenant_id = Some(parent_id);
        }
        if let Some(name) = input.name {
            let name = name.trim();
            if !name.is_empty() {
                tenant.name = name.to_string();
            }
        }
        if let Some(description) = input.description {
            if !description.is_empty() {
                tenant.description = Some(description);
            }
        }
        if let Some(status) = input.status {
            tenant.status = status;
        }
        tenant.updated_at = Utc::now();

        self.store.update_tenant(&tenant).await?;

        let domain_id = self.resolve_domain_id_safe(&tenant.code).await;

        self.events
            .dispatch(vec![TenantEvent::Updated {
                tenant_id: tenant.id,
                tenant_code: tenant.code.clone(),
                domain_id,
                actor_id: ctx.actor_id(),
            }
            .to_event()])
            .await;

        Ok(TenantDetails::new(tenant, domain_id))
    }

    /// Soft-deletes a tenant.
    ///
    /// Memberships and organization data are left in place as historical
    /// rows pointing at the deleted tenant.
    pub async fn delete_tenant(&self, ctx: &RequestContext, id: Uuid) -> TenancyResult<()> {
        require_platform(ctx)?;

        let mut tenant = self.load_live(id).await?;
        tenant.mark_deleted(Utc::now());
        self.store.update_tenant(&tenant).await?;

        let domain_id = self.resolve_domain_id_safe(&tenant.code).await;

        self.events
            .dispatch(vec![TenantEvent::Deleted {
                tenant_id: tenant.id,
                tenant_code: tenant.code,
                domain_id,
                actor_id: ctx.actor_id(),
            }
            .to_event()])
            .await;

        Ok(())
    }

    /// Returns a page of tenants matching the filter, newest first.
    pub async fn list_tenants(
        &self,
        ctx: &RequestContext,
        filter: TenantFilter,
        page: PageRequest,
    ) -> TenancyResult<PageResult<TenantDetails>> {
        require_platform(ctx)?;

        let page = page.normalize();
        let result = self.store.list_tenants(&filter, page).await?;

        let mut items = Vec::with_capacity(result.items.len());
        for tenant in result.items {
            let domain_id = self.resolve_domain_id_safe(&tenant.code).await;
            items.push(TenantDetails::new(tenant, domain_id));
        }

        Ok(PageResult {
            items,
            total: result.total,
            page: result.page,
            page_size: result.page_size,
            total_pages: result.total_pages,
        })
    }

    /// Returns a tenant by id, including soft-deleted rows.
    ///
    /// Ungated: other subsystems use this to consult tenant facts.
    pub async fn get_tenant(&self, id: Uuid) -> TenancyResult<TenantDetails> {
        let tenant = self
            .store
            .tenant(id)
            .await?
            .ok_or(TenancyError::TenantNotFound)?;
        let domain_id = self.resolve_domain_id_safe(&tenant.code).await;
        Ok(TenantDetails::new(tenant, domain_id))
    }

    /// Returns a live tenant by code. Ungated.
    pub async fn get_tenant_by_code(&self, code: &str) -> TenancyResult<TenantDetails> {
        let tenant = self
            .store
            .tenant_by_code(code)
            .await?
            .ok_or(TenancyError::TenantNotFound)?;
        let domain_id = self.resolve_domain_id_safe(&tenant.code).await;
        Ok(TenantDetails::new(tenant, domain_id))
    }

    /// Resolves the domain id backing a tenant code. Ungated.
    pub async fn domain_id(&self, code: &str) -> TenancyResult<Uuid> {
        let domain = self
            .directory
            .resolve_domain(&self.config.domain_type_code, code)
            .await?;
        Ok(domain.id)
    }

    /// Loads a tenant by id, treating soft-deleted rows as absent.
    async fn load_live(&self, id: Uuid) -> TenancyResult<Tenant> {
        self.store
            .tenant(id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or(TenancyError::TenantNotFound)
    }

    /// Resolves an optional parent reference to a live tenant id.
    ///
    /// `own_id` excludes the tenant itself as its own parent on update.
    async fn resolve_parent(
        &self,
        parent: Option<&TenantRef>,
        own_id: Option<Uuid>,
    ) -> TenancyResult<Option<Uuid>> {
        let Some(parent) = parent else {
            return Ok(None);
        };

        let resolved = match parent {
            TenantRef::Id(id) => self.store.tenant(*id).await?.filter(|t| !t.is_deleted()),
            TenantRef::Code(code) => self.store.tenant_by_code(code).await?,
        };

        match resolved {
            Some(tenant) if own_id != Some(tenant.id) => Ok(Some(tenant.id)),
            _ => Err(TenancyError::ParentTenantInvalid),
        }
    }

    /// Resolves the domain id for a tenant code, swallowing lookup failures.
    pub(crate) async fn resolve_domain_id_safe(&self, code: &str) -> Option<Uuid> {
        match self
            .directory
            .resolve_domain(&self.config.domain_type_code, code)
            .await
        {
            Ok(domain) => Some(domain.id),
            Err(err) => {
                tracing::debug!(code = %code, error = %err, "tenant domain not resolved");
                None
            }
        }
    }
}

/// Creates or revives the (tenant, user) membership row inside `tx`.
///
/// An existing live row is left alone. A soft-deleted or inactive row is
/// reactivated with the supplied role. The written row becomes the user's
/// default when `force_default` is set or the user has no live default
/// membership anywhere.
pub(crate) async fn ensure_membership_in_tx(
    tx: &mut dyn TenancyTx,
    tenant_id: Uuid,
    user_id: Uuid,
    force_default: bool,
    role: &str,
) -> TenancyResult<()> {
    let existing = tx.find_membership(tenant_id, user_id).await?;
    let has_other_default = match &existing {
        Some(membership) if membership.is_live() => false,
        _ => tx.has_default_membership(user_id).await?,
    };

    match plan_membership(
        existing,
        tenant_id,
        user_id,
        role,
        force_default,
        has_other_default,
    ) {
        MembershipPlan::Noop => Ok(()),
        MembershipPlan::Reactivate(membership) => {
            tx.update_membership(&membership).await.map_err(Into::into)
        }
        MembershipPlan::Insert(membership) => {
            tx.insert_membership(&membership).await.map_err(Into::into)
        }
    }
}
