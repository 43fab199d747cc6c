//! Membership reconciliation
//!
//! [`MembershipReconciler`] maintains tenant membership rows: adding and
//! removing members, keeping each user's single default tenant assigned,
//! rejecting duplicate identities within a tenant, and sweeping
//! memberships when a user is deleted upstream.
//!
//! Unlike tenant creation, membership mutations are not wrapped in one
//! transaction; each write commits on its own. A crash between removing a
//! default membership and promoting the next one can briefly leave a user
//! with no default tenant, which is an accepted recoverable state.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_core::{DomainDirectory, PageRequest, PageResult, RequestContext, UserLookup};
use atrium_events::{EventDispatcher, TenantEvent};

use crate::config::TenancyConfig;
use crate::error::{TenancyError, TenancyResult};
use crate::lifecycle::require_platform;
use crate::membership::{plan_membership, Membership, MembershipPlan};
use crate::store::TenancyStore;
use crate::tenant::{Tenant, TenantStatus};

/// A tenant member joined with the user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantMember {
    /// User id
    pub user_id: Uuid,

    /// Username from the user profile
    pub username: String,

    /// Email from the user profile
    pub email: String,

    /// Display name from the user profile
    pub display_name: String,

    /// User account status
    pub status: String,

    /// Role within the tenant
    pub role: String,

    /// Whether this tenant is the user's default
    pub is_default: bool,
}

/// A tenant as seen from one user's membership list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyTenant {
    /// Tenant id
    pub tenant_id: Uuid,

    /// Tenant code
    pub code: String,

    /// Tenant name
    pub name: String,

    /// Tenant status
    pub status: TenantStatus,

    /// The user's role within the tenant
    pub role: String,

    /// Whether this tenant is the user's default
    pub is_default: bool,
}

/// Service maintaining tenant memberships and the per-user default flag.
#[derive(Clone)]
pub struct MembershipReconciler {
    store: Arc<dyn TenancyStore>,
    directory: Arc<dyn DomainDirectory>,
    lookup: Arc<dyn UserLookup>,
    events: EventDispatcher,
    config: TenancyConfig,
}

impl std::fmt::Debug for MembershipReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipReconciler")
            .field("config", &self.config)
            .finish()
    }
}

impl MembershipReconciler {
    /// Creates a new membership reconciler.
    pub fn new(
        store: Arc<dyn TenancyStore>,
        directory: Arc<dyn DomainDirectory>,
        lookup: Arc<dyn UserLookup>,
        events: EventDispatcher,
        config: TenancyConfig,
    ) -> Self {
        Self {
            store,
            directory,
            lookup,
            events,
            config,
        }
    }

    /// Adds a user to a tenant.
    ///
    /// The user's profile must resolve, and no other active member of the
    /// tenant may share its username or email. The role defaults to the
    /// configured member role. A soft-deleted earlier membership for the
    /// same pair is reactivated instead of duplicated, and the user's
    /// first membership anywhere becomes their default automatically.
    ///
    /// # Errors
    ///
    /// * [`TenancyError::PlatformDomainRequired`] outside the platform domain
    /// * [`TenancyError::TenantNotFound`] when the tenant is absent or deleted
    /// * [`TenancyError::User`] when the user profile cannot be resolved
    /// * [`TenancyError::MemberExists`] on a username or email collision
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        tenant_id: Uuid,
        user_id: Uuid,
        role: Option<String>,
    ) -> TenancyResult<()> {
        require_platform(ctx)?;

        let tenant = self
            .store
            .tenant(tenant_id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or(TenancyError::TenantNotFound)?;

        let profile = self.lookup.get_user(user_id).await?;

        // Identity conflict check against the other active members.
        // Rows whose profile cannot be resolved are skipped rather than
        // treated as conflicts.
        for member in self.store.active_members(tenant.id).await? {
            if member.user_id == user_id {
                continue;
            }
            if let Ok(other) = self.lookup.get_user(member.user_id).await {
                if other.username == profile.username || other.email == profile.email {
                    return Err(TenancyError::MemberExists);
                }
            }
        }

        let role = role.unwrap_or_else(|| self.config.default_member_role.clone());

        if let Some(domain_id) = self.resolve_domain_id_safe(&tenant.code).await {
            self.directory
                .add_membership(domain_id, user_id, &role, false)
                .await?;
        }

        self.ensure_membership(tenant.id, user_id, false, &role).await?;

        self.events
            .dispatch(vec![TenantEvent::MemberAdded {
                tenant_id: tenant.id,
                user_id,
                role,
                actor_id: ctx.actor_id(),
            }
            .to_event()])
            .await;

        Ok(())
    }

    /// Removes a user from a tenant.
    ///
    /// The membership row is soft-deleted and the domain membership is
    /// removed best-effort. When the removed membership was the user's
    /// default, their oldest remaining active membership across any tenant
    /// is promoted; if none remains the user is left without a default.
    pub async fn remove_member(
        &self,
        ctx: &RequestContext,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> TenancyResult<()> {
        require_platform(ctx)?;

        // Deleted tenants keep their membership rows, so removal still
        // works against them.
        let tenant = self
            .store
            .tenant(tenant_id)
            .await?
            .ok_or(TenancyError::TenantNotFound)?;

        let mut membership = self
            .store
            .find_membership(tenant.id, user_id)
            .await?
            .filter(|m| m.deleted_at.is_none())
            .ok_or(TenancyError::MemberNotFound)?;

        let was_default = membership.is_default;
        membership.mark_removed(Utc::now());
        self.store.update_membership(&membership).await?;

        if let Some(domain_id) = self.resolve_domain_id_safe(&tenant.code).await {
            if let Err(error) = self.directory.remove_membership(domain_id, user_id).await {
                tracing::warn!(
                    domain_id = %domain_id,
                    user_id = %user_id,
                    error = %error,
                    "failed to remove domain membership"
                );
            }
        }

        if was_default {
            self.promote_oldest_membership(user_id).await;
        }

        self.events
            .dispatch(vec![TenantEvent::MemberRemoved {
                tenant_id: tenant.id,
                user_id,
                actor_id: ctx.actor_id(),
            }
            .to_event()])
            .await;

        Ok(())
    }

    /// Returns a page of a tenant's active members, newest first.
    ///
    /// Members whose profile no longer resolves are omitted from the page
    /// while still counting toward the total.
    pub async fn list_members(
        &self,
        ctx: &RequestContext,
        tenant_id: Uuid,
        page: PageRequest,
    ) -> TenancyResult<PageResult<TenantMember>> {
        require_platform(ctx)?;

        let tenant = self
            .store
            .tenant(tenant_id)
            .await?
            .ok_or(TenancyError::TenantNotFound)?;

        let page = page.normalize();
        let result = self.store.list_members(tenant.id, page).await?;

        let mut items = Vec::with_capacity(result.items.len());
        for membership in result.items {
            let Ok(profile) = self.lookup.get_user(membership.user_id).await else {
                continue;
            };
            items.push(TenantMember {
                user_id: profile.id,
                username: profile.username,
                email: profile.email,
                display_name: profile.display_name,
                status: profile.status,
                role: membership.role,
                is_default: membership.is_default,
            });
        }

        Ok(PageResult {
            items,
            total: result.total,
            page: result.page,
            page_size: result.page_size,
            total_pages: result.total_pages,
        })
    }

    /// Returns the tenants the user belongs to, default first, then
    /// newest membership first.
    ///
    /// This is a self-service query: it takes no request context and sees
    /// memberships across all tenants, including tenants that have since
    /// been soft-deleted.
    pub async fn list_my_tenants(&self, user_id: Uuid) -> TenancyResult<Vec<MyTenant>> {
        let mut memberships: Vec<Membership> = self
            .store
            .user_memberships(user_id)
            .await?
            .into_iter()
            .filter(Membership::is_live)
            .collect();
        if memberships.is_empty() {
            return Ok(Vec::new());
        }

        memberships.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then(b.created_at.cmp(&a.created_at))
        });

        let mut tenant_ids = Vec::with_capacity(memberships.len());
        for membership in &memberships {
            if !tenant_ids.contains(&membership.tenant_id) {
                tenant_ids.push(membership.tenant_id);
            }
        }

        let tenants: std::collections::HashMap<Uuid, Tenant> = self
            .store
            .tenants_by_ids(&tenant_ids)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        Ok(memberships
            .into_iter()
            .filter_map(|membership| {
                let tenant = tenants.get(&membership.tenant_id)?;
                Some(MyTenant {
                    tenant_id: tenant.id,
                    code: tenant.code.clone(),
                    name: tenant.name.clone(),
                    status: tenant.status,
                    role: membership.role,
                    is_default: membership.is_default,
                })
            })
            .collect())
    }

    /// Reports whether the user is a member of the tenant. Ungated.
    ///
    /// Checks the domain directory when the tenant's domain resolves and
    /// falls back to the membership rows otherwise.
    pub async fn is_member(&self, tenant_id: Uuid, user_id: Uuid) -> TenancyResult<bool> {
        let tenant = self
            .store
            .tenant(tenant_id)
            .await?
            .ok_or(TenancyError::TenantNotFound)?;

        if let Some(domain_id) = self.resolve_domain_id_safe(&tenant.code).await {
            return Ok(self.directory.check_membership(domain_id, user_id).await?);
        }

        let membership = self.store.find_membership(tenant.id, user_id).await?;
        Ok(membership.is_some_and(|m| m.is_live()))
    }

    /// Soft-deletes every remaining membership of a deleted user.
    ///
    /// Row failures are logged and skipped so one bad row does not block
    /// cleanup of the rest.
    pub async fn on_user_deleted(&self, user_id: Uuid) -> TenancyResult<()> {
        let memberships = self.store.user_memberships(user_id).await?;
        let now = Utc::now();

        for mut membership in memberships {
            let tenant_id = membership.tenant_id;
            membership.mark_removed(now);
            if let Err(error) = self.store.update_membership(&membership).await {
                tracing::error!(
                    tenant_id = %tenant_id,
                    user_id = %user_id,
                    error = %error,
                    "failed to remove membership for deleted user"
                );
            }
        }

        Ok(())
    }

    /// Creates or revives the (tenant, user) membership row.
    async fn ensure_membership(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        force_default: bool,
        role: &str,
    ) -> TenancyResult<()> {
        let existing = self.store.find_membership(tenant_id, user_id).await?;
        let has_other_default = match &existing {
            Some(membership) if membership.is_live() => false,
            _ => self.store.has_default_membership(user_id).await?,
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
            MembershipPlan::Reactivate(membership) => self
                .store
                .update_membership(&membership)
                .await
                .map_err(Into::into),
            MembershipPlan::Insert(membership) => self
                .store
                .insert_membership(&membership)
                .await
                .map_err(Into::into),
        }
    }

    /// Promotes the user's oldest remaining live membership to default.
    ///
    /// Leaving the user with no default at all is acceptable; promotion
    /// failures are logged, not surfaced.
    async fn promote_oldest_membership(&self, user_id: Uuid) {
        let candidate = match self.store.user_memberships(user_id).await {
            Ok(memberships) => memberships.into_iter().find(Membership::is_live),
            Err(error) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %error,
                    "failed to load memberships for default reassignment"
                );
                return;
            }
        };

        if let Some(mut membership) = candidate {
            membership.is_default = true;
            membership.updated_at = Utc::now();
            if let Err(error) = self.store.update_membership(&membership).await {
                tracing::warn!(
                    user_id = %user_id,
                    tenant_id = %membership.tenant_id,
                    error = %error,
                    "failed to reassign default membership"
                );
            }
        }
    }

    /// Resolves the domain id for a tenant code, swallowing lookup failures.
    async fn resolve_domain_id_safe(&self, code: &str) -> Option<Uuid> {
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
