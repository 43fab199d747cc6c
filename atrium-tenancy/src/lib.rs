//! # Atrium Tenancy
//!
//! This crate provides tenant lifecycle and membership management for the
//! Atrium platform, shared by the server and admin applications.
//!
//! ## Overview
//!
//! The atrium-tenancy crate handles:
//! - **Tenants**: Customer accounts, each backed 1:1 by a domain record
//! - **Lifecycle**: Atomic tenant provisioning (tenant row, domain,
//!   baseline roles, owner membership) plus update and soft delete
//! - **Memberships**: User-tenant relationships with a single default
//!   tenant per user
//! - **Facts**: A narrow read-only query surface for other subsystems
//! - **Hooks**: Event-bus handlers that keep memberships consistent with
//!   upstream identity changes
//!
//! ## Architecture
//!
//! ```text
//! TenantLifecycle ──┬─→ TenancyStore (tenants, memberships)
//!                   ├─→ DomainDirectory (domains, domain memberships)
//!                   ├─→ RoleSeeder (baseline roles)
//!                   └─→ EventDispatcher (post-commit events)
//!
//! MembershipReconciler ──→ TenancyStore + DomainDirectory + UserLookup
//!       └─ MembershipCleanupHandler (user.deleted events)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use atrium_core::{MemoryDirectory, MemoryRoleSeeder, RequestContext};
//! use atrium_events::{EventDispatcher, MemoryEventBus};
//! use atrium_tenancy::{
//!     CreateTenantInput, MemoryTenancyStore, TenancyConfig, TenantLifecycle,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryTenancyStore::new());
//! let directory = Arc::new(MemoryDirectory::new());
//! let roles = Arc::new(MemoryRoleSeeder::new());
//! let events = EventDispatcher::new(Arc::new(MemoryEventBus::new()));
//!
//! let lifecycle = TenantLifecycle::new(
//!     store,
//!     directory,
//!     roles,
//!     events,
//!     TenancyConfig::default(),
//! );
//!
//! let ctx = RequestContext::platform(uuid::Uuid::now_v7());
//! let tenant = lifecycle
//!     .create_tenant(&ctx, CreateTenantInput::new("acme", "Acme Corp"))
//!     .await?;
//! assert_eq!(tenant.code, "acme");
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `memory`: In-memory store implementation (enabled by default)

pub mod config;
pub mod error;
pub mod facts;
pub mod hooks;
pub mod lifecycle;
pub mod members;
pub mod membership;
#[cfg(feature = "memory")]
pub mod memory;
pub mod store;
pub mod tenant;

// Re-export main types for convenience
pub use config::TenancyConfig;
pub use error::{TenancyError, TenancyResult};
pub use facts::{TenancyFacade, TenantFacts};
pub use hooks::MembershipCleanupHandler;
pub use lifecycle::TenantLifecycle;
pub use members::{MembershipReconciler, MyTenant, TenantMember};
pub use membership::{Membership, MembershipPlan, MembershipStatus};
#[cfg(feature = "memory")]
pub use memory::MemoryTenancyStore;
pub use store::{TenancyStore, TenancyTx, TenantFilter};
pub use tenant::{
    CreateTenantInput, Tenant, TenantDetails, TenantRef, TenantStatus, TenantSummary,
    UpdateTenantInput,
};
