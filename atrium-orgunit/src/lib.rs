//! # Atrium Org Units
//!
//! This crate provides per-domain organization hierarchies for the Atrium
//! platform, used to compute organization-scoped access filters.
//!
//! ## Overview
//!
//! The atrium-orgunit crate handles:
//! - **Organization nodes**: A hierarchy per domain with materialized
//!   paths, built append-only (no move or re-parent)
//! - **Tree assembly**: The full forest of a domain for display
//! - **Member assignments**: User-organization rows with a single primary
//!   organization per user and domain
//! - **Subtree resolution**: Prefix queries over materialized paths
//!   answering "who is under this node"
//! - **Scopes**: Translation of `self`/`subtree` scope requests into
//!   filters for the access-control layer
//!
//! ## Architecture
//!
//! ```text
//! OrganizationService ──→ OrgUnitStore (nodes, member assignments)
//!
//! ScopeResolver ──→ SubtreeResolver ──→ OrgUnitStore
//!   (kind + user)      (path-prefix subtree queries)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use atrium_core::RequestContext;
//! use atrium_orgunit::{CreateOrganizationInput, MemoryOrgUnitStore, OrganizationService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryOrgUnitStore::new());
//! let service = OrganizationService::new(store);
//!
//! let domain_id = uuid::Uuid::now_v7();
//! let ctx = RequestContext::new().with_domain(domain_id);
//!
//! let root = service
//!     .create_organization(&ctx, CreateOrganizationInput::new("company", "Company"))
//!     .await?;
//! let child = service
//!     .create_organization(
//!         &ctx,
//!         CreateOrganizationInput::new("engineering", "Engineering").with_parent(root.id),
//!     )
//!     .await?;
//! assert_eq!(child.path, "company/engineering");
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `memory`: In-memory store implementation (enabled by default)

pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod organization;
pub mod scope;
pub mod service;
pub mod store;
pub mod subtree;

// Re-export main types for convenience
pub use error::{OrgUnitError, OrgUnitResult};
#[cfg(feature = "memory")]
pub use memory::MemoryOrgUnitStore;
pub use organization::{
    AddOrgMemberInput, CreateOrganizationInput, OrgMembership, OrganizationNode,
    OrganizationTreeNode,
};
pub use scope::{ScopeFilter, ScopeKind, ScopeResolver};
pub use service::OrganizationService;
pub use store::OrgUnitStore;
pub use subtree::SubtreeResolver;
