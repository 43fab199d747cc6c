//! # Atrium Core
//!
//! This crate provides the shared contracts for the Atrium platform crates:
//! request context, domain-directory capabilities, user lookup, storage
//! primitives, and the platform error taxonomy.
//!
//! ## Overview
//!
//! The atrium-core crate handles:
//! - **Request context**: Explicit per-request carrier for the acting user,
//!   the current domain, and the platform-domain flag
//! - **Domain directory**: Capability traits for resolving domains and
//!   managing domain membership, implemented by the identity subsystem
//! - **User lookup**: Capability trait for resolving user profiles
//! - **Storage primitives**: Pagination envelopes and the storage error type
//!   shared by the tenancy and org-unit stores
//! - **Error taxonomy**: Broad error classification used to map crate errors
//!   to transport responses
//!
//! ## Architecture
//!
//! ```text
//! RequestContext ──→ atrium-tenancy / atrium-orgunit services
//!                        │
//!                        ├─ DomainDirectory (resolve/ensure/membership)
//!                        ├─ RoleSeeder      (baseline roles per domain)
//!                        ├─ UserLookup      (profile resolution)
//!                        └─ PageRequest / PageResult / StoreError
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use atrium_core::{PageRequest, RequestContext};
//! use uuid::Uuid;
//!
//! let actor = Uuid::now_v7();
//! let ctx = RequestContext::platform(actor);
//! assert!(ctx.is_platform_domain());
//! assert_eq!(ctx.require_actor().ok(), Some(actor));
//!
//! let page = PageRequest::new(0, 500).normalize();
//! assert_eq!((page.page, page.page_size), (1, 100));
//! ```
//!
//! ## Feature Flags
//!
//! - `memory` (default): In-memory directory, role seeder, and user lookup
//!   for tests and single-process embedding

pub mod context;
pub mod directory;
pub mod error;
pub mod store;
pub mod users;

#[cfg(feature = "memory")]
pub mod memory;

// Re-export main types for convenience
pub use context::{ContextError, RequestContext};
pub use directory::{Domain, DirectoryError, DirectoryResult, DomainDirectory, RoleSeeder};
pub use error::ErrorKind;
pub use store::{PageRequest, PageResult, StoreError, StoreResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use users::{LookupError, UserLookup, UserProfile};

#[cfg(feature = "memory")]
pub use memory::{MemoryDirectory, MemoryRoleSeeder, MemoryUserLookup, SeededRole};
