//! Domain directory capabilities
//!
//! A domain is the platform's tenancy boundary: subjects (users) belong to
//! domains, and most authorization decisions start from one. The directory
//! itself is owned by the identity subsystem; this module defines the
//! capability traits the tenancy and org-unit crates consume, so they stay
//! decoupled from how domains are stored.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A domain record as resolved by the directory.
///
/// Domains are addressed by a `(type_code, key)` pair: for example the
/// domain backing a tenant uses type code `"tenant"` and the tenant code as
/// its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Stable domain identifier
    pub id: Uuid,

    /// Domain type, e.g. `"tenant"` or `"platform"`
    pub type_code: String,

    /// Key unique within the type, e.g. the tenant code
    pub key: String,

    /// Human-readable name
    pub display_name: String,
}

/// Errors surfaced by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// No domain matches the requested type and key.
    #[error("domain not found")]
    NotFound,

    /// The directory backend failed.
    #[error("domain directory error: {0}")]
    Backend(String),
}

/// Result alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Domain resolution and membership management.
///
/// Implementations live outside this workspace (the identity subsystem);
/// the crates here only consume the capability. All operations address
/// domains by id once resolved, and subjects by user id.
#[async_trait]
pub trait DomainDirectory: Send + Sync {
    /// Resolves an existing domain by `(type_code, key)`.
    async fn resolve_domain(&self, type_code: &str, key: &str) -> DirectoryResult<Domain>;

    /// Returns the domain for `(type_code, key)`, creating it when absent.
    /// Idempotent: an existing domain is returned unchanged.
    async fn ensure_domain(
        &self,
        type_code: &str,
        key: &str,
        display_name: &str,
    ) -> DirectoryResult<Domain>;

    /// Whether the subject belongs to the domain.
    async fn check_membership(&self, domain_id: Uuid, subject_id: Uuid) -> DirectoryResult<bool>;

    /// Adds the subject to the domain with the given role.
    async fn add_membership(
        &self,
        domain_id: Uuid,
        subject_id: Uuid,
        role: &str,
        is_default: bool,
    ) -> DirectoryResult<()>;

    /// Removes the subject from the domain.
    async fn remove_membership(&self, domain_id: Uuid, subject_id: Uuid) -> DirectoryResult<()>;
}

/// Baseline role provisioning for a freshly created domain.
///
/// Seeding is idempotent: role codes already present in the domain are
/// skipped, so retrying a failed provisioning run is safe.
#[async_trait]
pub trait RoleSeeder: Send + Sync {
    /// Seeds the domain's baseline roles.
    async fn seed_baseline_roles(&self, domain_id: Uuid) -> DirectoryResult<()>;
}
