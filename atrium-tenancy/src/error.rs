//! Tenancy error types

use atrium_core::{ContextError, DirectoryError, ErrorKind, LookupError, StoreError};
use thiserror::Error;

/// Errors surfaced by the tenancy services.
///
/// Business rule violations get their own variants so transport layers can
/// map them precisely; collaborator failures are wrapped and classified as
/// upstream through [`TenancyError::kind`].
#[derive(Debug, Error)]
pub enum TenancyError {
    /// The addressed tenant is absent or soft-deleted.
    #[error("tenant not found")]
    TenantNotFound,

    /// Another live tenant already uses the requested code.
    #[error("tenant code already exists")]
    TenantCodeExists,

    /// Required tenant fields were empty after trimming.
    #[error("invalid tenant data: {0}")]
    InvalidTenant(String),

    /// The parent reference does not resolve, is deleted, or is the tenant
    /// itself.
    #[error("invalid parent tenant reference")]
    ParentTenantInvalid,

    /// The caller is not operating in the platform domain.
    #[error("operation requires the platform domain")]
    PlatformDomainRequired,

    /// Another active member of the tenant carries the same identity.
    #[error("user is already a member of the tenant")]
    MemberExists,

    /// No active membership links the user to the tenant.
    #[error("tenant membership not found")]
    MemberNotFound,

    /// A required context field was absent.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The domain directory failed.
    #[error("domain directory: {0}")]
    Directory(#[from] DirectoryError),

    /// The user lookup failed.
    #[error("user lookup: {0}")]
    User(#[from] LookupError),

    /// The tenancy store failed.
    #[error("storage: {0}")]
    Store(#[from] StoreError),
}

impl TenancyError {
    /// Builds an [`TenancyError::InvalidTenant`] from any displayable
    /// reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        TenancyError::InvalidTenant(reason.into())
    }

    /// Classifies this error into the platform taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TenancyError::TenantNotFound | TenancyError::MemberNotFound => ErrorKind::NotFound,
            TenancyError::TenantCodeExists | TenancyError::MemberExists => ErrorKind::AlreadyExists,
            TenancyError::InvalidTenant(_) | TenancyError::ParentTenantInvalid => {
                ErrorKind::InvalidInput
            }
            TenancyError::PlatformDomainRequired => ErrorKind::PermissionDenied,
            TenancyError::Context(_) => ErrorKind::MissingContext,
            TenancyError::Directory(DirectoryError::NotFound) => ErrorKind::NotFound,
            TenancyError::Directory(_) => ErrorKind::Upstream,
            TenancyError::User(LookupError::NotFound) => ErrorKind::NotFound,
            TenancyError::User(_) => ErrorKind::Upstream,
            TenancyError::Store(err) if err.is_not_found() => ErrorKind::NotFound,
            TenancyError::Store(err) if err.is_conflict() => ErrorKind::AlreadyExists,
            TenancyError::Store(_) => ErrorKind::Upstream,
        }
    }
}

/// Result alias for tenancy operations.
pub type TenancyResult<T> = Result<T, TenancyError>;
