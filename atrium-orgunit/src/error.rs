//! Org-unit error types

use atrium_core::{ContextError, ErrorKind, StoreError};
use thiserror::Error;

/// Errors surfaced by the org-unit services.
#[derive(Debug, Error)]
pub enum OrgUnitError {
    /// The addressed organization is absent from the domain.
    #[error("organization not found")]
    OrganizationNotFound,

    /// The user already belongs to the organization.
    #[error("user is already a member of the organization")]
    MemberExists,

    /// Required organization fields were empty after trimming.
    #[error("invalid organization data: {0}")]
    InvalidOrganization(String),

    /// The membership input was malformed.
    #[error("invalid organization member data: {0}")]
    InvalidMember(String),

    /// The user has no organization membership in the domain.
    #[error("organization membership not found")]
    MembershipNotFound,

    /// A required context field was absent.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The org-unit store failed.
    #[error("storage: {0}")]
    Store(#[from] StoreError),
}

impl OrgUnitError {
    /// Classifies this error into the platform taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrgUnitError::OrganizationNotFound | OrgUnitError::MembershipNotFound => {
                ErrorKind::NotFound
            }
            OrgUnitError::MemberExists => ErrorKind::AlreadyExists,
            OrgUnitError::InvalidOrganization(_) | OrgUnitError::InvalidMember(_) => {
                ErrorKind::InvalidInput
            }
            OrgUnitError::Context(_) => ErrorKind::MissingContext,
            OrgUnitError::Store(err) if err.is_not_found() => ErrorKind::NotFound,
            OrgUnitError::Store(err) if err.is_conflict() => ErrorKind::AlreadyExists,
            OrgUnitError::Store(_) => ErrorKind::Upstream,
        }
    }
}

/// Result alias for org-unit operations.
pub type OrgUnitResult<T> = Result<T, OrgUnitError>;
