//! Platform error classification
//!
//! Every domain crate defines its own error enum; this module provides the
//! broad classification those enums map into so transport layers can turn
//! any platform error into a response without matching crate-specific
//! variants.

use serde::{Deserialize, Serialize};

/// Broad classification of platform errors.
///
/// Domain error enums expose a `kind()` method returning one of these
/// variants. The classification is stable across crates: a `NotFound` from
/// the tenancy crate means the same thing as one from the org-unit crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The referenced entity is absent or soft-deleted.
    NotFound,
    /// A uniqueness rule rejected the write.
    AlreadyExists,
    /// Required input was empty or a reference was malformed.
    InvalidInput,
    /// The caller lacks the privilege the operation requires.
    PermissionDenied,
    /// A required context field was absent from the call.
    MissingContext,
    /// A collaborator (directory, lookup, storage) failed.
    Upstream,
}

impl ErrorKind {
    /// Returns the wire identifier for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::MissingContext => "missing_context",
            ErrorKind::Upstream => "upstream",
        }
    }

    /// Suggested HTTP status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::AlreadyExists => 409,
            ErrorKind::InvalidInput => 400,
            ErrorKind::PermissionDenied => 403,
            ErrorKind::MissingContext => 400,
            ErrorKind::Upstream => 502,
        }
    }

    /// Whether this kind reports a caller mistake rather than a platform
    /// failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::Upstream)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
