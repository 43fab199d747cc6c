//! Request-scoped caller context
//!
//! This module provides the RequestContext type that travels with every
//! service call, carrying the acting user, the current domain, and whether
//! the caller operates in the privileged platform domain. Services read it
//! through typed accessors that fail fast when a required field is absent.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when a required context field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// No acting user travels with the request.
    #[error("acting user missing from request context")]
    MissingActor,

    /// No domain travels with the request.
    #[error("domain missing from request context")]
    MissingDomain,
}

/// Per-request caller context.
///
/// Built once at the transport boundary and passed explicitly into every
/// operation, replacing implicit ambient lookups. All fields are optional
/// at construction; operations that need a field use the `require_*`
/// accessors and surface [`ContextError`] when it is missing.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use atrium_core::RequestContext;
///
/// let actor = Uuid::now_v7();
/// let ctx = RequestContext::new().with_actor(actor);
///
/// assert_eq!(ctx.actor_id(), Some(actor));
/// assert!(!ctx.is_platform_domain());
/// assert!(ctx.require_domain().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Acting user, when the request is authenticated
    pub actor_id: Option<Uuid>,

    /// Domain the request executes in, when one is selected
    pub domain_id: Option<Uuid>,

    /// Whether the request executes in the privileged platform domain
    pub platform_domain: bool,
}

impl RequestContext {
    /// Creates an empty context with no actor, no domain, and no platform
    /// privilege.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a platform-domain context for the given acting user.
    ///
    /// This is the context shape tenant administration runs under.
    ///
    /// # Examples
    ///
    /// ```
    /// use uuid::Uuid;
    /// use atrium_core::RequestContext;
    ///
    /// let ctx = RequestContext::platform(Uuid::now_v7());
    /// assert!(ctx.is_platform_domain());
    /// ```
    pub fn platform(actor_id: Uuid) -> Self {
        Self {
            actor_id: Some(actor_id),
            domain_id: None,
            platform_domain: true,
        }
    }

    /// Creates a context scoped to a domain, with no acting user.
    pub fn for_domain(domain_id: Uuid) -> Self {
        Self {
            actor_id: None,
            domain_id: Some(domain_id),
            platform_domain: false,
        }
    }

    /// Sets the acting user.
    pub fn with_actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Sets the current domain.
    pub fn with_domain(mut self, domain_id: Uuid) -> Self {
        self.domain_id = Some(domain_id);
        self
    }

    /// Marks the context as executing in the platform domain.
    pub fn with_platform_domain(mut self) -> Self {
        self.platform_domain = true;
        self
    }

    /// Returns the acting user, if any.
    pub fn actor_id(&self) -> Option<Uuid> {
        self.actor_id
    }

    /// Returns the current domain, if any.
    pub fn domain_id(&self) -> Option<Uuid> {
        self.domain_id
    }

    /// Whether the request executes in the privileged platform domain.
    pub fn is_platform_domain(&self) -> bool {
        self.platform_domain
    }

    /// Returns the acting user or fails with [`ContextError::MissingActor`].
    pub fn require_actor(&self) -> Result<Uuid, ContextError> {
        self.actor_id.ok_or(ContextError::MissingActor)
    }

    /// Returns the current domain or fails with
    /// [`ContextError::MissingDomain`].
    pub fn require_domain(&self) -> Result<Uuid, ContextError> {
        self.domain_id.ok_or(ContextError::MissingDomain)
    }
}
