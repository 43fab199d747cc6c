//! Tenant domain models
//!
//! This module provides the core Tenant entity plus the input and read
//! models the lifecycle service works with. A tenant is the platform's
//! customer/account record, paired 1:1 with a domain of type `"tenant"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a tenant.
///
/// Deletion is not a status: it is tracked separately through the
/// soft-delete timestamp, so a suspended tenant stays suspended when it is
/// later deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    /// Tenant is operational
    Active,
    /// Tenant is blocked from use but retained
    Suspended,
}

impl TenantStatus {
    /// Returns the wire identifier for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Suspended => "suspended",
        }
    }

    /// Parses a status from its wire identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_tenancy::TenantStatus;
    ///
    /// assert_eq!(TenantStatus::parse("active"), Some(TenantStatus::Active));
    /// assert_eq!(TenantStatus::parse("gone"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TenantStatus::Active),
            "suspended" => Some(TenantStatus::Suspended),
            _ => None,
        }
    }
}

impl std::fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tenant: an organizational account on the platform.
///
/// Tenants are created through the lifecycle service, which provisions the
/// backing domain and the owner membership in the same transaction. Rows
/// are soft-deleted, never physically removed.
///
/// # Examples
///
/// ```
/// use atrium_tenancy::{Tenant, TenantStatus};
///
/// let tenant = Tenant::new("acme", "Acme Corp");
/// assert_eq!(tenant.code, "acme");
/// assert_eq!(tenant.status, TenantStatus::Active);
/// assert!(!tenant.is_deleted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique identifier
    pub id: Uuid,

    /// Unique tenant code, also the key of the backing domain
    pub code: String,

    /// Human-readable name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Lifecycle status
    pub status: TenantStatus,

    /// User who created the tenant, when known
    pub owner_id: Option<Uuid>,

    /// Parent tenant for hierarchical accounts
    pub parent_tenant_id: Option<Uuid>,

    /// When the tenant was created
    pub created_at: DateTime<Utc>,

    /// When the tenant was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete timestamp; `None` while the tenant is live
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tenant {
    /// Creates an active tenant with no owner, parent, or description.
    ///
    /// # Arguments
    ///
    /// * `code` - Unique tenant code (expected to be trimmed)
    /// * `name` - Human-readable name
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            code: code.into(),
            name: name.into(),
            description: None,
            status: TenantStatus::Active,
            owner_id: None,
            parent_tenant_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the owner.
    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets the parent tenant.
    pub fn with_parent(mut self, parent_tenant_id: Uuid) -> Self {
        self.parent_tenant_id = Some(parent_tenant_id);
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TenantStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the tenant has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Marks the tenant as deleted at the given instant.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }
}

/// Reference to a tenant by id or by code.
///
/// Parent references arrive as free-form strings at the transport boundary;
/// [`TenantRef::parse`] resolves the ambiguity the same way the lifecycle
/// service does: anything that parses as a UUID is an id, everything else
/// is a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantRef {
    /// Reference by tenant id
    Id(Uuid),
    /// Reference by tenant code
    Code(String),
}

impl TenantRef {
    /// Parses a reference string.
    ///
    /// # Examples
    ///
    /// ```
    /// use atrium_tenancy::TenantRef;
    /// use uuid::Uuid;
    ///
    /// let id = Uuid::now_v7();
    /// assert_eq!(TenantRef::parse(&id.to_string()), TenantRef::Id(id));
    /// assert_eq!(TenantRef::parse("acme"), TenantRef::Code("acme".to_string()));
    /// ```
    pub fn parse(reference: &str) -> Self {
        match Uuid::parse_str(reference) {
            Ok(id) => TenantRef::Id(id),
            Err(_) => TenantRef::Code(reference.to_string()),
        }
    }
}

impl From<Uuid> for TenantRef {
    fn from(id: Uuid) -> Self {
        TenantRef::Id(id)
    }
}

impl From<&str> for TenantRef {
    fn from(reference: &str) -> Self {
        TenantRef::parse(reference)
    }
}

/// Input for creating a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenantInput {
    /// Unique tenant code
    pub code: String,

    /// Human-readable name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status; defaults to active
    pub status: Option<TenantStatus>,

    /// Optional parent tenant reference
    pub parent: Option<TenantRef>,
}

impl CreateTenantInput {
    /// Creates an input with just the required fields.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            status: None,
            parent: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    pub fn with_status(mut self, status: TenantStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the parent reference.
    pub fn with_parent(mut self, parent: impl Into<TenantRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Input for updating a tenant. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTenantInput {
    /// New name, when supplied non-empty
    pub name: Option<String>,

    /// New description, when supplied non-empty
    pub description: Option<String>,

    /// New status
    pub status: Option<TenantStatus>,

    /// New parent reference
    pub parent: Option<TenantRef>,
}

impl UpdateTenantInput {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TenantStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the parent reference.
    pub fn with_parent(mut self, parent: impl Into<TenantRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Full tenant read model, including the resolved domain.
///
/// `domain_id` is resolved through the domain directory on each read; it is
/// `None` when the directory cannot resolve the tenant's domain, which
/// callers treat as "no domain provisioned".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantDetails {
    /// Tenant id
    pub id: Uuid,
    /// Tenant code
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Lifecycle status
    pub status: TenantStatus,
    /// Owning user, when known
    pub owner_id: Option<Uuid>,
    /// Parent tenant, when hierarchical
    pub parent_tenant_id: Option<Uuid>,
    /// Domain backing this tenant, when resolvable
    pub domain_id: Option<Uuid>,
    /// When the tenant was created
    pub created_at: DateTime<Utc>,
    /// When the tenant was last updated
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TenantDetails {
    /// Assembles the read model from a stored tenant and its resolved
    /// domain.
    pub fn new(tenant: Tenant, domain_id: Option<Uuid>) -> Self {
        Self {
            id: tenant.id,
            code: tenant.code,
            name: tenant.name,
            description: tenant.description,
            status: tenant.status,
            owner_id: tenant.owner_id,
            parent_tenant_id: tenant.parent_tenant_id,
            domain_id,
            created_at: tenant.created_at,
            updated_at: tenant.updated_at,
            deleted_at: tenant.deleted_at,
        }
    }
}

/// Narrow tenant facts exposed to sibling subsystems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSummary {
    /// Tenant id
    pub id: Uuid,
    /// Tenant code
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Lifecycle status
    pub status: TenantStatus,
    /// Domain backing this tenant, when resolvable
    pub domain_id: Option<Uuid>,
}
