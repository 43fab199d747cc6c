//! Organization domain models
//!
//! An organization node is one unit in a domain's hierarchy. Ancestry is
//! encoded twice: `parent_id` holds the direct edge, and `path` holds the
//! materialized chain of codes from the root, which is what subtree
//! queries select on. The path is fixed at creation; nodes are never
//! moved or re-parented.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One node in a domain's organization hierarchy.
///
/// # Examples
///
/// ```
/// use atrium_orgunit::OrganizationNode;
/// use uuid::Uuid;
///
/// let domain_id = Uuid::now_v7();
/// let root = OrganizationNode::new(domain_id, "company", "Company");
/// let child = OrganizationNode::child_of(&root, "engineering", "Engineering");
///
/// assert_eq!(root.path, "company");
/// assert_eq!(child.path, "company/engineering");
/// assert_eq!(child.parent_id, Some(root.id));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationNode {
    /// Unique identifier
    pub id: Uuid,

    /// Domain the node belongs to
    pub domain_id: Uuid,

    /// Direct parent node; `None` for roots
    pub parent_id: Option<Uuid>,

    /// Code unique among siblings, one segment of the path
    pub code: String,

    /// Human-readable name
    pub name: String,

    /// Materialized ancestry: ancestor codes joined by `/`, root first
    pub path: String,

    /// When the node was created
    pub created_at: DateTime<Utc>,
}

impl OrganizationNode {
    /// Creates a root node whose path is its own code.
    ///
    /// # Arguments
    ///
    /// * `domain_id` - Owning domain
    /// * `code` - Node code (expected to be trimmed)
    /// * `name` - Human-readable name
    pub fn new(domain_id: Uuid, code: impl Into<String>, name: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            id: Uuid::now_v7(),
            domain_id,
            parent_id: None,
            path: code.clone(),
            code,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Creates a child of `parent`, extending the parent's path.
    pub fn child_of(
        parent: &OrganizationNode,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let code = code.into();
        Self {
            id: Uuid::now_v7(),
            domain_id: parent.domain_id,
            parent_id: Some(parent.id),
            path: format!("{}/{}", parent.path, code),
            code,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// An organization node with its children attached, as returned by the
/// tree assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationTreeNode {
    /// Node id
    pub id: Uuid,
    /// Domain the node belongs to
    pub domain_id: Uuid,
    /// Direct parent node, when any
    pub parent_id: Option<Uuid>,
    /// Node code
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Materialized ancestry path
    pub path: String,
    /// Child nodes in path order
    pub children: Vec<OrganizationTreeNode>,
}

impl From<OrganizationNode> for OrganizationTreeNode {
    fn from(node: OrganizationNode) -> Self {
        Self {
            id: node.id,
            domain_id: node.domain_id,
            parent_id: node.parent_id,
            code: node.code,
            name: node.name,
            path: node.path,
            children: Vec::new(),
        }
    }
}

/// A user's assignment to an organization node.
///
/// At most one membership per (domain, user) carries `is_primary`; the
/// service demotes any existing primary before inserting a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMembership {
    /// Unique identifier
    pub id: Uuid,

    /// Domain the membership belongs to
    pub domain_id: Uuid,

    /// Organization node the user is assigned to
    pub organization_id: Uuid,

    /// The assigned user
    pub user_id: Uuid,

    /// Whether this is the user's primary organization in the domain
    pub is_primary: bool,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl OrgMembership {
    /// Creates a non-primary membership.
    pub fn new(domain_id: Uuid, organization_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            domain_id,
            organization_id,
            user_id,
            is_primary: false,
            created_at: Utc::now(),
        }
    }

    /// Sets the primary flag.
    pub fn with_primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }
}

/// Input for creating an organization node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationInput {
    /// Code unique among siblings
    pub code: String,

    /// Human-readable name
    pub name: String,

    /// Optional parent node id; the parent must live in the same domain
    pub parent_id: Option<Uuid>,
}

impl CreateOrganizationInput {
    /// Creates a root-node input.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    /// Sets the parent node.
    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Input for assigning a user to an organization node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOrgMemberInput {
    /// The user to assign
    pub user_id: Uuid,

    /// Whether the assignment becomes the user's primary organization
    pub is_primary: bool,
}

impl AddOrgMemberInput {
    /// Creates a non-primary assignment input.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_primary: false,
        }
    }

    /// Marks the assignment as primary.
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }
}
