//! Organization service
//!
//! [`OrganizationService`] maintains a domain's organization hierarchy:
//! creating nodes with materialized paths, assembling the tree for
//! display, and assigning users to nodes. Every operation is scoped to
//! the domain carried by the request context.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use atrium_core::RequestContext;

use crate::error::{OrgUnitError, OrgUnitResult};
use crate::organization::{
    AddOrgMemberInput, CreateOrganizationInput, OrgMembership, OrganizationNode,
    OrganizationTreeNode,
};
use crate::store::OrgUnitStore;

/// Service maintaining organization nodes and member assignments.
#[derive(Clone)]
pub struct OrganizationService {
    store: Arc<dyn OrgUnitStore>,
}

impl std::fmt::Debug for OrganizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrganizationService").finish()
    }
}

impl OrganizationService {
    /// Creates a new organization service.
    pub fn new(store: Arc<dyn OrgUnitStore>) -> Self {
        Self { store }
    }

    /// Verifies store connectivity.
    pub async fn ping(&self) -> OrgUnitResult<()> {
        self.store.ping().await.map_err(Into::into)
    }

    /// Creates an organization node in the context's domain.
    ///
    /// A root node's path is its code; a child node extends its parent's
    /// path. The parent must already exist in the same domain. Duplicate
    /// sibling codes surface as a storage conflict on the (domain, path)
    /// pair.
    ///
    /// # Errors
    ///
    /// * [`OrgUnitError::Context`] when the context carries no domain
    /// * [`OrgUnitError::InvalidOrganization`] when code or name is blank
    /// * [`OrgUnitError::OrganizationNotFound`] when the parent does not
    ///   resolve within the domain
    pub async fn create_organization(
        &self,
        ctx: &RequestContext,
        input: CreateOrganizationInput,
    ) -> OrgUnitResult<OrganizationNode> {
        let domain_id = ctx.require_domain()?;

        let code = input.code.trim().to_string();
        let name = input.name.trim().to_string();
        if code.is_empty() || name.is_empty() {
            return Err(OrgUnitError::InvalidOrganization(
                "code and name must be non-empty".to_string(),
            ));
        }

        let node = match input.parent_id {
            Some(parent_id) => {
                let parent = self
                    .store
                    .node(domain_id, parent_id)
                    .await?
                    .ok_or(OrgUnitError::OrganizationNotFound)?;
                OrganizationNode::child_of(&parent, code, name)
            }
            None => OrganizationNode::new(domain_id, code, name),
        };

        self.store.insert_node(&node).await?;
        Ok(node)
    }

    /// Assembles the domain's organization forest.
    ///
    /// Nodes are loaded in path order and linked child-to-parent in one
    /// pass over an id map. A node whose parent id does not resolve within
    /// the loaded set is surfaced as a root rather than dropped.
    pub async fn organization_tree(
        &self,
        ctx: &RequestContext,
    ) -> OrgUnitResult<Vec<OrganizationTreeNode>> {
        let domain_id = ctx.require_domain()?;
        let nodes = self.store.nodes_in_domain(domain_id).await?;

        let known: HashSet<Uuid> = nodes.iter().map(|n| n.id).collect();
        let mut children: HashMap<Uuid, Vec<OrganizationNode>> = HashMap::new();
        let mut roots: Vec<OrganizationNode> = Vec::new();
        for node in nodes {
            match node.parent_id {
                Some(parent_id) if known.contains(&parent_id) => {
                    children.entry(parent_id).or_default().push(node);
                }
                _ => roots.push(node),
            }
        }

        // Path ordering of the input carries through: roots and each
        // children list stay path-sorted.
        fn assemble(
            node: OrganizationNode,
            children: &mut HashMap<Uuid, Vec<OrganizationNode>>,
        ) -> OrganizationTreeNode {
            let own = children.remove(&node.id).unwrap_or_default();
            let mut tree = OrganizationTreeNode::from(node);
            tree.children = own
                .into_iter()
                .map(|child| assemble(child, children))
                .collect();
            tree
        }

        Ok(roots
            .into_iter()
            .map(|root| assemble(root, &mut children))
            .collect())
    }

    /// Assigns a user to an organization node in the context's domain.
    ///
    /// When the assignment is primary, any existing primary membership
    /// the user holds in the domain is demoted first, keeping at most one
    /// primary per (domain, user).
    ///
    /// # Errors
    ///
    /// * [`OrgUnitError::Context`] when the context carries no domain
    /// * [`OrgUnitError::InvalidMember`] when the user id is nil
    /// * [`OrgUnitError::OrganizationNotFound`] when the organization does
    ///   not resolve within the domain
    /// * [`OrgUnitError::MemberExists`] when the user is already assigned
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        organization_id: Uuid,
        input: AddOrgMemberInput,
    ) -> OrgUnitResult<OrgMembership> {
        let domain_id = ctx.require_domain()?;

        if input.user_id.is_nil() {
            return Err(OrgUnitError::InvalidMember(
                "user id is required".to_string(),
            ));
        }

        self.store
            .node(domain_id, organization_id)
            .await?
            .ok_or(OrgUnitError::OrganizationNotFound)?;

        if input.is_primary {
            self.store.clear_primary(domain_id, input.user_id).await?;
        }

        let membership = OrgMembership::new(domain_id, organization_id, input.user_id)
            .with_primary(input.is_primary);
        self.store.insert_member(&membership).await.map_err(|err| {
            if err.is_conflict() {
                OrgUnitError::MemberExists
            } else {
                err.into()
            }
        })?;

        Ok(membership)
    }
}
