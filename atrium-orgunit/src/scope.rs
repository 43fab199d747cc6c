//! Organization data scopes
//!
//! Translates access-control scope requests into organization-membership
//! filters. The access-control layer hands over a scope kind and the
//! acting user; [`ScopeResolver`] turns that into a filter descriptor and
//! can expand a descriptor into the concrete user-id set it covers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::OrgUnitResult;
use crate::subtree::SubtreeResolver;

/// The organization scope kinds this module resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// Restrict to members of the user's own primary organization
    SelfOrg,
    /// Restrict to members of the primary organization's whole subtree
    Subtree,
}

impl ScopeKind {
    /// Returns the wire identifier for this scope kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::SelfOrg => "self",
            ScopeKind::Subtree => "subtree",
        }
    }

    /// Parses a scope kind from its wire identifier.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "self" => Some(ScopeKind::SelfOrg),
            "subtree" => Some(ScopeKind::Subtree),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved scope: the kind to apply and the user it centers on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilter {
    /// The scope kind to apply
    pub kind: ScopeKind,
    /// The acting user the scope is anchored to
    pub user_id: Uuid,
}

/// Translates scope requests into organization filters.
#[derive(Debug, Clone)]
pub struct ScopeResolver {
    subtree: SubtreeResolver,
}

impl ScopeResolver {
    /// Creates a resolver backed by the given subtree resolver.
    pub fn new(subtree: SubtreeResolver) -> Self {
        Self { subtree }
    }

    /// The scope kinds this resolver handles.
    pub fn scope_kinds(&self) -> Vec<ScopeKind> {
        vec![ScopeKind::SelfOrg, ScopeKind::Subtree]
    }

    /// Resolves a requested scope into a filter descriptor.
    ///
    /// An unrecognized kind resolves to `None`, telling the caller to
    /// apply no organization-based restriction.
    pub fn resolve(&self, user_id: Uuid, kind: &str) -> Option<ScopeFilter> {
        ScopeKind::parse(kind).map(|kind| ScopeFilter { kind, user_id })
    }

    /// Expands a filter descriptor into the user ids it covers.
    ///
    /// Both kinds anchor on the acting user's primary organization in the
    /// domain: `self` covers that organization's direct members, `subtree`
    /// covers its whole subtree.
    pub async fn expand(&self, domain_id: Uuid, filter: &ScopeFilter) -> OrgUnitResult<Vec<Uuid>> {
        let organization_id = self
            .subtree
            .primary_organization_id(domain_id, filter.user_id)
            .await?;

        match filter.kind {
            ScopeKind::SelfOrg => {
                self.subtree
                    .list_organization_user_ids(domain_id, organization_id)
                    .await
            }
            ScopeKind::Subtree => {
                self.subtree
                    .list_subtree_user_ids(domain_id, organization_id)
                    .await
            }
        }
    }
}
