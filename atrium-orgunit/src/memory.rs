//! In-memory org-unit store
//!
//! Single-process implementation of [`OrgUnitStore`] for tests and
//! embedders that run without a relational backend. State lives behind
//! `Arc<RwLock<...>>`, so clones of an instance share the same data.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use atrium_core::{StoreError, StoreResult};

use crate::organization::{OrgMembership, OrganizationNode};
use crate::store::OrgUnitStore;

#[derive(Default)]
struct OrgUnitState {
    nodes: HashMap<Uuid, OrganizationNode>,
    members: HashMap<Uuid, OrgMembership>,
}

/// In-memory [`OrgUnitStore`]. Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryOrgUnitStore {
    state: Arc<RwLock<OrgUnitState>>,
}

impl std::fmt::Debug for MemoryOrgUnitStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryOrgUnitStore").finish()
    }
}

impl MemoryOrgUnitStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_oldest_first(rows: &mut [OrgMembership]) {
    rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl OrgUnitStore for MemoryOrgUnitStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_node(&self, node: &OrganizationNode) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.nodes.contains_key(&node.id) {
            return Err(StoreError::conflict("organization"));
        }
        if state
            .nodes
            .values()
            .any(|n| n.domain_id == node.domain_id && n.path == node.path)
        {
            return Err(StoreError::conflict("organization"));
        }
        state.nodes.insert(node.id, node.clone());
        Ok(())
    }

    async fn node(&self, domain_id: Uuid, id: Uuid) -> StoreResult<Option<OrganizationNode>> {
        let state = self.state.read().await;
        Ok(state
            .nodes
            .get(&id)
            .filter(|n| n.domain_id == domain_id)
            .cloned())
    }

    async fn nodes_in_domain(&self, domain_id: Uuid) -> StoreResult<Vec<OrganizationNode>> {
        let state = self.state.read().await;
        let mut nodes: Vec<OrganizationNode> = state
            .nodes
            .values()
            .filter(|n| n.domain_id == domain_id)
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(nodes)
    }

    async fn nodes_with_path_prefix(
        &self,
        domain_id: Uuid,
        prefix: &str,
    ) -> StoreResult<Vec<OrganizationNode>> {
        let state = self.state.read().await;
        let mut nodes: Vec<OrganizationNode> = state
            .nodes
            .values()
            .filter(|n| n.domain_id == domain_id && n.path.starts_with(prefix))
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(nodes)
    }

    async fn insert_member(&self, membership: &OrgMembership) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.members.contains_key(&membership.id) {
            return Err(StoreError::conflict("organization member"));
        }
        if state.members.values().any(|m| {
            m.domain_id == membership.domain_id
                && m.organization_id == membership.organization_id
                && m.user_id == membership.user_id
        }) {
            return Err(StoreError::conflict("organization member"));
        }
        state.members.insert(membership.id, membership.clone());
        Ok(())
    }

    async fn clear_primary(&self, domain_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        for membership in state.members.values_mut() {
            if membership.domain_id == domain_id && membership.user_id == user_id {
                membership.is_primary = false;
            }
        }
        Ok(())
    }

    async fn org_members(
        &self,
        domain_id: Uuid,
        organization_id: Uuid,
    ) -> StoreResult<Vec<OrgMembership>> {
        let state = self.state.read().await;
        let mut rows: Vec<OrgMembership> = state
            .members
            .values()
            .filter(|m| m.domain_id == domain_id && m.organization_id == organization_id)
            .cloned()
            .collect();
        sort_oldest_first(&mut rows);
        Ok(rows)
    }

    async fn members_of_orgs(
        &self,
        domain_id: Uuid,
        organization_ids: &[Uuid],
    ) -> StoreResult<Vec<OrgMembership>> {
        let state = self.state.read().await;
        let mut rows: Vec<OrgMembership> = state
            .members
            .values()
            .filter(|m| m.domain_id == domain_id && organization_ids.contains(&m.organization_id))
            .cloned()
            .collect();
        sort_oldest_first(&mut rows);
        Ok(rows)
    }

    async fn user_org_memberships(
        &self,
        domain_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Vec<OrgMembership>> {
        let state = self.state.read().await;
        let mut rows: Vec<OrgMembership> = state
            .members
            .values()
            .filter(|m| m.domain_id == domain_id && m.user_id == user_id)
            .cloned()
            .collect();
        sort_oldest_first(&mut rows);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_path_uniqueness_is_per_domain() {
        let store = MemoryOrgUnitStore::new();
        let domain_a = Uuid::now_v7();
        let domain_b = Uuid::now_v7();

        store
            .insert_node(&OrganizationNode::new(domain_a, "company", "Company"))
            .await
            .unwrap();

        let err = store
            .insert_node(&OrganizationNode::new(domain_a, "company", "Company Again"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // The same path is free in another domain.
        store
            .insert_node(&OrganizationNode::new(domain_b, "company", "Company"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_node_lookup_is_domain_scoped() {
        let store = MemoryOrgUnitStore::new();
        let domain_id = Uuid::now_v7();
        let node = OrganizationNode::new(domain_id, "company", "Company");
        store.insert_node(&node).await.unwrap();

        assert!(store.node(domain_id, node.id).await.unwrap().is_some());
        assert!(store.node(Uuid::now_v7(), node.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_nodes_ordered_by_path() {
        let store = MemoryOrgUnitStore::new();
        let domain_id = Uuid::now_v7();

        let root = OrganizationNode::new(domain_id, "company", "Company");
        let sales = OrganizationNode::child_of(&root, "sales", "Sales");
        let eng = OrganizationNode::child_of(&root, "engineering", "Engineering");
        for node in [&sales, &root, &eng] {
            store.insert_node(node).await.unwrap();
        }

        let paths: Vec<String> = store
            .nodes_in_domain(domain_id)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.path)
            .collect();
        assert_eq!(paths, vec!["company", "company/engineering", "company/sales"]);
    }

    #[tokio::test]
    async fn test_path_prefix_query() {
        let store = MemoryOrgUnitStore::new();
        let domain_id = Uuid::now_v7();

        let root = OrganizationNode::new(domain_id, "company", "Company");
        let eng = OrganizationNode::child_of(&root, "engineering", "Engineering");
        let platform = OrganizationNode::child_of(&eng, "platform", "Platform Team");
        let other_root = OrganizationNode::new(domain_id, "partners", "Partners");
        for node in [&root, &eng, &platform, &other_root] {
            store.insert_node(node).await.unwrap();
        }

        let subtree = store
            .nodes_with_path_prefix(domain_id, &eng.path)
            .await
            .unwrap();
        let ids: Vec<Uuid> = subtree.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![eng.id, platform.id]);
    }

    #[tokio::test]
    async fn test_member_pair_is_unique_per_org() {
        let store = MemoryOrgUnitStore::new();
        let domain_id = Uuid::now_v7();
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();

        store
            .insert_member(&OrgMembership::new(domain_id, org_id, user_id))
            .await
            .unwrap();

        let err = store
            .insert_member(&OrgMembership::new(domain_id, org_id, user_id))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // A different organization in the same domain is fine.
        store
            .insert_member(&OrgMembership::new(domain_id, Uuid::now_v7(), user_id))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_clear_primary_only_touches_the_user() {
        let store = MemoryOrgUnitStore::new();
        let domain_id = Uuid::now_v7();
        let org_id = Uuid::now_v7();
        let ada = Uuid::now_v7();
        let bob = Uuid::now_v7();

        store
            .insert_member(&OrgMembership::new(domain_id, org_id, ada).with_primary(true))
            .await
            .unwrap();
        store
            .insert_member(&OrgMembership::new(domain_id, org_id, bob).with_primary(true))
            .await
            .unwrap();

        store.clear_primary(domain_id, ada).await.unwrap();

        let rows = store.org_members(domain_id, org_id).await.unwrap();
        let ada_row = rows.iter().find(|m| m.user_id == ada).unwrap();
        let bob_row = rows.iter().find(|m| m.user_id == bob).unwrap();
        assert!(!ada_row.is_primary);
        assert!(bob_row.is_primary);
    }
}
