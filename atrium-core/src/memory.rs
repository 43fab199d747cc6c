//! In-memory collaborator implementations
//!
//! Single-process implementations of the capability traits, used by the
//! platform crates' tests and by embedders that run without a separate
//! identity subsystem. State lives behind `Arc<RwLock<...>>`, so clones of
//! an instance share the same directory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::directory::{Domain, DirectoryError, DirectoryResult, DomainDirectory, RoleSeeder};
use crate::users::{LookupError, UserLookup, UserProfile};

#[derive(Debug, Clone)]
struct DirectoryMember {
    role: String,
    is_default: bool,
}

#[derive(Default)]
struct DirectoryState {
    /// Domains keyed by (type_code, key)
    domains: HashMap<(String, String), Domain>,
    /// Domain members keyed by domain id, then subject id
    members: HashMap<Uuid, HashMap<Uuid, DirectoryMember>>,
}

/// In-memory domain directory.
///
/// # Examples
///
/// ```
/// use atrium_core::{DomainDirectory, MemoryDirectory};
///
/// # async fn example() {
/// let directory = MemoryDirectory::new();
///
/// let first = directory.ensure_domain("tenant", "acme", "Acme Corp").await.unwrap();
/// let again = directory.ensure_domain("tenant", "acme", "Acme Corp").await.unwrap();
/// assert_eq!(first.id, again.id);
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the role a subject holds in a domain, if they belong to it.
    ///
    /// Inspection helper for tests and embedding diagnostics.
    pub async fn membership_role(&self, domain_id: Uuid, subject_id: Uuid) -> Option<String> {
        let state = self.state.read().await;
        state
            .members
            .get(&domain_id)
            .and_then(|members| members.get(&subject_id))
            .map(|member| member.role.clone())
    }
}

#[async_trait]
impl DomainDirectory for MemoryDirectory {
    async fn resolve_domain(&self, type_code: &str, key: &str) -> DirectoryResult<Domain> {
        let state = self.state.read().await;
        state
            .domains
            .get(&(type_code.to_string(), key.to_string()))
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }

    async fn ensure_domain(
        &self,
        type_code: &str,
        key: &str,
        display_name: &str,
    ) -> DirectoryResult<Domain> {
        let mut state = self.state.write().await;
        let entry = state
            .domains
            .entry((type_code.to_string(), key.to_string()))
            .or_insert_with(|| Domain {
                id: Uuid::now_v7(),
                type_code: type_code.to_string(),
                key: key.to_string(),
                display_name: display_name.to_string(),
            });
        Ok(entry.clone())
    }

    async fn check_membership(&self, domain_id: Uuid, subject_id: Uuid) -> DirectoryResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .members
            .get(&domain_id)
            .is_some_and(|members| members.contains_key(&subject_id)))
    }

    async fn add_membership(
        &self,
        domain_id: Uuid,
        subject_id: Uuid,
        role: &str,
        is_default: bool,
    ) -> DirectoryResult<()> {
        let mut state = self.state.write().await;
        state.members.entry(domain_id).or_default().insert(
            subject_id,
            DirectoryMember {
                role: role.to_string(),
                is_default,
            },
        );
        Ok(())
    }

    async fn remove_membership(&self, domain_id: Uuid, subject_id: Uuid) -> DirectoryResult<()> {
        let mut state = self.state.write().await;
        if let Some(members) = state.members.get_mut(&domain_id) {
            members.remove(&subject_id);
        }
        Ok(())
    }
}

/// A role planted by [`MemoryRoleSeeder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRole {
    /// Role code unique within the domain
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Whether the role is platform-managed
    pub system: bool,
}

/// In-memory baseline role seeder.
///
/// Seeds the owner role (`tenant_admin`) and the default member role
/// (`member`) into a domain, skipping codes already present.
#[derive(Clone, Default)]
pub struct MemoryRoleSeeder {
    roles: Arc<RwLock<HashMap<Uuid, Vec<SeededRole>>>>,
}

impl MemoryRoleSeeder {
    /// Creates a seeder with no seeded domains.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the roles seeded into a domain so far.
    pub async fn roles_for(&self, domain_id: Uuid) -> Vec<SeededRole> {
        let roles = self.roles.read().await;
        roles.get(&domain_id).cloned().unwrap_or_default()
    }

    fn baseline() -> [SeededRole; 2] {
        [
            SeededRole {
                code: "tenant_admin".to_string(),
                name: "Owner".to_string(),
                system: true,
            },
            SeededRole {
                code: "member".to_string(),
                name: "Member".to_string(),
                system: true,
            },
        ]
    }
}

#[async_trait]
impl RoleSeeder for MemoryRoleSeeder {
    async fn seed_baseline_roles(&self, domain_id: Uuid) -> DirectoryResult<()> {
        let mut roles = self.roles.write().await;
        let seeded = roles.entry(domain_id).or_default();
        for role in Self::baseline() {
            if seeded.iter().any(|existing| existing.code == role.code) {
                continue;
            }
            seeded.push(role);
        }
        Ok(())
    }
}

/// In-memory user directory.
#[derive(Clone, Default)]
pub struct MemoryUserLookup {
    users: Arc<RwLock<HashMap<Uuid, UserProfile>>>,
}

impl MemoryUserLookup {
    /// Creates an empty user directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a profile.
    pub async fn insert(&self, profile: UserProfile) {
        let mut users = self.users.write().await;
        users.insert(profile.id, profile);
    }

    /// Removes a profile, if present.
    pub async fn remove(&self, user_id: Uuid) {
        let mut users = self.users.write().await;
        users.remove(&user_id);
    }
}

#[async_trait]
impl UserLookup for MemoryUserLookup {
    async fn get_user(&self, user_id: Uuid) -> Result<UserProfile, LookupError> {
        let users = self.users.read().await;
        users.get(&user_id).cloned().ok_or(LookupError::NotFound)
    }
}
