//! Integration tests for organization hierarchies and scope resolution.
//!
//! These drive [`OrganizationService`], [`SubtreeResolver`], and
//! [`ScopeResolver`] against the in-memory store:
//!
//! 1. node creation with materialized paths and the (domain, path)
//!    uniqueness constraint
//! 2. tree assembly, including the orphan-as-root fallback
//! 3. member assignment and the single-primary rule
//! 4. subtree user resolution and scope expansion

use std::sync::Arc;

use uuid::Uuid;

use atrium_core::{ErrorKind, RequestContext};
use atrium_orgunit::{
    AddOrgMemberInput, CreateOrganizationInput, MemoryOrgUnitStore, OrgUnitError, OrgUnitStore,
    OrganizationNode, OrganizationService, ScopeFilter, ScopeKind, ScopeResolver, SubtreeResolver,
};

/// Test fixture wiring the org-unit services to an in-memory store.
struct TestFixture {
    /// Shared org-unit store.
    store: Arc<MemoryOrgUnitStore>,
    /// Organization service under test.
    service: OrganizationService,
    /// Subtree resolver under test.
    subtree: SubtreeResolver,
    /// Scope resolver under test.
    scopes: ScopeResolver,
    /// The domain the fixture operates in.
    domain_id: Uuid,
    /// Context scoped to `domain_id`.
    ctx: RequestContext,
}

impl TestFixture {
    fn new() -> Self {
        let store = Arc::new(MemoryOrgUnitStore::new());
        let service = OrganizationService::new(store.clone());
        let subtree = SubtreeResolver::new(store.clone());
        let scopes = ScopeResolver::new(subtree.clone());
        let domain_id = Uuid::now_v7();
        let ctx = RequestContext::new().with_domain(domain_id);

        Self {
            store,
            service,
            subtree,
            scopes,
            domain_id,
            ctx,
        }
    }

    /// Creates a root organization.
    async fn create_root(&self, code: &str, name: &str) -> OrganizationNode {
        self.service
            .create_organization(&self.ctx, CreateOrganizationInput::new(code, name))
            .await
            .expect("create organization")
    }

    /// Creates an organization under the given parent.
    async fn create_under(&self, parent_id: Uuid, code: &str, name: &str) -> OrganizationNode {
        self.service
            .create_organization(
                &self.ctx,
                CreateOrganizationInput::new(code, name).with_parent(parent_id),
            )
            .await
            .expect("create child organization")
    }

    /// Assigns a user to an organization, optionally as primary.
    async fn assign(&self, organization_id: Uuid, user_id: Uuid, primary: bool) {
        let mut input = AddOrgMemberInput::new(user_id);
        if primary {
            input = input.primary();
        }
        self.service
            .add_member(&self.ctx, organization_id, input)
            .await
            .expect("add organization member");
    }
}

// =============================================================================
// Node creation
// =============================================================================

/// Child paths extend the parent's materialized path.
///
/// Steps:
/// 1. Create root "company" and child "engineering"
/// 2. Verify the paths and the parent link
#[tokio::test]
async fn test_child_path_extends_parent() {
    let fixture = TestFixture::new();

    let root = fixture.create_root("company", "Company").await;
    assert_eq!(root.path, "company");
    assert_eq!(root.domain_id, fixture.domain_id);
    assert!(root.parent_id.is_none());

    let child = fixture
        .create_under(root.id, "engineering", "Engineering")
        .await;
    assert_eq!(child.path, "company/engineering");
    assert_eq!(child.parent_id, Some(root.id));

    let grandchild = fixture.create_under(child.id, "platform", "Platform").await;
    assert_eq!(grandchild.path, "company/engineering/platform");
}

#[tokio::test]
async fn test_create_trims_and_validates_fields() {
    let fixture = TestFixture::new();

    let node = fixture.create_root("  company  ", "  Company  ").await;
    assert_eq!(node.code, "company");
    assert_eq!(node.name, "Company");

    let err = fixture
        .service
        .create_organization(&fixture.ctx, CreateOrganizationInput::new("   ", "Company"))
        .await
        .unwrap_err();
    assert!(matches!(err, OrgUnitError::InvalidOrganization(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = fixture
        .service
        .create_organization(&fixture.ctx, CreateOrganizationInput::new("sales", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, OrgUnitError::InvalidOrganization(_)));
}

#[tokio::test]
async fn test_create_requires_domain_context() {
    let fixture = TestFixture::new();

    let err = fixture
        .service
        .create_organization(
            &RequestContext::new(),
            CreateOrganizationInput::new("company", "Company"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrgUnitError::Context(_)));
    assert_eq!(err.kind(), ErrorKind::MissingContext);
}

#[tokio::test]
async fn test_parent_must_exist_in_the_same_domain() {
    let fixture = TestFixture::new();
    let root = fixture.create_root("company", "Company").await;

    // Unknown parent id.
    let err = fixture
        .service
        .create_organization(
            &fixture.ctx,
            CreateOrganizationInput::new("stray", "Stray").with_parent(Uuid::now_v7()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrgUnitError::OrganizationNotFound));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // A parent from another domain does not resolve either.
    let foreign_ctx = RequestContext::new().with_domain(Uuid::now_v7());
    let err = fixture
        .service
        .create_organization(
            &foreign_ctx,
            CreateOrganizationInput::new("branch", "Branch").with_parent(root.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrgUnitError::OrganizationNotFound));
}

#[tokio::test]
async fn test_duplicate_sibling_codes_conflict() {
    let fixture = TestFixture::new();
    let root = fixture.create_root("company", "Company").await;
    fixture.create_under(root.id, "sales", "Sales").await;

    let err = fixture
        .service
        .create_organization(
            &fixture.ctx,
            CreateOrganizationInput::new("sales", "Sales Again").with_parent(root.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrgUnitError::Store(_)));
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    // The same code is fine under a different parent: the paths differ.
    let other = fixture.create_root("partners", "Partners").await;
    let node = fixture.create_under(other.id, "sales", "Partner Sales").await;
    assert_eq!(node.path, "partners/sales");
}

// =============================================================================
// Tree assembly
// =============================================================================

/// Three nodes assemble into one root with two children.
///
/// Steps:
/// 1. Create "company" with children "eng" and "sales"
/// 2. Assemble the tree and verify shape and ordering
#[tokio::test]
async fn test_tree_assembly() {
    let fixture = TestFixture::new();
    let root = fixture.create_root("company", "Company").await;
    fixture.create_under(root.id, "sales", "Sales").await;
    fixture.create_under(root.id, "eng", "Engineering").await;

    let forest = fixture
        .service
        .organization_tree(&fixture.ctx)
        .await
        .expect("assemble tree");

    assert_eq!(forest.len(), 1);
    let company = &forest[0];
    assert_eq!(company.code, "company");
    assert_eq!(company.children.len(), 2);
    // Children come back in path order.
    assert_eq!(company.children[0].code, "eng");
    assert_eq!(company.children[1].code, "sales");
    assert!(company.children.iter().all(|c| c.children.is_empty()));
}

#[tokio::test]
async fn test_tree_is_domain_scoped_and_handles_orphans() {
    let fixture = TestFixture::new();
    let root = fixture.create_root("company", "Company").await;
    fixture.create_under(root.id, "eng", "Engineering").await;

    // Another domain's nodes stay invisible.
    let foreign_ctx = RequestContext::new().with_domain(Uuid::now_v7());
    assert!(fixture
        .service
        .organization_tree(&foreign_ctx)
        .await
        .expect("assemble empty tree")
        .is_empty());

    // A node whose parent is missing from the domain shows up as a root.
    let mut stray = OrganizationNode::new(fixture.domain_id, "stray", "Stray");
    stray.parent_id = Some(Uuid::now_v7());
    fixture.store.insert_node(&stray).await.expect("plant stray node");

    let forest = fixture
        .service
        .organization_tree(&fixture.ctx)
        .await
        .expect("assemble tree");
    assert_eq!(forest.len(), 2);
    assert!(forest.iter().any(|n| n.code == "stray"));
}

// =============================================================================
// Member assignment
// =============================================================================

#[tokio::test]
async fn test_add_member_validations() {
    let fixture = TestFixture::new();
    let org = fixture.create_root("company", "Company").await;
    let user = Uuid::now_v7();

    let membership = fixture
        .service
        .add_member(&fixture.ctx, org.id, AddOrgMemberInput::new(user))
        .await
        .expect("add member");
    assert_eq!(membership.organization_id, org.id);
    assert_eq!(membership.user_id, user);
    assert!(!membership.is_primary);

    // The same pair cannot be assigned twice.
    let err = fixture
        .service
        .add_member(&fixture.ctx, org.id, AddOrgMemberInput::new(user))
        .await
        .unwrap_err();
    assert!(matches!(err, OrgUnitError::MemberExists));
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let err = fixture
        .service
        .add_member(&fixture.ctx, org.id, AddOrgMemberInput::new(Uuid::nil()))
        .await
        .unwrap_err();
    assert!(matches!(err, OrgUnitError::InvalidMember(_)));

    let err = fixture
        .service
        .add_member(&fixture.ctx, Uuid::now_v7(), AddOrgMemberInput::new(user))
        .await
        .unwrap_err();
    assert!(matches!(err, OrgUnitError::OrganizationNotFound));
}

/// A new primary assignment demotes the user's previous primary.
///
/// Steps:
/// 1. Assign the user as primary in one organization
/// 2. Assign them as primary in a second organization
/// 3. Verify only the second assignment keeps the flag
#[tokio::test]
async fn test_new_primary_demotes_previous() {
    let fixture = TestFixture::new();
    let first = fixture.create_root("company", "Company").await;
    let second = fixture.create_root("partners", "Partners").await;
    let user = Uuid::now_v7();

    fixture.assign(first.id, user, true).await;
    fixture.assign(second.id, user, true).await;

    let memberships = fixture
        .store
        .user_org_memberships(fixture.domain_id, user)
        .await
        .expect("user memberships");
    assert_eq!(memberships.len(), 2);
    let primaries: Vec<Uuid> = memberships
        .iter()
        .filter(|m| m.is_primary)
        .map(|m| m.organization_id)
        .collect();
    assert_eq!(primaries, vec![second.id]);

    let primary = fixture
        .subtree
        .primary_organization_id(fixture.domain_id, user)
        .await
        .expect("primary organization");
    assert_eq!(primary, second.id);
}

#[tokio::test]
async fn test_primary_falls_back_to_oldest_membership() {
    let fixture = TestFixture::new();
    let first = fixture.create_root("company", "Company").await;
    let second = fixture.create_root("partners", "Partners").await;
    let user = Uuid::now_v7();

    fixture.assign(first.id, user, false).await;
    fixture.assign(second.id, user, false).await;

    // No primary flag anywhere: the oldest assignment stands in.
    let primary = fixture
        .subtree
        .primary_organization_id(fixture.domain_id, user)
        .await
        .expect("fallback primary");
    assert_eq!(primary, first.id);

    let err = fixture
        .subtree
        .primary_organization_id(fixture.domain_id, Uuid::now_v7())
        .await
        .unwrap_err();
    assert!(matches!(err, OrgUnitError::MembershipNotFound));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// =============================================================================
// Subtree resolution
// =============================================================================

/// Subtree queries cover the node and all of its descendants.
///
/// Steps:
/// 1. Build company → engineering → platform, plus a separate root
/// 2. Assign users at different levels
/// 3. Verify direct listing vs subtree listing at each level
#[tokio::test]
async fn test_subtree_user_resolution() {
    let fixture = TestFixture::new();
    let company = fixture.create_root("company", "Company").await;
    let eng = fixture.create_under(company.id, "engineering", "Engineering").await;
    let platform = fixture.create_under(eng.id, "platform", "Platform").await;
    let partners = fixture.create_root("partners", "Partners").await;

    let ada = Uuid::now_v7();
    let bob = Uuid::now_v7();
    let eve = Uuid::now_v7();

    fixture.assign(company.id, ada, false).await;
    fixture.assign(eng.id, bob, false).await;
    fixture.assign(platform.id, eve, false).await;
    // bob also sits in a descendant node; the subtree listing must not
    // repeat them.
    fixture.assign(platform.id, bob, false).await;
    fixture.assign(partners.id, eve, false).await;

    let direct = fixture
        .subtree
        .list_organization_user_ids(fixture.domain_id, eng.id)
        .await
        .expect("direct members");
    assert_eq!(direct, vec![bob]);

    let subtree = fixture
        .subtree
        .list_subtree_user_ids(fixture.domain_id, eng.id)
        .await
        .expect("subtree members");
    assert_eq!(subtree, vec![bob, eve]);

    let whole = fixture
        .subtree
        .list_subtree_user_ids(fixture.domain_id, company.id)
        .await
        .expect("whole company");
    assert_eq!(whole, vec![ada, bob, eve]);

    // An unknown subtree root is an error; an unknown direct listing is
    // just empty.
    assert!(matches!(
        fixture
            .subtree
            .list_subtree_user_ids(fixture.domain_id, Uuid::now_v7())
            .await
            .unwrap_err(),
        OrgUnitError::OrganizationNotFound
    ));
    assert!(fixture
        .subtree
        .list_organization_user_ids(fixture.domain_id, Uuid::now_v7())
        .await
        .expect("unknown organization")
        .is_empty());
}

// =============================================================================
// Scopes
// =============================================================================

#[tokio::test]
async fn test_scope_resolution_and_expansion() {
    let fixture = TestFixture::new();
    let company = fixture.create_root("company", "Company").await;
    let eng = fixture.create_under(company.id, "engineering", "Engineering").await;
    let ada = Uuid::now_v7();
    let bob = Uuid::now_v7();

    fixture.assign(company.id, ada, true).await;
    fixture.assign(eng.id, bob, false).await;

    assert_eq!(
        fixture.scopes.scope_kinds(),
        vec![ScopeKind::SelfOrg, ScopeKind::Subtree]
    );

    let filter = fixture.scopes.resolve(ada, "subtree").expect("resolve scope");
    assert_eq!(
        filter,
        ScopeFilter {
            kind: ScopeKind::Subtree,
            user_id: ada,
        }
    );
    // Unrecognized kinds mean "no restriction".
    assert!(fixture.scopes.resolve(ada, "department").is_none());

    // self: ada's primary organization is "company"; only its direct
    // members are covered.
    let own = fixture.scopes.resolve(ada, "self").expect("resolve scope");
    assert_eq!(
        fixture
            .scopes
            .expand(fixture.domain_id, &own)
            .await
            .expect("expand self"),
        vec![ada]
    );

    // subtree: the whole company tree, engineering included.
    assert_eq!(
        fixture
            .scopes
            .expand(fixture.domain_id, &filter)
            .await
            .expect("expand subtree"),
        vec![ada, bob]
    );

    // Expansion needs a membership to anchor on.
    let stranger = fixture.scopes.resolve(Uuid::now_v7(), "self").expect("resolve");
    assert!(matches!(
        fixture
            .scopes
            .expand(fixture.domain_id, &stranger)
            .await
            .unwrap_err(),
        OrgUnitError::MembershipNotFound
    ));
}

#[tokio::test]
async fn test_ping() {
    let fixture = TestFixture::new();
    fixture.service.ping().await.expect("ping");
}
