//! Behavioural tests for the role invariant guard over the in-memory store.
//!
//! These exercise the real service end to end: seeding users and roles,
//! mutating assignments through the driving ports, and asserting that no
//! successful call ever leaves the system without an administrator.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use rstest::rstest;
use role_guard::domain::ports::{
    RoleAssignmentCommand, RoleAssignmentQuery, RoleStore, RoleStoreError,
};
use role_guard::domain::{
    GuardConfig, RoleAssignmentError, RoleAssignmentService, RoleId, RoleName, UserId,
};
use role_guard::outbound::InMemoryRoleStore;

/// A shelter backend with one administrator ("alice") and a volunteer role.
struct SingleAdminFixture {
    store: Arc<InMemoryRoleStore>,
    service: RoleAssignmentService<InMemoryRoleStore>,
    alice: UserId,
    admin_role: RoleId,
    volunteer_role: RoleId,
}

async fn single_admin_fixture() -> SingleAdminFixture {
    let store = Arc::new(InMemoryRoleStore::new());
    let admin_role = store.add_role("Administrator").await.expect("valid role name");
    let volunteer_role = store.add_role("Volunteer").await.expect("valid role name");
    let alice = store.add_user().await;
    store
        .assign(&alice, &admin_role)
        .await
        .expect("seed assignment");

    let service = RoleAssignmentService::new(Arc::clone(&store), GuardConfig::default());
    SingleAdminFixture {
        store,
        service,
        alice,
        admin_role,
        volunteer_role,
    }
}

async fn admin_count(store: &InMemoryRoleStore, admin_role: &RoleId) -> u64 {
    store
        .count_distinct_users_with_role(admin_role)
        .await
        .expect("count succeeds")
}

#[tokio::test]
async fn scenario_a_sole_admin_demotion_is_rejected_and_state_unchanged() {
    let fixture = single_admin_fixture().await;

    let outcome = fixture
        .service
        .reassign_role(&fixture.alice, &fixture.volunteer_role)
        .await;

    assert!(matches!(
        outcome,
        Err(RoleAssignmentError::LastAdminProtected)
    ));
    let alice_roles = fixture
        .store
        .get_user_role_ids(&fixture.alice)
        .await
        .expect("lookup succeeds");
    assert!(alice_roles.contains(&fixture.admin_role));
    assert_eq!(admin_count(&fixture.store, &fixture.admin_role).await, 1);
}

#[tokio::test]
async fn scenario_b_demoting_one_of_two_admins_protects_the_survivor() {
    let fixture = single_admin_fixture().await;
    let bob = fixture.store.add_user().await;
    fixture
        .store
        .assign(&bob, &fixture.admin_role)
        .await
        .expect("seed assignment");

    fixture
        .service
        .reassign_role(&fixture.alice, &fixture.volunteer_role)
        .await
        .expect("demotion succeeds while bob remains admin");

    let can_delete_bob = fixture
        .service
        .can_delete_user(&bob)
        .await
        .expect("query succeeds");
    assert!(!can_delete_bob, "bob is now the sole admin");

    let outcome = fixture
        .service
        .reassign_role(&bob, &fixture.volunteer_role)
        .await;
    assert!(matches!(
        outcome,
        Err(RoleAssignmentError::LastAdminProtected)
    ));
}

#[tokio::test]
async fn scenario_c_without_an_admin_role_the_guard_never_fires() {
    let store = Arc::new(InMemoryRoleStore::new());
    let volunteer_role = store.add_role("Volunteer").await.expect("valid role name");
    let keeper_role = store.add_role("Keeper").await.expect("valid role name");
    let charlie = store.add_user().await;
    store
        .assign(&charlie, &volunteer_role)
        .await
        .expect("seed assignment");

    let service = RoleAssignmentService::new(Arc::clone(&store), GuardConfig::default());

    service
        .reassign_role(&charlie, &keeper_role)
        .await
        .expect("no administrator role configured, nothing to protect");
    service
        .remove_role(&charlie)
        .await
        .expect("removal is unguarded too");
    assert!(
        service
            .can_delete_user(&charlie)
            .await
            .expect("query succeeds")
    );
}

#[tokio::test]
async fn scenario_d_remove_role_without_assignments_is_a_noop_success() {
    let fixture = single_admin_fixture().await;
    let charlie = fixture.store.add_user().await;

    fixture
        .service
        .remove_role(&charlie)
        .await
        .expect("first removal is a no-op success");
    fixture
        .service
        .remove_role(&charlie)
        .await
        .expect("second removal is equally a no-op");
}

#[tokio::test]
async fn remove_role_is_idempotent_for_former_volunteers() {
    let fixture = single_admin_fixture().await;
    let dana = fixture.store.add_user().await;
    fixture
        .store
        .assign(&dana, &fixture.volunteer_role)
        .await
        .expect("seed assignment");

    fixture
        .service
        .remove_role(&dana)
        .await
        .expect("removal succeeds");
    fixture
        .service
        .remove_role(&dana)
        .await
        .expect("repeat removal is a no-op success");
}

#[tokio::test]
async fn guarded_deletion_spares_the_sole_admin_only() {
    let fixture = single_admin_fixture().await;
    let bob = fixture.store.add_user().await;
    fixture
        .store
        .assign(&bob, &fixture.admin_role)
        .await
        .expect("seed assignment");

    fixture
        .service
        .delete_user(&bob)
        .await
        .expect("an admin among others can be deleted");

    let outcome = fixture.service.delete_user(&fixture.alice).await;
    assert!(matches!(
        outcome,
        Err(RoleAssignmentError::LastAdminProtected)
    ));
    assert_eq!(admin_count(&fixture.store, &fixture.admin_role).await, 1);
}

#[tokio::test]
async fn no_mutation_sequence_drops_the_admin_count_to_zero() {
    let fixture = single_admin_fixture().await;
    let bob = fixture.store.add_user().await;
    fixture
        .store
        .assign(&bob, &fixture.admin_role)
        .await
        .expect("seed assignment");

    // Demote, remove, and delete in an order that tries to drain the
    // administrator pool; each step either succeeds or is rejected as
    // protected, and the count never reaches zero.
    fn succeeded_or_protected(outcome: &Result<(), RoleAssignmentError>) -> bool {
        matches!(outcome, Ok(()) | Err(RoleAssignmentError::LastAdminProtected))
    }

    let demote_alice = fixture
        .service
        .reassign_role(&fixture.alice, &fixture.volunteer_role)
        .await;
    assert!(succeeded_or_protected(&demote_alice));
    assert!(admin_count(&fixture.store, &fixture.admin_role).await >= 1);

    let remove_bob = fixture.service.remove_role(&bob).await;
    assert!(succeeded_or_protected(&remove_bob));
    assert!(admin_count(&fixture.store, &fixture.admin_role).await >= 1);

    let delete_bob = fixture.service.delete_user(&bob).await;
    assert!(succeeded_or_protected(&delete_bob));
    assert!(admin_count(&fixture.store, &fixture.admin_role).await >= 1);

    let promote_alice = fixture
        .service
        .reassign_role(&fixture.alice, &fixture.admin_role)
        .await;
    assert!(succeeded_or_protected(&promote_alice));
    assert!(admin_count(&fixture.store, &fixture.admin_role).await >= 1);
}

#[tokio::test]
async fn queries_partition_the_role_catalogue() {
    let fixture = single_admin_fixture().await;

    let held = fixture
        .service
        .roles_for_user(&fixture.alice)
        .await
        .expect("query succeeds");
    let assignable = fixture
        .service
        .assignable_roles_for_user(&fixture.alice)
        .await
        .expect("query succeeds");

    assert_eq!(held.len(), 1);
    assert_eq!(held.first().map(|role| role.id), Some(fixture.admin_role));
    assert_eq!(assignable.len(), 1);
    assert_eq!(
        assignable.first().map(|role| role.id),
        Some(fixture.volunteer_role)
    );
}

#[rstest]
#[case("Administrator")]
#[case("administrator")]
#[case("  ADMINISTRATOR  ")]
#[tokio::test]
async fn admin_role_detection_tolerates_spelling_variants(#[case] seeded_name: &str) {
    let store = Arc::new(InMemoryRoleStore::new());
    let admin_role = store.add_role(seeded_name).await.expect("valid role name");
    let volunteer_role = store.add_role("Volunteer").await.expect("valid role name");
    let alice = store.add_user().await;
    store
        .assign(&alice, &admin_role)
        .await
        .expect("seed assignment");

    let service = RoleAssignmentService::new(store, GuardConfig::default());
    let outcome = service.reassign_role(&alice, &volunteer_role).await;
    assert!(matches!(
        outcome,
        Err(RoleAssignmentError::LastAdminProtected)
    ));
}

#[tokio::test]
async fn custom_admin_identifier_is_honoured() {
    let store = Arc::new(InMemoryRoleStore::new());
    let admin_role = store.add_role("Superuser").await.expect("valid role name");
    let volunteer_role = store.add_role("Volunteer").await.expect("valid role name");
    let alice = store.add_user().await;
    store
        .assign(&alice, &admin_role)
        .await
        .expect("seed assignment");

    let config = GuardConfig::default()
        .with_administrator_role(RoleName::new("superuser").expect("valid role name"));
    let service = RoleAssignmentService::new(store, config);

    let outcome = service.reassign_role(&alice, &volunteer_role).await;
    assert!(matches!(
        outcome,
        Err(RoleAssignmentError::LastAdminProtected)
    ));
}

/// Store wrapper that fails `insert_user_role` for one designated role,
/// simulating a mid-replace storage fault.
struct FaultyInsertStore {
    inner: Arc<InMemoryRoleStore>,
    poisoned_role: RoleId,
}

#[async_trait]
impl RoleStore for FaultyInsertStore {
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, RoleStoreError> {
        self.inner.user_exists(user_id).await
    }

    async fn role_exists(&self, role_id: &RoleId) -> Result<bool, RoleStoreError> {
        self.inner.role_exists(role_id).await
    }

    async fn find_admin_role_id(
        &self,
        name: &RoleName,
    ) -> Result<Option<RoleId>, RoleStoreError> {
        self.inner.find_admin_role_id(name).await
    }

    async fn count_distinct_users_with_role(
        &self,
        role_id: &RoleId,
    ) -> Result<u64, RoleStoreError> {
        self.inner.count_distinct_users_with_role(role_id).await
    }

    async fn get_user_role_ids(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeSet<RoleId>, RoleStoreError> {
        self.inner.get_user_role_ids(user_id).await
    }

    async fn list_roles(
        &self,
    ) -> Result<Vec<role_guard::domain::Role>, RoleStoreError> {
        self.inner.list_roles().await
    }

    async fn remove_user_roles(&self, user_id: &UserId) -> Result<u64, RoleStoreError> {
        self.inner.remove_user_roles(user_id).await
    }

    async fn insert_user_role(
        &self,
        user_id: &UserId,
        role_id: &RoleId,
    ) -> Result<(), RoleStoreError> {
        if *role_id == self.poisoned_role {
            return Err(RoleStoreError::timeout("simulated insert fault"));
        }
        self.inner.insert_user_role(user_id, role_id).await
    }

    async fn delete_user(&self, user_id: &UserId) -> Result<(), RoleStoreError> {
        self.inner.delete_user(user_id).await
    }
}

#[tokio::test]
async fn a_failed_insert_rolls_the_replace_back() {
    let inner = Arc::new(InMemoryRoleStore::new());
    let admin_role = inner.add_role("Administrator").await.expect("valid role name");
    let volunteer_role = inner.add_role("Volunteer").await.expect("valid role name");
    let keeper_role = inner.add_role("Keeper").await.expect("valid role name");
    let alice = inner.add_user().await;
    let bob = inner.add_user().await;
    inner
        .assign(&alice, &admin_role)
        .await
        .expect("seed assignment");
    inner
        .assign(&bob, &admin_role)
        .await
        .expect("seed assignment");
    inner
        .assign(&alice, &keeper_role)
        .await
        .expect("seed assignment");

    let before = inner
        .get_user_role_ids(&alice)
        .await
        .expect("lookup succeeds");

    let faulty = Arc::new(FaultyInsertStore {
        inner: Arc::clone(&inner),
        poisoned_role: volunteer_role,
    });
    let service = RoleAssignmentService::new(faulty, GuardConfig::default());

    let outcome = service.reassign_role(&alice, &volunteer_role).await;
    assert!(matches!(outcome, Err(RoleAssignmentError::Storage(_))));

    let after = inner
        .get_user_role_ids(&alice)
        .await
        .expect("lookup succeeds");
    assert_eq!(
        after, before,
        "alice's role set is restored after the fault"
    );
}
