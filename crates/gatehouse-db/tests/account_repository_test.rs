//! Account creation transaction tests against an in-memory SurrealDB.

use gatehouse_core::error::GatehouseError;
use gatehouse_core::models::account::NewAccount;
use gatehouse_core::models::role::Role;
use gatehouse_core::repository::{AccountRepository, ProfileRepository, RoleRepository};
use gatehouse_db::repository::{
    SurrealAccountRepository, SurrealProfileRepository, SurrealRoleRepository, verify_password,
};
use gatehouse_db::run_migrations;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();
    db
}

fn new_account(email: &str, flat: Option<&str>) -> NewAccount {
    NewAccount {
        email: email.into(),
        password: "correct-horse-battery".into(),
        full_name: Some("Test User".into()),
        phone_number: Some("555-0100".into()),
        flat_number: flat.map(Into::into),
    }
}

#[tokio::test]
async fn create_with_role_creates_account_role_and_profile() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::new(db.clone());
    let roles = SurrealRoleRepository::new(db.clone());
    let profiles = SurrealProfileRepository::new(db.clone());

    let account = accounts
        .create_with_role(new_account("res@example.com", Some("A-101")), Role::Resident)
        .await
        .unwrap();

    assert_eq!(account.email, "res@example.com");
    assert_ne!(account.password_hash, "correct-horse-battery");

    let assigned = roles.roles_for(account.id).await.unwrap();
    assert_eq!(assigned, vec![Role::Resident]);

    let profile = profiles.get_by_user(account.id).await.unwrap();
    assert_eq!(profile.full_name, "Test User");
    assert_eq!(profile.flat_number.as_deref(), Some("A-101"));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict_and_leaves_no_partial_rows() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::new(db.clone());
    let roles = SurrealRoleRepository::new(db.clone());

    accounts
        .create_with_role(new_account("dup@example.com", None), Role::Guard)
        .await
        .unwrap();

    let err = accounts
        .create_with_role(new_account("dup@example.com", None), Role::Resident)
        .await
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Conflict { .. }));

    // The failed transaction must not leave a stray role assignment.
    assert_eq!(roles.count_with_role(Role::Resident).await.unwrap(), 0);
}

#[tokio::test]
async fn bootstrap_claims_lock_and_creates_super_admin() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::new(db.clone());
    let roles = SurrealRoleRepository::new(db.clone());

    let account = accounts
        .create_bootstrap(new_account("root@example.com", None))
        .await
        .unwrap();

    let assigned = roles.roles_for(account.id).await.unwrap();
    assert_eq!(assigned, vec![Role::SuperAdmin]);
    assert_eq!(roles.count_with_role(Role::SuperAdmin).await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_bootstraps_admit_exactly_one_winner() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::new(db.clone());
    let roles = SurrealRoleRepository::new(db.clone());

    let (a, b) = tokio::join!(
        accounts.create_bootstrap(new_account("first@example.com", None)),
        accounts.create_bootstrap(new_account("second@example.com", None)),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one bootstrap may claim the lock");

    assert_eq!(roles.count_with_role(Role::SuperAdmin).await.unwrap(), 1);
}

#[tokio::test]
async fn second_bootstrap_attempt_is_a_conflict() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::new(db.clone());

    accounts
        .create_bootstrap(new_account("root@example.com", None))
        .await
        .unwrap();

    let err = accounts
        .create_bootstrap(new_account("pretender@example.com", None))
        .await
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Conflict { .. }));
}

#[tokio::test]
async fn get_by_email_finds_the_account() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::new(db.clone());

    let created = accounts
        .create_with_role(new_account("find@example.com", None), Role::Guard)
        .await
        .unwrap();

    let fetched = accounts.get_by_email("find@example.com").await.unwrap();
    assert_eq!(fetched.id, created.id);

    let err = accounts.get_by_email("nobody@example.com").await.unwrap_err();
    assert!(matches!(err, GatehouseError::NotFound { .. }));
}

#[tokio::test]
async fn provisioning_a_resident_into_an_occupied_flat_is_a_conflict() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::new(db.clone());
    let profiles = SurrealProfileRepository::new(db.clone());

    accounts
        .create_with_role(new_account("first@example.com", Some("B-202")), Role::Resident)
        .await
        .unwrap();

    let err = accounts
        .create_with_role(new_account("second@example.com", Some("B-202")), Role::Resident)
        .await
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Conflict { .. }));

    // The failed transaction must not leave a stray account.
    let err = accounts.get_by_email("second@example.com").await.unwrap_err();
    assert!(matches!(err, GatehouseError::NotFound { .. }));
    let holder = profiles.get_by_flat("B-202").await.unwrap();
    assert_eq!(holder.full_name, "Test User");
}

#[tokio::test]
async fn verify_credentials_accepts_only_the_matching_pair() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::new(db.clone());

    let created = accounts
        .create_with_role(new_account("creds@example.com", None), Role::Resident)
        .await
        .unwrap();

    let verified = accounts
        .verify_credentials("creds@example.com", "correct-horse-battery")
        .await
        .unwrap();
    assert_eq!(verified.id, created.id);

    let err = accounts
        .verify_credentials("creds@example.com", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Unauthenticated { .. }));

    // Unknown email fails the same way as a wrong password.
    let err = accounts
        .verify_credentials("nobody@example.com", "correct-horse-battery")
        .await
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Unauthenticated { .. }));
}

#[tokio::test]
async fn verify_credentials_applies_the_pepper() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::with_pepper(db.clone(), "orange-zest".into());

    accounts
        .create_with_role(new_account("zest@example.com", None), Role::Resident)
        .await
        .unwrap();

    accounts
        .verify_credentials("zest@example.com", "correct-horse-battery")
        .await
        .unwrap();

    // The same password fails through a repository without the pepper.
    let unpeppered = SurrealAccountRepository::new(db.clone());
    let err = unpeppered
        .verify_credentials("zest@example.com", "correct-horse-battery")
        .await
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Unauthenticated { .. }));
}

#[tokio::test]
async fn stored_hash_verifies_against_the_original_password() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::new(db.clone());

    let account = accounts
        .create_with_role(new_account("hash@example.com", None), Role::Resident)
        .await
        .unwrap();

    assert!(verify_password("correct-horse-battery", &account.password_hash, None).unwrap());
    assert!(!verify_password("wrong-password", &account.password_hash, None).unwrap());
}

#[tokio::test]
async fn peppered_hash_requires_the_same_pepper() {
    let db = setup_db().await;
    let accounts = SurrealAccountRepository::with_pepper(db.clone(), "orange-zest".into());

    let account = accounts
        .create_with_role(new_account("pepper@example.com", None), Role::Resident)
        .await
        .unwrap();

    assert!(
        verify_password(
            "correct-horse-battery",
            &account.password_hash,
            Some("orange-zest")
        )
        .unwrap()
    );
    assert!(!verify_password("correct-horse-battery", &account.password_hash, None).unwrap());
}
