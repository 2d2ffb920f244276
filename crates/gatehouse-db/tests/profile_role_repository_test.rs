//! Profile and role assignment store tests.

use gatehouse_core::error::GatehouseError;
use gatehouse_core::models::profile::CreateProfile;
use gatehouse_core::models::role::Role;
use gatehouse_core::repository::{Pagination, ProfileRepository, RoleRepository};
use gatehouse_db::repository::{SurrealProfileRepository, SurrealRoleRepository};
use gatehouse_db::run_migrations;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();
    db
}

fn profile_input(user_id: Uuid, name: &str, flat: Option<&str>) -> CreateProfile {
    CreateProfile {
        user_id,
        full_name: name.into(),
        phone_number: "555-0100".into(),
        flat_number: flat.map(Into::into),
    }
}

/// Role rows are normally written by account provisioning; seed them
/// directly here so role reads can be tested in isolation.
async fn seed_role(db: &Surreal<Db>, user_id: Uuid, role: &str) {
    db.query("CREATE user_role SET user_id = $user_id, role = $role")
        .bind(("user_id", user_id.to_string()))
        .bind(("role", role.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();
}

#[tokio::test]
async fn flat_lookup_resolves_the_assigned_resident() {
    let db = setup_db().await;
    let profiles = SurrealProfileRepository::new(db.clone());
    let user_id = Uuid::new_v4();

    profiles
        .create(profile_input(user_id, "Meera Nair", Some("A-101")))
        .await
        .unwrap();

    let found = profiles.get_by_flat("A-101").await.unwrap();
    assert_eq!(found.user_id, user_id);

    let err = profiles.get_by_flat("Z-999").await.unwrap_err();
    assert!(matches!(err, GatehouseError::NotFound { .. }));
}

#[tokio::test]
async fn assign_flat_moves_a_resident_but_rejects_occupied_flats() {
    let db = setup_db().await;
    let profiles = SurrealProfileRepository::new(db.clone());
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    profiles
        .create(profile_input(first, "Meera Nair", Some("A-101")))
        .await
        .unwrap();
    profiles
        .create(profile_input(second, "Vikram Rao", None))
        .await
        .unwrap();

    let moved = profiles.assign_flat(second, "B-202").await.unwrap();
    assert_eq!(moved.flat_number.as_deref(), Some("B-202"));

    let err = profiles.assign_flat(second, "A-101").await.unwrap_err();
    assert!(matches!(err, GatehouseError::Conflict { .. }));
}

#[tokio::test]
async fn racing_flat_assignments_admit_exactly_one_resident() {
    let db = setup_db().await;
    let profiles = SurrealProfileRepository::new(db.clone());
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    profiles
        .create(profile_input(first, "Meera Nair", None))
        .await
        .unwrap();
    profiles
        .create(profile_input(second, "Vikram Rao", None))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        profiles.assign_flat(first, "C-303"),
        profiles.assign_flat(second, "C-303"),
    );
    let winners = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(winners, 1, "one assignment must win, one must fail");

    let holders = [
        profiles.get_by_user(first).await.unwrap().flat_number,
        profiles.get_by_user(second).await.unwrap().flat_number,
    ]
    .iter()
    .filter(|flat| flat.as_deref() == Some("C-303"))
    .count();
    assert_eq!(holders, 1, "the flat must end up with a single resident");
}

#[tokio::test]
async fn provisioning_two_profiles_into_one_flat_is_a_conflict() {
    let db = setup_db().await;
    let profiles = SurrealProfileRepository::new(db.clone());

    profiles
        .create(profile_input(Uuid::new_v4(), "Meera Nair", Some("D-404")))
        .await
        .unwrap();
    let err = profiles
        .create(profile_input(Uuid::new_v4(), "Vikram Rao", Some("D-404")))
        .await
        .unwrap_err();
    assert!(matches!(err, GatehouseError::Conflict { .. }));
}

#[tokio::test]
async fn assigning_a_flat_to_an_unknown_profile_fails() {
    let db = setup_db().await;
    let profiles = SurrealProfileRepository::new(db.clone());

    let err = profiles.assign_flat(Uuid::new_v4(), "E-505").await.unwrap_err();
    assert!(matches!(err, GatehouseError::NotFound { .. }));
}

#[tokio::test]
async fn list_paginates_profiles() {
    let db = setup_db().await;
    let profiles = SurrealProfileRepository::new(db.clone());

    for i in 0..4 {
        profiles
            .create(profile_input(Uuid::new_v4(), &format!("Resident {i}"), None))
            .await
            .unwrap();
    }

    let page = profiles
        .list(Pagination {
            offset: 0,
            limit: 3,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 3);
}

#[tokio::test]
async fn roles_accumulate_and_count_per_role() {
    let db = setup_db().await;
    let roles = SurrealRoleRepository::new(db.clone());
    let user_id = Uuid::new_v4();

    seed_role(&db, user_id, "resident").await;
    seed_role(&db, user_id, "guard").await;

    let assigned = roles.roles_for(user_id).await.unwrap();
    assert_eq!(assigned.len(), 2);
    assert!(assigned.contains(&Role::Resident));
    assert!(assigned.contains(&Role::Guard));

    assert_eq!(roles.count_with_role(Role::Guard).await.unwrap(), 1);
    assert_eq!(roles.count_with_role(Role::Admin).await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_role_rows_are_rejected_by_the_unique_index() {
    let db = setup_db().await;
    let user_id = Uuid::new_v4();

    seed_role(&db, user_id, "resident").await;

    let result = db
        .query("CREATE user_role SET user_id = $user_id, role = $role")
        .bind(("user_id", user_id.to_string()))
        .bind(("role", "resident".to_string()))
        .await
        .unwrap()
        .check();
    assert!(result.is_err());
}

#[tokio::test]
async fn unknown_principal_has_no_roles() {
    let db = setup_db().await;
    let roles = SurrealRoleRepository::new(db.clone());

    let assigned = roles.roles_for(Uuid::new_v4()).await.unwrap();
    assert!(assigned.is_empty());
}
