//! Schema and migration tests against an in-memory SurrealDB.

use gatehouse_db::run_migrations;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    db
}

#[tokio::test]
async fn migrations_apply_cleanly() {
    let db = setup_db().await;
    run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = setup_db().await;
    run_migrations(&db).await.unwrap();
    run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn role_assert_rejects_unknown_roles() {
    let db = setup_db().await;
    run_migrations(&db).await.unwrap();

    let result = db
        .query("CREATE user_role SET user_id = 'u1', role = 'janitor'")
        .await
        .unwrap()
        .check();
    assert!(result.is_err(), "closed role set must reject 'janitor'");
}

#[tokio::test]
async fn visitor_status_assert_rejects_unknown_statuses() {
    let db = setup_db().await;
    run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE visitor SET \
             visitor_name = 'A', visitor_phone = 'B', purpose = 'C', \
             flat_number = 'A-101', resident_id = 'r', logged_by = 'g', \
             status = 'waiting'",
        )
        .await
        .unwrap()
        .check();
    assert!(result.is_err(), "closed status set must reject 'waiting'");
}

#[tokio::test]
async fn account_email_is_unique() {
    let db = setup_db().await;
    run_migrations(&db).await.unwrap();

    db.query("CREATE account SET email = 'a@b.c', password_hash = 'h'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query("CREATE account SET email = 'a@b.c', password_hash = 'h'")
        .await
        .unwrap()
        .check();
    assert!(result.is_err(), "duplicate email must be rejected");
}

#[tokio::test]
async fn bootstrap_lock_id_cannot_be_claimed_twice() {
    let db = setup_db().await;
    run_migrations(&db).await.unwrap();

    db.query("CREATE type::record('bootstrap_lock', 'super_admin') SET claimed_by = 'u1'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query("CREATE type::record('bootstrap_lock', 'super_admin') SET claimed_by = 'u2'")
        .await
        .unwrap()
        .check();
    assert!(result.is_err(), "fixed-id lock must be claimable once");
}

#[tokio::test]
async fn a_flat_claim_cannot_be_created_twice() {
    let db = setup_db().await;
    run_migrations(&db).await.unwrap();

    db.query("CREATE type::record('flat_claim', 'A-101') SET user_id = 'u1'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query("CREATE type::record('flat_claim', 'A-101') SET user_id = 'u2'")
        .await
        .unwrap()
        .check();
    assert!(result.is_err(), "a flat claim is held by one resident");
}
