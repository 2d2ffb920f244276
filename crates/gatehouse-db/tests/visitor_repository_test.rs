//! Visitor store tests: creation, compare-and-swap transitions, and
//! the list queries backing each dashboard.

use chrono::{Duration, Utc};
use gatehouse_core::error::GatehouseError;
use gatehouse_core::models::visitor::{CreateVisitor, VisitorStatus};
use gatehouse_core::repository::{Pagination, VisitorRepository};
use gatehouse_db::repository::SurrealVisitorRepository;
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

fn pending_entry(name: &str, flat: &str, resident_id: Uuid) -> CreateVisitor {
    CreateVisitor {
        visitor_name: name.into(),
        visitor_phone: "555-0199".into(),
        purpose: "Delivery".into(),
        flat_number: flat.into(),
        resident_id,
        logged_by: Uuid::new_v4(),
        status: VisitorStatus::Pending,
        expected_at: None,
        notes: Some("left package at gate".into()),
        approved_at: None,
        approved_by: None,
    }
}

#[tokio::test]
async fn create_and_fetch_roundtrip() {
    let db = setup_db().await;
    let repo = SurrealVisitorRepository::new(db.clone());
    let resident_id = Uuid::new_v4();

    let created = repo
        .create(pending_entry("Asha Pillai", "A-101", resident_id))
        .await
        .unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.visitor_name, "Asha Pillai");
    assert_eq!(fetched.resident_id, resident_id);
    assert_eq!(fetched.status, VisitorStatus::Pending);
    assert_eq!(fetched.notes.as_deref(), Some("left package at gate"));
}

#[tokio::test]
async fn transition_into_approved_stamps_the_approver() {
    let db = setup_db().await;
    let repo = SurrealVisitorRepository::new(db.clone());
    let resident_id = Uuid::new_v4();

    let created = repo
        .create(pending_entry("Asha Pillai", "A-101", resident_id))
        .await
        .unwrap();

    let approved = repo
        .transition(
            created.id,
            VisitorStatus::Pending,
            VisitorStatus::Approved,
            Some(resident_id),
        )
        .await
        .unwrap();

    assert_eq!(approved.status, VisitorStatus::Approved);
    assert_eq!(approved.approved_by, Some(resident_id));
    assert!(approved.approved_at.is_some());
}

#[tokio::test]
async fn transition_into_denied_carries_no_stamps() {
    let db = setup_db().await;
    let repo = SurrealVisitorRepository::new(db.clone());

    let created = repo
        .create(pending_entry("Asha Pillai", "A-101", Uuid::new_v4()))
        .await
        .unwrap();

    let denied = repo
        .transition(created.id, VisitorStatus::Pending, VisitorStatus::Denied, None)
        .await
        .unwrap();

    assert_eq!(denied.status, VisitorStatus::Denied);
    assert!(denied.approved_at.is_none());
    assert!(denied.approved_by.is_none());
}

#[tokio::test]
async fn stale_precondition_fails_with_the_current_state() {
    let db = setup_db().await;
    let repo = SurrealVisitorRepository::new(db.clone());

    let created = repo
        .create(pending_entry("Asha Pillai", "A-101", Uuid::new_v4()))
        .await
        .unwrap();
    repo.transition(created.id, VisitorStatus::Pending, VisitorStatus::Denied, None)
        .await
        .unwrap();

    let err = repo
        .transition(
            created.id,
            VisitorStatus::Pending,
            VisitorStatus::Approved,
            None,
        )
        .await
        .unwrap_err();

    match err {
        GatehouseError::InvalidTransition { from, to } => {
            assert_eq!(from, "denied");
            assert_eq!(to, "approved");
        }
        other => panic!("expected InvalidTransition, got {other:?}"),
    }
}

#[tokio::test]
async fn transition_on_missing_record_fails_not_found() {
    let db = setup_db().await;
    let repo = SurrealVisitorRepository::new(db.clone());

    let err = repo
        .transition(
            Uuid::new_v4(),
            VisitorStatus::Pending,
            VisitorStatus::Approved,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GatehouseError::NotFound { .. }));
}

#[tokio::test]
async fn list_all_paginates_newest_first() {
    let db = setup_db().await;
    let repo = SurrealVisitorRepository::new(db.clone());

    for i in 0..5 {
        repo.create(pending_entry(&format!("Visitor {i}"), "A-101", Uuid::new_v4()))
            .await
            .unwrap();
    }

    let page = repo
        .list_all(Pagination {
            offset: 0,
            limit: 3,
        })
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 3);

    let rest = repo
        .list_all(Pagination {
            offset: 3,
            limit: 3,
        })
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 2);
}

#[tokio::test]
async fn list_by_flat_filters_and_list_recent_bounds() {
    let db = setup_db().await;
    let repo = SurrealVisitorRepository::new(db.clone());

    repo.create(pending_entry("One", "A-101", Uuid::new_v4()))
        .await
        .unwrap();
    repo.create(pending_entry("Two", "B-202", Uuid::new_v4()))
        .await
        .unwrap();
    repo.create(pending_entry("Three", "A-101", Uuid::new_v4()))
        .await
        .unwrap();

    let flat = repo.list_by_flat("A-101").await.unwrap();
    assert_eq!(flat.len(), 2);
    assert!(flat.iter().all(|v| v.flat_number == "A-101"));

    let recent = repo.list_recent(2).await.unwrap();
    assert_eq!(recent.len(), 2);
}

#[tokio::test]
async fn list_expected_returns_approved_preregistrations_in_arrival_order() {
    let db = setup_db().await;
    let repo = SurrealVisitorRepository::new(db.clone());
    let resident_id = Uuid::new_v4();

    let mut later = pending_entry("Later", "A-101", resident_id);
    later.status = VisitorStatus::Approved;
    later.expected_at = Some(Utc::now() + Duration::hours(6));
    later.approved_at = Some(Utc::now());
    later.approved_by = Some(resident_id);
    repo.create(later).await.unwrap();

    let mut sooner = pending_entry("Sooner", "A-101", resident_id);
    sooner.status = VisitorStatus::Approved;
    sooner.expected_at = Some(Utc::now() + Duration::hours(1));
    sooner.approved_at = Some(Utc::now());
    sooner.approved_by = Some(resident_id);
    repo.create(sooner).await.unwrap();

    // A plain pending walk-up never shows up as expected.
    repo.create(pending_entry("Walk-up", "A-101", resident_id))
        .await
        .unwrap();

    let expected = repo.list_expected("A-101").await.unwrap();
    assert_eq!(expected.len(), 2);
    assert_eq!(expected[0].visitor_name, "Sooner");
    assert_eq!(expected[1].visitor_name, "Later");
}
