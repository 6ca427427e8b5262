//! Integration tests for monthly dues generation.
//!
//! Requires a running `PostgreSQL` database with migrations applied:
//! `DATABASE_URL=... cargo test -p society-db -- --ignored`

mod common;

use rust_decimal_macros::dec;
use society_core::period::MonthYear;
use society_db::repositories::DuesFilter;
use society_db::{DuesRepository, MemberRepository};

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_generation_is_idempotent_per_month() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(0)).await;
    common::occupied_flat(&db, society_id, dec!(2500)).await;
    common::occupied_housing(&db, society_id, dec!(4000)).await;

    let repo = DuesRepository::new(db.clone());
    let march = MonthYear::new(2024, 3).unwrap();

    let first = repo.generate_for_month(Some(society_id), march).await.unwrap();
    assert_eq!(first.flats_created, 1);
    assert_eq!(first.housing_units_created, 1);

    let second = repo.generate_for_month(Some(society_id), march).await.unwrap();
    assert_eq!(second.total(), 0);

    let dues = repo
        .list(
            society_id,
            DuesFilter {
                month: Some(march),
                ..DuesFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(dues.len(), 2);
    assert!(dues.iter().all(|d| !d.member_ids.is_empty()));
    assert!(dues.iter().any(|d| d.maintenance_amount == dec!(2500)));
    assert!(dues.iter().any(|d| d.maintenance_amount == dec!(4000)));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_two_months_create_two_rows_per_unit() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(0)).await;
    common::occupied_flat(&db, society_id, dec!(1000)).await;

    let repo = DuesRepository::new(db.clone());
    repo.generate_for_month(Some(society_id), MonthYear::new(2024, 3).unwrap())
        .await
        .unwrap();
    repo.generate_for_month(Some(society_id), MonthYear::new(2024, 4).unwrap())
        .await
        .unwrap();

    let dues = repo.list(society_id, DuesFilter::default()).await.unwrap();
    assert_eq!(dues.len(), 2);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_vacated_unit_is_not_billed() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(0)).await;
    common::occupied_flat(&db, society_id, dec!(1000)).await;

    let members = MemberRepository::new(db.clone());
    for member in members.list_active(society_id).await.unwrap() {
        members.unassign(society_id, member.id).await.unwrap();
    }

    let repo = DuesRepository::new(db.clone());
    let month = MonthYear::new(2024, 5).unwrap();
    assert!(repo.units_needing_due(society_id, month).await.unwrap().is_empty());
    let summary = repo.generate_for_month(Some(society_id), month).await.unwrap();
    assert_eq!(summary.total(), 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_if_absent_respects_existing_due() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(0)).await;
    common::occupied_housing(&db, society_id, dec!(3000)).await;

    let repo = DuesRepository::new(db.clone());
    let month = MonthYear::new(2024, 6).unwrap();
    let drafts = repo.units_needing_due(society_id, month).await.unwrap();
    assert_eq!(drafts.len(), 1);

    assert!(repo.insert_if_absent(&drafts[0]).await.unwrap());
    assert!(!repo.insert_if_absent(&drafts[0]).await.unwrap());
    assert!(repo.units_needing_due(society_id, month).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_mark_due_paid_twice_reports_already_paid() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(0)).await;
    common::occupied_flat(&db, society_id, dec!(1500)).await;

    let repo = DuesRepository::new(db.clone());
    repo.generate_for_month(Some(society_id), MonthYear::new(2024, 7).unwrap())
        .await
        .unwrap();
    let due = repo
        .list(society_id, DuesFilter::default())
        .await
        .unwrap()
        .remove(0);

    let (paid, outcome) = repo.mark_paid(society_id, due.id).await.unwrap();
    assert!(paid.maintenance_paid);
    assert!(!outcome.was_already_applied());

    let (again, outcome) = repo.mark_paid(society_id, due.id).await.unwrap();
    assert!(outcome.was_already_applied());
    assert_eq!(again.maintenance_paid_at, paid.maintenance_paid_at);
}
