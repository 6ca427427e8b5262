//! Integration tests for pending maintenance, penalties and the dashboard.
//!
//! Requires a running `PostgreSQL` database with migrations applied.

mod common;

use rust_decimal_macros::dec;
use society_core::allocation::AllocationMode;
use society_core::ledger::{LedgerEntryDraft, LedgerKind};
use society_core::period::MonthYear;
use society_db::repositories::{
    CreatePendingInput, CreatePenaltyInput, DuesFilter, MaintenanceError, PenaltyRepoError,
};
use society_db::{
    DashboardRepository, DuesRepository, LedgerRepository, MaintenanceRepository,
    PenaltyRepository,
};

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_quarterly_allocation_and_duplicate_conflict() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(0)).await;
    common::occupied_flat(&db, society_id, dec!(2000)).await;

    let dues = DuesRepository::new(db.clone());
    dues.generate_for_month(Some(society_id), MonthYear::new(2024, 1).unwrap())
        .await
        .unwrap();
    let due = dues
        .list(society_id, DuesFilter::default())
        .await
        .unwrap()
        .remove(0);

    let repo = MaintenanceRepository::new(db.clone());
    let input = CreatePendingInput {
        due_id: due.id,
        amount: dec!(10000),
        mode: AllocationMode::Quarterly,
        start_month: None,
        manual: None,
        created_by: admin,
    };
    let created = repo.create_pending(society_id, input.clone()).await.unwrap();
    let amounts: Vec<_> = created.allocations.iter().map(|a| a.amount).collect();
    assert_eq!(amounts, vec![dec!(3333), dec!(3333), dec!(3334)]);
    assert_eq!(
        created.allocations[0].month_year,
        MonthYear::new(2024, 1).unwrap().first_day()
    );

    let err = repo.create_pending(society_id, input).await.unwrap_err();
    assert!(matches!(err, MaintenanceError::AlreadyAllocated(_)));

    let allocation_id = created.allocations[0].id;
    let (_, first) = repo.mark_allocation_paid(society_id, allocation_id).await.unwrap();
    let (_, second) = repo.mark_allocation_paid(society_id, allocation_id).await.unwrap();
    assert!(!first.was_already_applied());
    assert!(second.was_already_applied());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_deleted_penalty_excluded_but_retrievable() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(0)).await;
    let unit = common::occupied_housing(&db, society_id, dec!(1000)).await;

    let repo = PenaltyRepository::new(db.clone());
    let penalty = repo
        .create(
            society_id,
            CreatePenaltyInput {
                unit,
                amount: dec!(500),
                reason: "Parking violation".to_string(),
                action_by: admin,
            },
        )
        .await
        .unwrap();

    repo.mark_deleted(society_id, penalty.id.into_inner(), admin)
        .await
        .unwrap();

    assert!(repo.list(society_id, false).await.unwrap().is_empty());
    assert_eq!(repo.list(society_id, true).await.unwrap().len(), 1);
    let found = repo
        .find(society_id, penalty.id.into_inner())
        .await
        .unwrap()
        .expect("deleted penalty is still retrievable");
    assert!(found.deletion.is_deleted());

    let err = repo
        .mark_paid(society_id, penalty.id.into_inner())
        .await
        .unwrap_err();
    assert!(matches!(err, PenaltyRepoError::Rule(_)));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_dashboard_final_balance() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(100000)).await;
    let unit = common::occupied_flat(&db, society_id, dec!(10000)).await;

    DuesRepository::new(db.clone())
        .generate_for_month(Some(society_id), MonthYear::new(2024, 2).unwrap())
        .await
        .unwrap();
    let expense =
        LedgerEntryDraft::new(LedgerKind::Expense, "security", None, dec!(20000), 2, 2024)
            .unwrap();
    LedgerRepository::new(db.clone())
        .create(society_id, expense, admin)
        .await
        .unwrap();

    let penalties = PenaltyRepository::new(db.clone());
    penalties
        .create(
            society_id,
            CreatePenaltyInput {
                unit,
                amount: dec!(1500),
                reason: "Late payment".to_string(),
                action_by: admin,
            },
        )
        .await
        .unwrap();
    let deleted = penalties
        .create(
            society_id,
            CreatePenaltyInput {
                unit,
                amount: dec!(700),
                reason: "Issued in error".to_string(),
                action_by: admin,
            },
        )
        .await
        .unwrap();
    penalties
        .mark_deleted(society_id, deleted.id.into_inner(), admin)
        .await
        .unwrap();

    let figures = DashboardRepository::new(db.clone())
        .figures(society_id)
        .await
        .unwrap();
    assert_eq!(figures.balance.final_balance(), dec!(91500));
    assert_eq!(figures.unpaid_dues, 1);
    assert_eq!(figures.outstanding_penalties, dec!(1500));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_generation_changes_dashboard_fingerprint() {
    let db = common::connect().await;
    let admin = common::create_user(&db).await;
    let society_id = common::create_society(&db, admin, dec!(100000)).await;
    common::occupied_flat(&db, society_id, dec!(10000)).await;

    let dashboard = DashboardRepository::new(db.clone());
    let before = dashboard.fingerprint(society_id).await.unwrap();
    assert_eq!(before.dues, 0);

    // Same path the cron binary takes, with no cache in reach.
    DuesRepository::new(db.clone())
        .generate_for_month(Some(society_id), MonthYear::new(2024, 3).unwrap())
        .await
        .unwrap();

    let after = dashboard.fingerprint(society_id).await.unwrap();
    assert_eq!(after.dues, 1);
    assert_ne!(before, after);
}
