//! Debt ledger integration tests: manual entries, payment monotonicity
//! and the overshoot rejection.

mod common;

use chrono::{Duration, Utc};
use common::{seed_user, test_db};
use gudang_core::{CoreError, DebtKind, DebtStatus};
use gudang_db::repository::debt::NewDebt;
use gudang_db::StoreError;

fn manual_debt(amount: i64) -> NewDebt {
    NewDebt {
        kind: DebtKind::Receivable,
        contact_name: "Budi Santoso".to_string(),
        contact_phone: None,
        amount,
        due_date: None,
        notes: None,
    }
}

#[tokio::test]
async fn manual_debt_starts_pending() {
    let db = test_db().await;
    let debt = db.debts().insert(&manual_debt(5_000)).await.unwrap();

    assert_eq!(debt.status, DebtStatus::Pending);
    assert_eq!(debt.paid_amount, 0);
    assert_eq!(debt.remaining(), 5_000);
    assert!(debt.transaction_id.is_none());
}

#[tokio::test]
async fn payments_walk_pending_partial_paid() {
    let db = test_db().await;
    let debt = db.debts().insert(&manual_debt(5_000)).await.unwrap();

    let after_first = db.debts().record_payment(&debt.id, 2_000).await.unwrap();
    assert_eq!(after_first.paid_amount, 2_000);
    assert_eq!(after_first.status, DebtStatus::Partial);

    let after_second = db.debts().record_payment(&debt.id, 3_000).await.unwrap();
    assert_eq!(after_second.paid_amount, 5_000);
    assert_eq!(after_second.status, DebtStatus::Paid);

    // Stored row agrees with the returned value.
    let stored = db.debts().get_by_id(&debt.id).await.unwrap().unwrap();
    assert_eq!(stored.paid_amount, 5_000);
    assert_eq!(stored.status, DebtStatus::Paid);
}

#[tokio::test]
async fn non_positive_payment_rejected() {
    let db = test_db().await;
    let debt = db.debts().insert(&manual_debt(5_000)).await.unwrap();

    for amount in [0, -100] {
        let err = db.debts().record_payment(&debt.id, amount).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InvalidPaymentAmount { .. })
        ));
    }

    let stored = db.debts().get_by_id(&debt.id).await.unwrap().unwrap();
    assert_eq!(stored.paid_amount, 0);
    assert_eq!(stored.status, DebtStatus::Pending);
}

#[tokio::test]
async fn overshoot_payment_rejected() {
    let db = test_db().await;
    let debt = db.debts().insert(&manual_debt(5_000)).await.unwrap();

    db.debts().record_payment(&debt.id, 4_000).await.unwrap();

    // 1_500 would push paid to 5_500 > 5_000.
    let err = db.debts().record_payment(&debt.id, 1_500).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Core(CoreError::InvalidPaymentAmount { .. })
    ));

    // The exact remainder still goes through.
    let settled = db.debts().record_payment(&debt.id, 1_000).await.unwrap();
    assert_eq!(settled.status, DebtStatus::Paid);
}

#[tokio::test]
async fn payment_on_missing_debt_rejected() {
    let db = test_db().await;

    let err = db.debts().record_payment("ghost", 1_000).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Core(CoreError::DebtNotFound(id)) if id == "ghost"
    ));
}

#[tokio::test]
async fn list_filters_by_kind() {
    let db = test_db().await;
    db.debts().insert(&manual_debt(1_000)).await.unwrap();
    db.debts()
        .insert(&NewDebt {
            kind: DebtKind::Payable,
            contact_name: "PT Sumber Makmur".to_string(),
            contact_phone: None,
            amount: 2_000,
            due_date: None,
            notes: None,
        })
        .await
        .unwrap();

    assert_eq!(db.debts().list("RECEIVABLE").await.unwrap().len(), 1);
    assert_eq!(db.debts().list("PAYABLE").await.unwrap().len(), 1);
    assert_eq!(db.debts().list("").await.unwrap().len(), 2);
}

#[tokio::test]
async fn overdue_scan_skips_paid_and_undated() {
    let db = test_db().await;
    let _user = seed_user(&db).await;
    let now = Utc::now();

    let overdue = db
        .debts()
        .insert(&NewDebt {
            due_date: Some(now - Duration::days(3)),
            ..manual_debt(5_000)
        })
        .await
        .unwrap();

    // Due in the future: not overdue.
    db.debts()
        .insert(&NewDebt {
            due_date: Some(now + Duration::days(3)),
            ..manual_debt(5_000)
        })
        .await
        .unwrap();

    // Past due but fully paid: not overdue.
    let settled = db
        .debts()
        .insert(&NewDebt {
            due_date: Some(now - Duration::days(3)),
            ..manual_debt(1_000)
        })
        .await
        .unwrap();
    db.debts().record_payment(&settled.id, 1_000).await.unwrap();

    // No due date: never overdue.
    db.debts().insert(&manual_debt(5_000)).await.unwrap();

    let found = db.debts().overdue(now, 10).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, overdue.id);
}
