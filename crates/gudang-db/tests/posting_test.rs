//! Transaction posting integration tests.
//!
//! Covers the posting engine's guarantees end to end against a real
//! (in-memory) SQLite database: stock adjustment, total computation,
//! all-or-nothing failure, debt spawning and shipping rules.

mod common;

use common::{request, seed_product, seed_user, test_db};
use gudang_core::posting::{DebtRequest, ItemRequest, PostingRequest, ShippingInfo};
use gudang_core::{CoreError, DebtKind, DebtStatus, TrackingStatus, TransactionKind};
use gudang_db::StoreError;

#[tokio::test]
async fn sale_decrements_stock_and_computes_total() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 10, 3, 500, 1_000).await;

    let posted = db
        .transactions()
        .post(&user, &request(TransactionKind::Sale, vec![(&product.id, 4, 1_000)]))
        .await
        .unwrap();

    assert_eq!(posted.transaction.kind, TransactionKind::Sale);
    assert_eq!(posted.transaction.total_amount, 4_000);
    assert_eq!(posted.items.len(), 1);
    assert_eq!(posted.items[0].subtotal, 4_000);
    assert_eq!(posted.items[0].product_name, "Produk A");
    assert_eq!(posted.created_by_name, "Administrator");
    assert!(posted.debt.is_none());

    let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(after.stock, 6);
}

#[tokio::test]
async fn purchase_increments_stock() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 10, 3, 500, 1_000).await;

    let posted = db
        .transactions()
        .post(&user, &request(TransactionKind::Purchase, vec![(&product.id, 25, 500)]))
        .await
        .unwrap();

    assert_eq!(posted.transaction.total_amount, 12_500);

    let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(after.stock, 35);
}

#[tokio::test]
async fn oversell_rejected_and_nothing_mutated() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 10, 3, 500, 1_000).await;

    let err = db
        .transactions()
        .post(&user, &request(TransactionKind::Sale, vec![(&product.id, 12, 1_000)]))
        .await
        .unwrap_err();

    match err {
        StoreError::Core(CoreError::InsufficientStock { name, available, requested }) => {
            assert_eq!(name, "Produk A");
            assert_eq!(available, 10);
            assert_eq!(requested, 12);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Stock untouched, no transaction rows written.
    let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(after.stock, 10);
    let (listed, total) = db.transactions().list("", 1, 20).await.unwrap();
    assert!(listed.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn multi_item_failure_rolls_back_every_product() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let plenty = seed_product(&db, &user, "Produk A", 100, 3, 500, 1_000).await;
    let scarce = seed_product(&db, &user, "Produk B", 2, 3, 500, 1_000).await;

    let err = db
        .transactions()
        .post(
            &user,
            &request(
                TransactionKind::Sale,
                vec![(&plenty.id, 5, 1_000), (&scarce.id, 3, 1_000)],
            ),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Core(CoreError::InsufficientStock { .. })
    ));

    // The first product must not have been decremented on the way to the
    // failure.
    let a = db.products().get_by_id(&plenty.id).await.unwrap().unwrap();
    let b = db.products().get_by_id(&scarce.id).await.unwrap().unwrap();
    assert_eq!(a.stock, 100);
    assert_eq!(b.stock, 2);
}

#[tokio::test]
async fn missing_product_rejected() {
    let db = test_db().await;
    let user = seed_user(&db).await;

    let err = db
        .transactions()
        .post(&user, &request(TransactionKind::Sale, vec![("ghost", 1, 100)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Core(CoreError::ProductNotFound(id)) if id == "ghost"
    ));
}

#[tokio::test]
async fn sale_on_credit_spawns_receivable_for_grand_total() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 10, 3, 500, 1_000).await;

    let mut req = request(TransactionKind::Sale, vec![(&product.id, 3, 1_000)]);
    req.debt = Some(DebtRequest {
        contact_name: "Budi Santoso".to_string(),
        contact_phone: Some("08123456789".to_string()),
        due_date: None,
    });

    let posted = db.transactions().post(&user, &req).await.unwrap();

    let debt = posted.debt.expect("debt should be spawned");
    assert_eq!(debt.kind, DebtKind::Receivable);
    assert_eq!(debt.amount, 3_000);
    assert_eq!(debt.paid_amount, 0);
    assert_eq!(debt.status, DebtStatus::Pending);
    assert_eq!(debt.transaction_id.as_deref(), Some(posted.transaction.id.as_str()));
}

#[tokio::test]
async fn purchase_on_credit_spawns_payable() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 10, 3, 500, 1_000).await;

    let mut req = request(TransactionKind::Purchase, vec![(&product.id, 10, 500)]);
    req.debt = Some(DebtRequest {
        contact_name: "PT Sumber Makmur".to_string(),
        contact_phone: None,
        due_date: None,
    });

    let posted = db.transactions().post(&user, &req).await.unwrap();
    let debt = posted.debt.expect("debt should be spawned");
    assert_eq!(debt.kind, DebtKind::Payable);
    assert_eq!(debt.amount, 5_000);
}

#[tokio::test]
async fn purchase_with_shipping_starts_pending() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 10, 3, 500, 1_000).await;

    let mut req = request(TransactionKind::Purchase, vec![(&product.id, 5, 500)]);
    req.shipping = Some(ShippingInfo {
        tracking_number: "JX1234567890".to_string(),
        courier_code: "jne".to_string(),
    });

    let posted = db.transactions().post(&user, &req).await.unwrap();
    assert_eq!(posted.transaction.tracking_number.as_deref(), Some("JX1234567890"));
    assert_eq!(posted.transaction.courier_code.as_deref(), Some("jne"));
    assert_eq!(posted.transaction.tracking_status, Some(TrackingStatus::Pending));
    assert!(posted.transaction.last_tracked_at.is_none());
}

#[tokio::test]
async fn shipping_on_sale_rejected() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 10, 3, 500, 1_000).await;

    let req = PostingRequest {
        kind: TransactionKind::Sale,
        items: vec![ItemRequest {
            product_id: product.id.clone(),
            quantity: 1,
            price: 1_000,
        }],
        notes: None,
        debt: None,
        shipping: Some(ShippingInfo {
            tracking_number: "JX1234567890".to_string(),
            courier_code: "jne".to_string(),
        }),
    };

    let err = db.transactions().post(&user, &req).await.unwrap_err();
    assert!(matches!(err, StoreError::Core(CoreError::ShippingNotAllowed)));
}

#[tokio::test]
async fn list_filters_by_kind_and_pages() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 100, 3, 500, 1_000).await;

    for _ in 0..3 {
        db.transactions()
            .post(&user, &request(TransactionKind::Sale, vec![(&product.id, 1, 1_000)]))
            .await
            .unwrap();
    }
    db.transactions()
        .post(&user, &request(TransactionKind::Purchase, vec![(&product.id, 1, 500)]))
        .await
        .unwrap();

    let (sales, sales_total) = db.transactions().list("SALE", 1, 2).await.unwrap();
    assert_eq!(sales.len(), 2);
    assert_eq!(sales_total, 3);

    let (all, all_total) = db.transactions().list("", 1, 10).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all_total, 4);
}

#[tokio::test]
async fn referenced_product_cannot_be_deleted() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 10, 3, 500, 1_000).await;

    db.transactions()
        .post(&user, &request(TransactionKind::Sale, vec![(&product.id, 1, 1_000)]))
        .await
        .unwrap();

    let err = db.products().delete(&product.id).await.unwrap_err();
    assert!(matches!(err, gudang_db::DbError::ForeignKeyViolation { .. }));

    // Still present.
    assert!(db.products().get_by_id(&product.id).await.unwrap().is_some());
}
