//! Reporting aggregator integration tests: dashboard, profit-and-loss
//! and the stock report, fed through real postings.

mod common;

use common::{request, seed_product, seed_user, test_db};
use gudang_core::reports::StockStatus;
use gudang_core::TransactionKind;

#[tokio::test]
async fn dashboard_counts_and_sums() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let a = seed_product(&db, &user, "Produk A", 10, 3, 500, 1_000).await;
    let b = seed_product(&db, &user, "Produk B", 2, 3, 500, 1_000).await;

    db.transactions()
        .post(&user, &request(TransactionKind::Sale, vec![(&a.id, 4, 1_000)]))
        .await
        .unwrap();
    db.transactions()
        .post(&user, &request(TransactionKind::Purchase, vec![(&b.id, 10, 500)]))
        .await
        .unwrap();

    let dashboard = db.reports().dashboard().await.unwrap();

    assert_eq!(dashboard.total_products, 2);
    // Product B sits at 12 after the purchase, A at 6; B started low but
    // was restocked, so nothing is at or below min_stock anymore.
    assert_eq!(dashboard.low_stock_products, 0);
    assert_eq!(dashboard.total_sales, 1);
    assert_eq!(dashboard.total_purchases, 1);
    assert_eq!(dashboard.total_revenue, 4_000);
    assert_eq!(dashboard.total_expenses, 5_000);
    assert_eq!(dashboard.recent_transactions.len(), 2);
    // Newest first.
    assert_eq!(
        dashboard.recent_transactions[0].transaction.kind,
        TransactionKind::Purchase
    );

    // Six zero-filled buckets with this month's sales in the last one.
    assert_eq!(dashboard.monthly_sales.len(), 6);
    assert_eq!(dashboard.monthly_sales[5].total, 4_000);
    assert_eq!(
        dashboard.monthly_sales.iter().map(|m| m.total).sum::<i64>(),
        4_000
    );
}

#[tokio::test]
async fn profit_loss_all_time() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 50, 3, 500, 1_000).await;

    db.transactions()
        .post(&user, &request(TransactionKind::Sale, vec![(&product.id, 10, 1_000)]))
        .await
        .unwrap();
    db.transactions()
        .post(&user, &request(TransactionKind::Purchase, vec![(&product.id, 8, 500)]))
        .await
        .unwrap();

    let report = db.reports().profit_loss(None, None).await.unwrap();

    assert_eq!(report.total_revenue, 10_000);
    assert_eq!(report.total_cost, 4_000);
    assert_eq!(report.profit, 6_000);
    assert_eq!(report.profit_margin, 60.0);
    assert_eq!(report.total_sales_count, 1);
    assert_eq!(report.total_purchase_count, 1);
}

#[tokio::test]
async fn profit_loss_empty_window_reports_zero_margin() {
    let db = test_db().await;

    let report = db.reports().profit_loss(None, None).await.unwrap();

    assert_eq!(report.total_revenue, 0);
    assert_eq!(report.profit, 0);
    // No division by zero.
    assert_eq!(report.profit_margin, 0.0);
}

#[tokio::test]
async fn profit_loss_window_excludes_outside_rows() {
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 50, 3, 500, 1_000).await;

    db.transactions()
        .post(&user, &request(TransactionKind::Sale, vec![(&product.id, 10, 1_000)]))
        .await
        .unwrap();

    // A window entirely in the past sees nothing.
    let past_end = chrono::Utc::now() - chrono::Duration::days(30);
    let past_start = past_end - chrono::Duration::days(30);
    let report = db
        .reports()
        .profit_loss(Some(past_start), Some(past_end))
        .await
        .unwrap();
    assert_eq!(report.total_revenue, 0);

    // A window around now sees the sale.
    let start = chrono::Utc::now() - chrono::Duration::days(1);
    let end = chrono::Utc::now() + chrono::Duration::days(1);
    let report = db.reports().profit_loss(Some(start), Some(end)).await.unwrap();
    assert_eq!(report.total_revenue, 10_000);
}

#[tokio::test]
async fn stock_report_valuation_and_classification() {
    let db = test_db().await;
    let user = seed_user(&db).await;

    // ok: 10 × 1_000 buy
    seed_product(&db, &user, "Aman", 10, 3, 1_000, 2_000).await;
    // low: 2 × 500
    seed_product(&db, &user, "Menipis", 2, 3, 500, 900).await;
    // out: 0 × 700
    seed_product(&db, &user, "Habis", 0, 3, 700, 1_200).await;

    let report = db.reports().stock_report().await.unwrap();

    assert_eq!(report.total_products, 3);
    assert_eq!(report.total_value, 10 * 1_000 + 2 * 500);
    assert_eq!(report.low_stock_count, 2);
    assert_eq!(report.out_of_stock_count, 1);

    // Ordered most depleted first.
    assert_eq!(report.products[0].product.name, "Habis");
    assert_eq!(report.products[0].status, StockStatus::Out);
    assert_eq!(report.products[0].stock_value, 0);

    let ok_line = report
        .products
        .iter()
        .find(|l| l.product.name == "Aman")
        .unwrap();
    assert_eq!(ok_line.status, StockStatus::Ok);
    assert_eq!(ok_line.stock_value, 10_000);
}

#[tokio::test]
async fn scenario_sale_then_stock_ok() {
    // Product (stock=10, min_stock=3, sell=1000): sell 4 at 1000 →
    // stock 6, total 4000, stock report says "ok".
    let db = test_db().await;
    let user = seed_user(&db).await;
    let product = seed_product(&db, &user, "Produk A", 10, 3, 500, 1_000).await;

    let posted = db
        .transactions()
        .post(&user, &request(TransactionKind::Sale, vec![(&product.id, 4, 1_000)]))
        .await
        .unwrap();
    assert_eq!(posted.transaction.total_amount, 4_000);

    let report = db.reports().stock_report().await.unwrap();
    let line = report
        .products
        .iter()
        .find(|l| l.product.id == product.id)
        .unwrap();
    assert_eq!(line.product.stock, 6);
    assert_eq!(line.status, StockStatus::Ok);
}
