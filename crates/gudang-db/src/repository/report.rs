//! # Report Repository
//!
//! Read-side queries behind the dashboard, profit-and-loss and stock
//! reports. No mutation happens here; the derived math (margins, month
//! buckets, classifications) lives in [`gudang_core::reports`] and is fed
//! from bounded queries.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::transaction::TransactionRepository;
use gudang_core::reports::{
    self, DashboardSummary, ProfitLossReport, StockReport, DASHBOARD_MONTHS,
};
use gudang_core::{Product, TransactionKind};

/// How many transactions the dashboard's recent list shows.
const RECENT_TRANSACTIONS: u32 = 10;

/// Repository for report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// (count, Σ total_amount) of transactions of one kind, optionally
    /// windowed on creation time (inclusive on both ends).
    async fn aggregate(
        &self,
        kind: TransactionKind,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> DbResult<(i64, i64)> {
        #[derive(sqlx::FromRow)]
        struct Agg {
            count: i64,
            total: i64,
        }

        let agg: Agg = sqlx::query_as(
            "SELECT COUNT(*) AS count, COALESCE(SUM(total_amount), 0) AS total \
             FROM transactions \
             WHERE kind = ?1 \
               AND (?2 IS NULL OR created_at >= ?2) \
               AND (?3 IS NULL OR created_at <= ?3)",
        )
        .bind(kind)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok((agg.count, agg.total))
    }

    /// Builds the dashboard summary.
    pub async fn dashboard(&self) -> DbResult<DashboardSummary> {
        debug!("Building dashboard summary");

        let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let low_stock_products: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock <= min_stock")
                .fetch_one(&self.pool)
                .await?;

        let (total_sales, total_revenue) =
            self.aggregate(TransactionKind::Sale, None, None).await?;
        let (total_purchases, total_expenses) =
            self.aggregate(TransactionKind::Purchase, None, None).await?;

        let (recent_transactions, _) = TransactionRepository::new(self.pool.clone())
            .list("", 1, RECENT_TRANSACTIONS)
            .await?;

        let now = Utc::now();
        // A generous cutoff; exact month membership is decided by the
        // bucketing, which drops anything outside the window.
        let cutoff = now - Duration::days(DASHBOARD_MONTHS as i64 * 31);
        let rows: Vec<(DateTime<Utc>, i64)> = sqlx::query_as(
            "SELECT created_at, total_amount FROM transactions \
             WHERE kind = ?1 AND created_at >= ?2",
        )
        .bind(TransactionKind::Sale)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        let monthly_sales = reports::bucket_monthly_sales(now, &rows);

        Ok(DashboardSummary {
            total_products,
            low_stock_products,
            total_sales,
            total_purchases,
            total_revenue,
            total_expenses,
            recent_transactions,
            monthly_sales,
        })
    }

    /// Profit-and-loss over an optional inclusive window.
    pub async fn profit_loss(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> DbResult<ProfitLossReport> {
        debug!(?start, ?end, "Building profit-loss report");

        let (sales_count, revenue) = self.aggregate(TransactionKind::Sale, start, end).await?;
        let (purchase_count, cost) = self
            .aggregate(TransactionKind::Purchase, start, end)
            .await?;

        Ok(reports::build_profit_loss(
            revenue,
            cost,
            sales_count,
            purchase_count,
        ))
    }

    /// Stock valuation report over the whole catalog, most depleted
    /// products first.
    pub async fn stock_report(&self) -> DbResult<StockReport> {
        debug!("Building stock report");

        let products: Vec<Product> = sqlx::query_as(
            "SELECT id, sku, name, description, image, buy_price, sell_price, \
                    stock, min_stock, unit, category_id, created_by, created_at, updated_at \
             FROM products ORDER BY stock ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reports::build_stock_report(products))
    }
}
