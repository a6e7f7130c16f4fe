//! # Transaction Repository
//!
//! Posting and read operations for sale/purchase transactions.
//!
//! ## Posting Atomicity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    post() — one SQLite transaction                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    1. fetch every referenced product                                    │
//! │    2. gudang_core::posting::build_plan()                                │
//! │       └── rejects missing products / oversells BEFORE any write         │
//! │    3. INSERT transaction row                                            │
//! │    4. INSERT transaction_items rows                                     │
//! │    5. UPDATE products stock by delta (guarded: stock + δ >= 0)          │
//! │    6. INSERT debt row (when the plan carries one)                       │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure between BEGIN and COMMIT rolls the whole thing back:       │
//! │  stock is never left partially mutated.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guarded delta update is belt on top of the plan's validation: if a
//! concurrent posting drained the stock between our read and our write,
//! the UPDATE matches no row and the posting fails with the same
//! insufficient-stock error instead of committing a negative stock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult, StoreError, StoreResult};
use gudang_core::posting::{build_plan, PostingRequest};
use gudang_core::{
    CoreError, Debt, DebtStatus, Product, Transaction, TransactionDetail, TransactionItemDetail,
    TrackingStatus, TransactionKind,
};

const TRANSACTION_COLUMNS: &str = "t.id, t.kind, t.total_amount, t.notes, t.tracking_number, \
     t.courier_code, t.tracking_status, t.tracking_data, t.last_tracked_at, \
     t.created_by, t.created_at";

/// A transaction row joined with its creator's name.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    #[sqlx(flatten)]
    transaction: Transaction,
    created_by_name: String,
}

/// The tracking-relevant slice of a purchase transaction.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrackingSnapshot {
    pub id: String,
    pub tracking_number: Option<String>,
    pub courier_code: Option<String>,
    pub tracking_status: Option<TrackingStatus>,
    pub tracking_data: Option<String>,
    pub last_tracked_at: Option<DateTime<Utc>>,
}

/// One entry in the batch-refresh work list: a purchase with a tracking
/// number that has not reached a terminal status.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActiveTracking {
    pub id: String,
    pub tracking_number: String,
    pub courier_code: String,
}

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Posts a transaction: validates, persists the transaction and its
    /// items, adjusts stock, and optionally opens a linked debt — as a
    /// single atomic unit.
    ///
    /// ## Arguments
    /// * `created_by` - resolved caller identity, for attribution
    /// * `request` - the posting request (see [`gudang_core::posting`])
    ///
    /// ## Returns
    /// The persisted transaction with items and creator name.
    pub async fn post(
        &self,
        created_by: &str,
        request: &PostingRequest,
    ) -> StoreResult<TransactionDetail> {
        debug!(kind = ?request.kind, items = request.items.len(), "Posting transaction");

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Fetch the current state of every referenced product inside the
        // transaction, so the plan validates against what we will mutate.
        let mut products: HashMap<String, Product> = HashMap::new();
        for item in &request.items {
            if products.contains_key(&item.product_id) {
                continue;
            }
            let product: Option<Product> = sqlx::query_as(
                "SELECT id, sku, name, description, image, buy_price, sell_price, \
                        stock, min_stock, unit, category_id, created_by, created_at, updated_at \
                 FROM products WHERE id = ?1",
            )
            .bind(&item.product_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from)?;

            if let Some(product) = product {
                products.insert(product.id.clone(), product);
            }
            // Missing products are reported by build_plan with the id in
            // the message; no need to fail here.
        }

        let plan = build_plan(request, &products)?;

        let transaction_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let (tracking_number, courier_code, tracking_status) = match &request.shipping {
            Some(shipping) => (
                Some(shipping.tracking_number.clone()),
                Some(shipping.courier_code.clone()),
                Some(TrackingStatus::Pending),
            ),
            None => (None, None, None),
        };

        sqlx::query(
            "INSERT INTO transactions ( \
                 id, kind, total_amount, notes, tracking_number, courier_code, \
                 tracking_status, tracking_data, last_tracked_at, created_by, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, NULL, ?8, ?9)",
        )
        .bind(&transaction_id)
        .bind(plan.kind)
        .bind(plan.total_amount)
        .bind(&request.notes)
        .bind(&tracking_number)
        .bind(&courier_code)
        .bind(tracking_status)
        .bind(created_by)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        for item in &plan.items {
            sqlx::query(
                "INSERT INTO transaction_items (id, transaction_id, product_id, quantity, price, subtotal) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&transaction_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.subtotal)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }

        for delta in &plan.deltas {
            // Delta form keeps concurrent postings honest: the row only
            // matches while the adjustment cannot drive stock negative.
            let result = sqlx::query(
                "UPDATE products SET stock = stock + ?2, updated_at = ?3 \
                 WHERE id = ?1 AND stock + ?2 >= 0",
            )
            .bind(&delta.product_id)
            .bind(delta.delta)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            if result.rows_affected() == 0 {
                let (name, available) = products
                    .get(&delta.product_id)
                    .map(|p| (p.name.clone(), p.stock))
                    .unwrap_or_else(|| (delta.product_id.clone(), 0));
                return Err(StoreError::Core(CoreError::InsufficientStock {
                    name,
                    available,
                    requested: -delta.delta,
                }));
            }
        }

        if let Some(debt) = &plan.debt {
            sqlx::query(
                "INSERT INTO debts ( \
                     id, kind, contact_name, contact_phone, amount, paid_amount, \
                     due_date, status, transaction_id, notes, created_at, updated_at \
                 ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8, NULL, ?9, ?9)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(debt.kind)
            .bind(&debt.contact_name)
            .bind(&debt.contact_phone)
            .bind(plan.total_amount)
            .bind(debt.due_date)
            .bind(DebtStatus::Pending)
            .bind(&transaction_id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            id = %transaction_id,
            kind = ?plan.kind,
            total = plan.total_amount,
            items = plan.items.len(),
            debt = plan.debt.is_some(),
            "Transaction posted"
        );

        let detail = self
            .get(&transaction_id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", &transaction_id))?;

        Ok(detail)
    }

    /// Gets one transaction with items, creator name and linked debt.
    pub async fn get(&self, id: &str) -> DbResult<Option<TransactionDetail>> {
        let row: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS}, u.name AS created_by_name \
             FROM transactions t JOIN users u ON u.id = t.created_by \
             WHERE t.id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Lists transactions newest first, optionally filtered by kind.
    ///
    /// ## Arguments
    /// * `kind` - `""` for all, or `"SALE"` / `"PURCHASE"`
    /// * `page` - 1-based page number
    /// * `limit` - page size
    pub async fn list(
        &self,
        kind: &str,
        page: u32,
        limit: u32,
    ) -> DbResult<(Vec<TransactionDetail>, i64)> {
        let offset = (page.max(1) - 1) as i64 * limit as i64;

        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS}, u.name AS created_by_name \
             FROM transactions t JOIN users u ON u.id = t.created_by \
             WHERE (?1 = '' OR t.kind = ?1) \
             ORDER BY t.created_at DESC LIMIT ?2 OFFSET ?3"
        ))
        .bind(kind)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE (?1 = '' OR kind = ?1)")
                .bind(kind)
                .fetch_one(&self.pool)
                .await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            details.push(self.hydrate(row).await?);
        }

        Ok((details, total))
    }

    /// Transactions created at or after `cutoff`, newest first. Feeds the
    /// notifications feed.
    pub async fn recent_since(
        &self,
        cutoff: DateTime<Utc>,
        limit: u32,
    ) -> DbResult<Vec<TransactionDetail>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS}, u.name AS created_by_name \
             FROM transactions t JOIN users u ON u.id = t.created_by \
             WHERE t.created_at >= ?1 \
             ORDER BY t.created_at DESC LIMIT ?2"
        ))
        .bind(cutoff)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            details.push(self.hydrate(row).await?);
        }

        Ok(details)
    }

    /// Attaches items and the linked debt to a fetched row.
    async fn hydrate(&self, row: TransactionRow) -> DbResult<TransactionDetail> {
        let items: Vec<TransactionItemDetail> = sqlx::query_as(
            "SELECT ti.id, ti.transaction_id, ti.product_id, \
                    p.name AS product_name, p.sku AS product_sku, \
                    ti.quantity, ti.price, ti.subtotal \
             FROM transaction_items ti JOIN products p ON p.id = ti.product_id \
             WHERE ti.transaction_id = ?1 ORDER BY ti.rowid",
        )
        .bind(&row.transaction.id)
        .fetch_all(&self.pool)
        .await?;

        let debt: Option<Debt> = sqlx::query_as(
            "SELECT id, kind, contact_name, contact_phone, amount, paid_amount, \
                    due_date, status, transaction_id, notes, created_at, updated_at \
             FROM debts WHERE transaction_id = ?1",
        )
        .bind(&row.transaction.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(TransactionDetail {
            transaction: row.transaction,
            items,
            created_by_name: row.created_by_name,
            debt,
        })
    }

    // =========================================================================
    // Tracking support
    // =========================================================================

    /// The stored tracking snapshot for one transaction.
    pub async fn tracking_snapshot(&self, id: &str) -> DbResult<Option<TrackingSnapshot>> {
        let snapshot = sqlx::query_as(
            "SELECT id, tracking_number, courier_code, tracking_status, \
                    tracking_data, last_tracked_at \
             FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(snapshot)
    }

    /// Persists a refreshed tracking status with the raw provider payload.
    pub async fn set_tracking(
        &self,
        id: &str,
        status: TrackingStatus,
        raw_payload: &str,
        tracked_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(id = %id, status = ?status, "Updating tracking status");

        let result = sqlx::query(
            "UPDATE transactions SET tracking_status = ?2, tracking_data = ?3, \
                    last_tracked_at = ?4 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(status)
        .bind(raw_payload)
        .bind(tracked_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        Ok(())
    }

    /// Purchases with a tracking number whose status is not terminal —
    /// the batch refresh work list, oldest first.
    pub async fn active_trackings(&self) -> DbResult<Vec<ActiveTracking>> {
        let list = sqlx::query_as(
            "SELECT id, tracking_number, courier_code FROM transactions \
             WHERE kind = ?1 \
               AND tracking_number IS NOT NULL \
               AND courier_code IS NOT NULL \
               AND (tracking_status IS NULL \
                    OR tracking_status NOT IN ('delivered', 'returned', 'failed')) \
             ORDER BY created_at ASC",
        )
        .bind(TransactionKind::Purchase)
        .fetch_all(&self.pool)
        .await?;

        Ok(list)
    }
}
