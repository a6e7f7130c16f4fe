//! # Debt Repository
//!
//! The debt ledger: receivables and payables, manual entries and the
//! payment processor.
//!
//! ## Payment Rule
//! `record_payment` is the only mutation of `paid_amount`. The status
//! column is always recomputed through
//! [`gudang_core::DebtStatus::for_amounts`], so paid_amount and status
//! can never disagree. Payments that would overshoot the total owed are
//! rejected with the remaining balance in the message.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult, StoreError, StoreResult};
use gudang_core::{CoreError, Debt, DebtKind, DebtStatus};

const DEBT_COLUMNS: &str = "id, kind, contact_name, contact_phone, amount, paid_amount, \
     due_date, status, transaction_id, notes, created_at, updated_at";

/// Fields for a manually entered debt (no transaction involved).
#[derive(Debug, Clone)]
pub struct NewDebt {
    pub kind: DebtKind,
    pub contact_name: String,
    pub contact_phone: Option<String>,
    pub amount: i64,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Repository for debt database operations.
#[derive(Debug, Clone)]
pub struct DebtRepository {
    pool: SqlitePool,
}

impl DebtRepository {
    /// Creates a new DebtRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DebtRepository { pool }
    }

    /// Lists debts newest first, optionally filtered by kind
    /// (`""` for all, or `"RECEIVABLE"` / `"PAYABLE"`).
    pub async fn list(&self, kind: &str) -> DbResult<Vec<Debt>> {
        let debts = sqlx::query_as(&format!(
            "SELECT {DEBT_COLUMNS} FROM debts \
             WHERE (?1 = '' OR kind = ?1) ORDER BY created_at DESC"
        ))
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(debts)
    }

    /// Gets a debt by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Debt>> {
        let debt = sqlx::query_as(&format!("SELECT {DEBT_COLUMNS} FROM debts WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(debt)
    }

    /// Inserts a manually entered debt, independent of any transaction.
    pub async fn insert(&self, new: &NewDebt) -> DbResult<Debt> {
        debug!(kind = ?new.kind, contact = %new.contact_name, "Inserting debt");

        let now = Utc::now();
        let debt = Debt {
            id: Uuid::new_v4().to_string(),
            kind: new.kind,
            contact_name: new.contact_name.clone(),
            contact_phone: new.contact_phone.clone(),
            amount: new.amount,
            paid_amount: 0,
            due_date: new.due_date,
            status: DebtStatus::Pending,
            transaction_id: None,
            notes: new.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO debts ( \
                 id, kind, contact_name, contact_phone, amount, paid_amount, \
                 due_date, status, transaction_id, notes, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(&debt.id)
        .bind(debt.kind)
        .bind(&debt.contact_name)
        .bind(&debt.contact_phone)
        .bind(debt.amount)
        .bind(debt.paid_amount)
        .bind(debt.due_date)
        .bind(debt.status)
        .bind(&debt.transaction_id)
        .bind(&debt.notes)
        .bind(debt.created_at)
        .bind(debt.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(debt)
    }

    /// Records a payment against a debt.
    ///
    /// ## Rules
    /// - `amount` must be positive
    /// - the payment must not push `paid_amount` past `amount`
    /// - status is recomputed from the new amounts
    ///
    /// ## Returns
    /// The debt as stored after the payment.
    pub async fn record_payment(&self, id: &str, amount: i64) -> StoreResult<Debt> {
        if amount <= 0 {
            return Err(StoreError::Core(CoreError::InvalidPaymentAmount {
                reason: "payment must be positive".to_string(),
            }));
        }

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let debt: Option<Debt> =
            sqlx::query_as(&format!("SELECT {DEBT_COLUMNS} FROM debts WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(DbError::from)?;

        let debt = debt.ok_or_else(|| StoreError::Core(CoreError::DebtNotFound(id.to_string())))?;

        let remaining = debt.remaining();
        if amount > remaining {
            return Err(StoreError::Core(CoreError::InvalidPaymentAmount {
                reason: format!("payment exceeds remaining balance ({remaining})"),
            }));
        }

        let new_paid = debt.paid_amount + amount;
        let new_status = DebtStatus::for_amounts(new_paid, debt.amount);
        let now = Utc::now();

        sqlx::query(
            "UPDATE debts SET paid_amount = ?2, status = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(new_paid)
        .bind(new_status)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        info!(id = %id, amount, paid = new_paid, status = ?new_status, "Payment recorded");

        Ok(Debt {
            paid_amount: new_paid,
            status: new_status,
            updated_at: now,
            ..debt
        })
    }

    /// Unpaid debts whose due date has passed: the notifications feed's
    /// overdue list. OVERDUE stays a derived view; nothing is written.
    pub async fn overdue(&self, now: DateTime<Utc>, limit: u32) -> DbResult<Vec<Debt>> {
        let debts = sqlx::query_as(&format!(
            "SELECT {DEBT_COLUMNS} FROM debts \
             WHERE status IN ('PENDING', 'PARTIAL') AND due_date IS NOT NULL AND due_date < ?1 \
             ORDER BY due_date ASC LIMIT ?2"
        ))
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(debts)
    }
}
