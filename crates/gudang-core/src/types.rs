//! # Domain Types
//!
//! Core domain types used throughout Gudang.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  Transaction    │   │      Debt       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  kind SALE/PUR  │   │  kind RECV/PAY  │       │
//! │  │  stock          │   │  total_amount   │   │  amount/paid    │       │
//! │  │  buy/sell price │   │  tracking_*     │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Transaction ──owns──► TransactionItem (created together, immutable)   │
//! │  Transaction ◄─soft─── Debt (optional back-reference)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where applicable: (sku, email, category name)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Transaction Kind
// =============================================================================

/// The kind of a bookkeeping transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Goods sold to a customer; decrements stock.
    Sale,
    /// Goods bought from a supplier; increments stock.
    Purchase,
}

impl TransactionKind {
    /// The debt kind a transaction of this kind spawns: a sale on credit
    /// is money owed to us, a purchase on credit is money we owe.
    pub fn debt_kind(&self) -> DebtKind {
        match self {
            TransactionKind::Sale => DebtKind::Receivable,
            TransactionKind::Purchase => DebtKind::Payable,
        }
    }

    /// Sign applied to line quantities when adjusting stock.
    pub fn stock_sign(&self) -> i64 {
        match self {
            TransactionKind::Sale => -1,
            TransactionKind::Purchase => 1,
        }
    }
}

// =============================================================================
// Debt Kind & Status
// =============================================================================

/// Direction of a debt relative to the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtKind {
    /// Money owed TO the business.
    Receivable,
    /// Money owed BY the business.
    Payable,
}

/// Payment state of a debt.
///
/// OVERDUE is intentionally absent: it is derived from `due_date` at
/// presentation time and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtStatus {
    /// Nothing paid yet.
    Pending,
    /// Partially paid.
    Partial,
    /// Fully paid.
    Paid,
}

impl DebtStatus {
    /// Recomputes the status from the amounts. This is the single source
    /// of truth; the stored column is always derived through here.
    ///
    /// ## Example
    /// ```rust
    /// use gudang_core::types::DebtStatus;
    ///
    /// assert_eq!(DebtStatus::for_amounts(0, 5_000), DebtStatus::Pending);
    /// assert_eq!(DebtStatus::for_amounts(2_000, 5_000), DebtStatus::Partial);
    /// assert_eq!(DebtStatus::for_amounts(5_000, 5_000), DebtStatus::Paid);
    /// ```
    pub fn for_amounts(paid_amount: i64, amount: i64) -> Self {
        if paid_amount >= amount {
            DebtStatus::Paid
        } else if paid_amount > 0 {
            DebtStatus::Partial
        } else {
            DebtStatus::Pending
        }
    }
}

// =============================================================================
// Tracking Status
// =============================================================================

/// Normalized shipment lifecycle stage, mapped from the courier
/// provider's free-text status (see [`crate::tracking`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    /// Tracking number registered, no provider data fetched yet.
    Pending,
    /// Courier has the shipment information.
    InfoReceived,
    /// Courier picked the package up.
    PickedUp,
    /// Package moving between facilities.
    InTransit,
    /// Out with the delivery courier.
    OutForDelivery,
    /// Delivered to the recipient.
    Delivered,
    /// Delivery failed.
    Failed,
    /// Returned to sender.
    Returned,
    /// Provider reported something we cannot classify.
    Unknown,
}

impl TrackingStatus {
    /// Terminal statuses are excluded from the batch refresh sweep.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrackingStatus::Delivered | TrackingStatus::Returned | TrackingStatus::Failed
        )
    }
}

// =============================================================================
// Product & Category
// =============================================================================

/// A sellable/purchasable catalog item with its current stock level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Optional image reference (path or URL).
    pub image: Option<String>,

    /// Purchase price per unit, whole rupiah.
    pub buy_price: i64,

    /// Selling price per unit, whole rupiah.
    pub sell_price: i64,

    /// Current stock level. Never negative.
    pub stock: i64,

    /// Threshold below (or at) which the product counts as low stock.
    pub min_stock: i64,

    /// Unit label ("pcs", "unit", "kg", ...).
    pub unit: String,

    /// Optional category reference.
    pub category_id: Option<String>,

    /// User who created this product (attribution only).
    pub created_by: String,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A product grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    /// Unique name.
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Transaction
// =============================================================================

/// A posted sale or purchase. Immutable once created; only the
/// `tracking_*` columns are updated afterwards, by the tracking
/// synchronizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    /// Sum of the items' subtotals, fixed at posting time.
    pub total_amount: i64,
    pub notes: Option<String>,
    /// Courier tracking number (purchases only).
    pub tracking_number: Option<String>,
    /// Courier code understood by the tracking provider (purchases only).
    pub courier_code: Option<String>,
    /// Last mapped shipment status.
    pub tracking_status: Option<TrackingStatus>,
    /// Raw provider payload from the last refresh, as JSON text.
    pub tracking_data: Option<String>,
    /// When the tracking status was last refreshed.
    pub last_tracked_at: Option<DateTime<Utc>>,
    /// User who posted the transaction.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// A line item belonging to exactly one transaction.
///
/// `subtotal` is always recomputed as `quantity × price` at posting time,
/// never trusted from caller input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    /// Units moved. Always ≥ 1.
    pub quantity: i64,
    /// Unit price captured at transaction time, whole rupiah.
    pub price: i64,
    /// quantity × price.
    pub subtotal: i64,
}

/// A line item joined with the product's display fields, for read-side
/// responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionItemDetail {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_sku: String,
    pub quantity: i64,
    pub price: i64,
    pub subtotal: i64,
}

/// A transaction with its items, creator name and optionally the debt it
/// spawned. This is the shape every read path returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetail {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub items: Vec<TransactionItemDetail>,
    pub created_by_name: String,
    pub debt: Option<Debt>,
}

// =============================================================================
// Debt
// =============================================================================

/// Money owed to or by the business. May be spawned by posting a
/// transaction on credit, or entered manually, independent of any
/// transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Debt {
    pub id: String,
    pub kind: DebtKind,
    pub contact_name: String,
    pub contact_phone: Option<String>,
    /// Total owed, fixed at creation.
    pub amount: i64,
    /// Cumulative payments. Starts at 0, never exceeds `amount`.
    pub paid_amount: i64,
    pub due_date: Option<DateTime<Utc>>,
    pub status: DebtStatus,
    /// The transaction this debt was spawned by, if any.
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debt {
    /// Outstanding balance.
    #[inline]
    pub fn remaining(&self) -> i64 {
        self.amount - self.paid_amount
    }

    /// Presentation-time overdue check; never stored.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != DebtStatus::Paid
            && self.due_date.map(|due| due < now).unwrap_or(false)
    }
}

// =============================================================================
// User
// =============================================================================

/// An authenticated operator. Owns created products and transactions
/// (attribution only; no business rule depends on role beyond being
/// authenticated).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub name: String,
    /// Unique login identifier.
    pub email: String,
    /// Argon2 hash, never the plaintext credential.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The caller-visible slice of a user, for attribution in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debt_kind_from_transaction_kind() {
        assert_eq!(TransactionKind::Sale.debt_kind(), DebtKind::Receivable);
        assert_eq!(TransactionKind::Purchase.debt_kind(), DebtKind::Payable);
    }

    #[test]
    fn test_stock_sign() {
        assert_eq!(TransactionKind::Sale.stock_sign(), -1);
        assert_eq!(TransactionKind::Purchase.stock_sign(), 1);
    }

    #[test]
    fn test_debt_status_from_amounts() {
        assert_eq!(DebtStatus::for_amounts(0, 5_000), DebtStatus::Pending);
        assert_eq!(DebtStatus::for_amounts(2_000, 5_000), DebtStatus::Partial);
        assert_eq!(DebtStatus::for_amounts(5_000, 5_000), DebtStatus::Paid);
        assert_eq!(DebtStatus::for_amounts(6_000, 5_000), DebtStatus::Paid);
    }

    #[test]
    fn test_tracking_terminal_statuses() {
        assert!(TrackingStatus::Delivered.is_terminal());
        assert!(TrackingStatus::Returned.is_terminal());
        assert!(TrackingStatus::Failed.is_terminal());
        assert!(!TrackingStatus::InTransit.is_terminal());
        assert!(!TrackingStatus::Pending.is_terminal());
        assert!(!TrackingStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_debt_overdue_is_derived() {
        let now = Utc::now();
        let debt = Debt {
            id: "d1".to_string(),
            kind: DebtKind::Receivable,
            contact_name: "Budi".to_string(),
            contact_phone: None,
            amount: 5_000,
            paid_amount: 0,
            due_date: Some(now - chrono::Duration::days(1)),
            status: DebtStatus::Pending,
            transaction_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        assert!(debt.is_overdue(now));

        let paid = Debt {
            status: DebtStatus::Paid,
            paid_amount: 5_000,
            ..debt.clone()
        };
        assert!(!paid.is_overdue(now));

        let no_due = Debt {
            due_date: None,
            ..debt
        };
        assert!(!no_due.is_overdue(now));
    }
}
