//! Derived notifications feed: nothing is stored, every entry is
//! computed from the current state of the catalog, the transaction log
//! and the debt ledger.

use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use gudang_core::Money;

use crate::error::ApiResult;
use crate::routes::{ok, Envelope};
use crate::state::AppState;

const SCAN_LIMIT: u32 = 20;
const RECENT_LIMIT: u32 = 10;

/// Notification kinds, in priority order: stock emergencies first,
/// activity last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OutOfStock,
    DebtOverdue,
    LowStock,
    Sale,
    Purchase,
}

#[derive(Debug, Serialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

/// GET /api/notifications
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Envelope<NotificationFeed>>> {
    let now = Utc::now();
    let mut notifications = Vec::new();

    // 1. Low stock & out of stock products
    for product in state.db.products().low_stock(SCAN_LIMIT).await? {
        if product.stock == 0 {
            notifications.push(Notification {
                id: format!("out-{}", product.id),
                kind: NotificationKind::OutOfStock,
                title: "Stok Habis!".to_string(),
                message: format!(
                    "{} ({}) sudah habis. Segera lakukan restok.",
                    product.name, product.sku
                ),
                created_at: now,
            });
        } else {
            notifications.push(Notification {
                id: format!("low-{}", product.id),
                kind: NotificationKind::LowStock,
                title: "Stok Menipis".to_string(),
                message: format!(
                    "{} ({}) tersisa {} {}.",
                    product.name, product.sku, product.stock, product.unit
                ),
                created_at: now,
            });
        }
    }

    // 2. Transactions from the last 24 hours
    let one_day_ago = now - Duration::days(1);
    for detail in state
        .db
        .transactions()
        .recent_since(one_day_ago, RECENT_LIMIT)
        .await?
    {
        let item_names: Vec<&str> = detail
            .items
            .iter()
            .map(|i| i.product_name.as_str())
            .collect();
        let total = Money::from_rupiah(detail.transaction.total_amount);

        let (kind, title) = match detail.transaction.kind {
            gudang_core::TransactionKind::Sale => (NotificationKind::Sale, "Penjualan Baru"),
            gudang_core::TransactionKind::Purchase => {
                (NotificationKind::Purchase, "Pembelian Baru")
            }
        };

        notifications.push(Notification {
            id: format!("tx-{}", detail.transaction.id),
            kind,
            title: title.to_string(),
            message: format!(
                "{} — {} oleh {}",
                total,
                item_names.join(", "),
                detail.created_by_name
            ),
            created_at: detail.transaction.created_at,
        });
    }

    // 3. Overdue debts
    for debt in state.db.debts().overdue(now, RECENT_LIMIT).await? {
        let remaining = Money::from_rupiah(debt.remaining());
        let title = match debt.kind {
            gudang_core::DebtKind::Receivable => "Piutang Jatuh Tempo",
            gudang_core::DebtKind::Payable => "Hutang Jatuh Tempo",
        };

        notifications.push(Notification {
            id: format!("debt-{}", debt.id),
            kind: NotificationKind::DebtOverdue,
            title: title.to_string(),
            message: format!("{} — sisa {}", debt.contact_name, remaining),
            created_at: debt.updated_at,
        });
    }

    // Priority order: out_of_stock > debt_overdue > low_stock > activity.
    notifications.sort_by_key(|n| n.kind);

    let unread_count = notifications.len();
    Ok(ok(NotificationFeed {
        notifications,
        unread_count,
    }))
}
