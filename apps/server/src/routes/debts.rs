//! Debt ledger routes: listing, manual entry, and the payment processor.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use gudang_core::validation::{validate_name, validate_price};
use gudang_core::{Debt, DebtKind};
use gudang_db::repository::debt::NewDebt;

use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, Envelope};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// "" for all, or "RECEIVABLE" / "PAYABLE".
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    #[serde(rename = "type")]
    pub kind: DebtKind,
    pub contact_name: String,
    pub contact_phone: Option<String>,
    pub amount: i64,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentBody {
    pub amount: i64,
}

/// GET /api/debts
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Envelope<Vec<Debt>>>> {
    let kind = match query.kind.as_str() {
        "" | "RECEIVABLE" | "PAYABLE" => query.kind.as_str(),
        other => {
            return Err(ApiError::validation(format!(
                "type must be RECEIVABLE or PAYABLE, got '{other}'"
            )))
        }
    };

    let debts = state.db.debts().list(kind).await?;
    Ok(ok(debts))
}

/// POST /api/debts — manual entry, independent of any transaction.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateBody>,
) -> ApiResult<Json<Envelope<Debt>>> {
    validate_name("contactName", &body.contact_name)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    validate_price("amount", body.amount).map_err(|e| ApiError::validation(e.to_string()))?;
    if body.amount == 0 {
        return Err(ApiError::validation("amount must be positive"));
    }

    let debt = state
        .db
        .debts()
        .insert(&NewDebt {
            kind: body.kind,
            contact_name: body.contact_name.trim().to_string(),
            contact_phone: body.contact_phone,
            amount: body.amount,
            due_date: body.due_date,
            notes: body.notes,
        })
        .await?;

    info!(id = %debt.id, kind = ?debt.kind, amount = debt.amount, "Debt created");

    Ok(ok(debt))
}

/// POST /api/debts/:id/payments
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PaymentBody>,
) -> ApiResult<Json<Envelope<Debt>>> {
    let debt = state.db.debts().record_payment(&id, body.amount).await?;

    info!(
        id = %debt.id,
        paid = debt.paid_amount,
        status = ?debt.status,
        "Debt payment recorded"
    );

    Ok(ok(debt))
}
