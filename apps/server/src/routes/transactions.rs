//! Transaction posting and reads. Transactions are immutable: there is
//! deliberately no update or delete here.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;

use gudang_core::posting::{DebtRequest, ItemRequest, PostingRequest, ShippingInfo};
use gudang_core::{TransactionDetail, TransactionKind};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, Envelope, Paginated};
use crate::state::AppState;

fn default_page() -> u32 {
    1
}
fn default_limit() -> u32 {
    20
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// "" for all, or "SALE" / "PURCHASE".
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub product_id: String,
    pub quantity: i64,
    pub price: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtBody {
    pub contact_name: String,
    pub contact_phone: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub items: Vec<ItemBody>,
    pub notes: Option<String>,
    pub debt: Option<DebtBody>,
    pub tracking_number: Option<String>,
    pub courier_code: Option<String>,
}

fn parse_kind_filter(kind: &str) -> ApiResult<&str> {
    match kind {
        "" | "SALE" | "PURCHASE" => Ok(kind),
        other => Err(ApiError::validation(format!(
            "type must be SALE or PURCHASE, got '{other}'"
        ))),
    }
}

/// GET /api/transactions
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Envelope<Paginated<TransactionDetail>>>> {
    let kind = parse_kind_filter(&query.kind)?;
    let limit = query.limit.clamp(1, 100);

    let (transactions, total) = state
        .db
        .transactions()
        .list(kind, query.page, limit)
        .await?;

    Ok(ok(Paginated::new(
        transactions,
        total,
        query.page.max(1),
        limit,
    )))
}

/// GET /api/transactions/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<TransactionDetail>>> {
    let transaction = state
        .db
        .transactions()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", &id))?;

    Ok(ok(transaction))
}

/// POST /api/transactions — the posting engine's HTTP surface.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateBody>,
) -> ApiResult<Json<Envelope<TransactionDetail>>> {
    let shipping = match (
        body.tracking_number.filter(|t| !t.trim().is_empty()),
        body.courier_code.filter(|c| !c.trim().is_empty()),
    ) {
        (Some(tracking_number), Some(courier_code)) => Some(ShippingInfo {
            tracking_number: tracking_number.trim().to_string(),
            courier_code: courier_code.trim().to_string(),
        }),
        (None, None) => None,
        _ => {
            return Err(ApiError::validation(
                "trackingNumber and courierCode must be supplied together",
            ))
        }
    };

    let request = PostingRequest {
        kind: body.kind,
        items: body
            .items
            .into_iter()
            .map(|item| ItemRequest {
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect(),
        notes: body.notes,
        debt: body.debt.map(|debt| DebtRequest {
            contact_name: debt.contact_name,
            contact_phone: debt.contact_phone,
            due_date: debt.due_date,
        }),
        shipping,
    };

    let posted = state.db.transactions().post(&user.id, &request).await?;

    info!(
        id = %posted.transaction.id,
        kind = ?posted.transaction.kind,
        total = posted.transaction.total_amount,
        by = %user.name,
        "Transaction posted"
    );

    Ok(ok(posted))
}
