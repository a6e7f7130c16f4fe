//! Shipment tracking routes: stored snapshot, refresh-now, the batch
//! sweep trigger, and the courier directory.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use gudang_db::repository::transaction::TrackingSnapshot;
use gudang_tracking::{couriers::COURIERS, SweepOutcome};

use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, Envelope};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CourierEntry {
    pub code: &'static str,
    pub name: &'static str,
}

/// GET /api/couriers — the codes the provider accepts.
pub async fn couriers() -> Json<Envelope<Vec<CourierEntry>>> {
    ok(COURIERS
        .iter()
        .copied()
        .map(|(code, name)| CourierEntry { code, name })
        .collect())
}

/// GET /api/tracking/:transaction_id — the stored snapshot, no provider
/// call.
pub async fn get(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<Json<Envelope<TrackingSnapshot>>> {
    let snapshot = state
        .db
        .transactions()
        .tracking_snapshot(&transaction_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", &transaction_id))?;

    Ok(ok(snapshot))
}

/// POST /api/tracking/:transaction_id — refresh from the provider now.
pub async fn refresh(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<Json<Envelope<TrackingSnapshot>>> {
    let snapshot = state.tracking.refresh(&transaction_id).await?;

    Ok(ok(snapshot))
}

/// POST /api/tracking/sweep — refresh every active tracking. Intended to
/// be hit by an external periodic trigger; there is no internal
/// scheduler.
pub async fn sweep(State(state): State<AppState>) -> ApiResult<Json<Envelope<SweepOutcome>>> {
    let outcome = state.tracking.refresh_all().await?;

    info!(
        checked = outcome.checked,
        updated = outcome.updated,
        errors = outcome.errors,
        "Tracking sweep triggered via API"
    );

    Ok(ok(outcome))
}
