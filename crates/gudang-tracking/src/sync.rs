//! # Tracking Synchronizer
//!
//! Refreshes shipment status for purchase transactions, one at a time or
//! as a batch sweep.
//!
//! ## Sweep Behavior
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      refresh_all() sweep                                │
//! │                                                                         │
//! │  SELECT purchases WHERE tracking_number set AND status not terminal    │
//! │       │                                                                 │
//! │       ▼  for each, in order                                             │
//! │  refresh(id) ── ok ──► updated += 1                                     │
//! │       │                                                                 │
//! │       └──── err ─────► errors += 1, log, CONTINUE with the next one     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sleep(delay)  ← stays under the provider's rate limit                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sweep has no scheduler of its own; an external trigger (cron, the
//! HTTP endpoint) invokes it periodically. Failed refreshes are simply
//! counted — the next sweep picks them up again.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gudang_core::tracking::map_provider_status;
use gudang_db::repository::transaction::TrackingSnapshot;
use gudang_db::Database;

use crate::client::CourierClient;
use crate::error::{TrackingError, TrackingResult};

/// Pause between provider calls during a sweep.
pub const DEFAULT_SWEEP_DELAY: Duration = Duration::from_millis(500);

/// Outcome of one batch sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    /// How many transactions were eligible.
    pub checked: usize,
    /// Successfully refreshed.
    pub updated: usize,
    /// Failed; left for the next sweep.
    pub errors: usize,
}

/// The tracking synchronizer: courier client + persistence.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    db: Database,
    client: CourierClient,
    sweep_delay: Duration,
}

impl Synchronizer {
    /// Creates a synchronizer with the default sweep delay.
    pub fn new(db: Database, client: CourierClient) -> Self {
        Synchronizer {
            db,
            client,
            sweep_delay: DEFAULT_SWEEP_DELAY,
        }
    }

    /// Overrides the pause between sweep calls.
    pub fn sweep_delay(mut self, delay: Duration) -> Self {
        self.sweep_delay = delay;
        self
    }

    /// Refreshes one transaction's shipment status from the provider and
    /// persists the mapped status, the raw payload and the refresh time.
    ///
    /// ## Errors
    /// * [`TrackingError::NotFound`] - no such transaction
    /// * [`TrackingError::MissingTrackingInfo`] - no tracking number or
    ///   courier code on the transaction
    /// * provider/persistence errors, propagated — never swallowed
    pub async fn refresh(&self, transaction_id: &str) -> TrackingResult<TrackingSnapshot> {
        let snapshot = self
            .db
            .transactions()
            .tracking_snapshot(transaction_id)
            .await?
            .ok_or_else(|| TrackingError::NotFound(transaction_id.to_string()))?;

        let (tracking_number, courier_code) = match (&snapshot.tracking_number, &snapshot.courier_code)
        {
            (Some(number), Some(courier)) => (number.clone(), courier.clone()),
            _ => return Err(TrackingError::MissingTrackingInfo(transaction_id.to_string())),
        };

        let payload = self.client.track(&tracking_number, &courier_code).await?;
        let status = map_provider_status(&payload.status, payload.history_count);

        self.db
            .transactions()
            .set_tracking(transaction_id, status, &payload.raw.to_string(), Utc::now())
            .await?;

        info!(
            transaction_id,
            provider_status = %payload.status,
            status = ?status,
            "Tracking status refreshed"
        );

        self.db
            .transactions()
            .tracking_snapshot(transaction_id)
            .await?
            .ok_or_else(|| TrackingError::NotFound(transaction_id.to_string()))
    }

    /// Refreshes every purchase with an active (non-terminal) tracking
    /// number, continuing past individual failures.
    pub async fn refresh_all(&self) -> TrackingResult<SweepOutcome> {
        let active = self.db.transactions().active_trackings().await?;
        let checked = active.len();

        if checked == 0 {
            info!("No active trackings to refresh");
            return Ok(SweepOutcome {
                checked: 0,
                updated: 0,
                errors: 0,
            });
        }

        let mut updated = 0;
        let mut errors = 0;

        for entry in active {
            match self.refresh(&entry.id).await {
                Ok(_) => updated += 1,
                Err(err) => {
                    warn!(transaction_id = %entry.id, %err, "Tracking refresh failed, continuing");
                    errors += 1;
                }
            }

            tokio::time::sleep(self.sweep_delay).await;
        }

        info!(checked, updated, errors, "Tracking sweep complete");

        Ok(SweepOutcome {
            checked,
            updated,
            errors,
        })
    }
}
