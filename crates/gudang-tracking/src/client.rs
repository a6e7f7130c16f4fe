//! # Courier API Client
//!
//! Thin reqwest wrapper around the KlikResi tracking endpoint:
//!
//! ```text
//! GET {base}/api/trackings/{trackingNumber}/couriers/{courierCode}
//!     x-api-key: <key>
//! ```
//!
//! The response carries a `data` object with a free-text `status` and a
//! `histories` list. The raw `data` payload is kept verbatim for storage;
//! only the status string and the history count are lifted out for the
//! mapping in [`gudang_core::tracking`].

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{TrackingError, TrackingResult};

/// Default request timeout. The provider is a bounded network call; we
/// never hang a handler on it indefinitely.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the courier client.
#[derive(Debug, Clone)]
pub struct CourierClientConfig {
    /// Provider base URL, e.g. `https://klikresi.com`.
    pub base_url: String,
    /// API key sent as the `x-api-key` header.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl CourierClientConfig {
    /// Config with the default timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        CourierClientConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// What a successful provider call boils down to.
#[derive(Debug, Clone)]
pub struct ProviderPayload {
    /// The provider's free-text status, verbatim.
    pub status: String,
    /// Number of history entries reported.
    pub history_count: usize,
    /// The raw `data` payload, persisted alongside the mapped status.
    pub raw: Value,
}

/// HTTP client for the courier tracking provider.
#[derive(Debug, Clone)]
pub struct CourierClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CourierClient {
    /// Builds the client. Fails only if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: CourierClientConfig) -> TrackingResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(CourierClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    /// Fetches the current tracking state for one shipment.
    ///
    /// ## Errors
    /// * [`TrackingError::ExternalService`] - non-2xx answer
    /// * [`TrackingError::Connect`] - network failure or timeout
    /// * [`TrackingError::MalformedResponse`] - 2xx but not the expected JSON
    pub async fn track(
        &self,
        tracking_number: &str,
        courier_code: &str,
    ) -> TrackingResult<ProviderPayload> {
        let url = format!(
            "{}/api/trackings/{}/couriers/{}",
            self.base_url, tracking_number, courier_code
        );
        debug!(tracking_number, courier_code, "Querying courier tracking API");

        let response = self
            .http
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(tracking_number, %status, "Courier tracking API returned error");
            return Err(TrackingError::ExternalService {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TrackingError::MalformedResponse(e.to_string()))?;

        Ok(parse_payload(body))
    }
}

/// Lifts status string and history count out of the response body.
/// The provider nests everything under `data`; fall back to the body
/// itself when the envelope is absent.
fn parse_payload(body: Value) -> ProviderPayload {
    let data = body.get("data").cloned().unwrap_or(body);

    let status = data
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let history_count = data
        .get("histories")
        .and_then(Value::as_array)
        .map(|h| h.len())
        .unwrap_or(0);

    ProviderPayload {
        status,
        history_count,
        raw: data,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
