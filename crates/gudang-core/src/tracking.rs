//! # Courier Status Normalization
//!
//! Maps the tracking provider's free-text status strings onto the closed
//! [`TrackingStatus`] set. The provider reports statuses with inconsistent
//! casing and spacing ("In Transit", "in_transit", "INTRANSIT"), so the
//! input is lowercased and whitespace-stripped before the lookup.
//!
//! Unrecognized strings fall back to `in_transit` when the provider
//! reported any history entries (the shipment demonstrably moved), else
//! `unknown`.

use crate::types::TrackingStatus;

/// Normalizes and maps a provider status string.
///
/// ## Arguments
/// * `raw` - the provider's `status` field, verbatim
/// * `history_count` - number of entries in the provider's `histories`
///   list, used for the fallback
///
/// ## Example
/// ```rust
/// use gudang_core::tracking::map_provider_status;
/// use gudang_core::types::TrackingStatus;
///
/// assert_eq!(map_provider_status("In Transit", 3), TrackingStatus::InTransit);
/// assert_eq!(map_provider_status("DELIVERED", 5), TrackingStatus::Delivered);
/// assert_eq!(map_provider_status("customs_hold", 2), TrackingStatus::InTransit);
/// assert_eq!(map_provider_status("customs_hold", 0), TrackingStatus::Unknown);
/// ```
pub fn map_provider_status(raw: &str, history_count: usize) -> TrackingStatus {
    let normalized: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    match normalized.as_str() {
        "delivered" => TrackingStatus::Delivered,
        "intransit" | "in_transit" => TrackingStatus::InTransit,
        "outfordelivery" | "out_for_delivery" => TrackingStatus::OutForDelivery,
        "inforeceived" | "info_received" => TrackingStatus::InfoReceived,
        "pickup" | "picked_up" | "pickedup" => TrackingStatus::PickedUp,
        "failed" => TrackingStatus::Failed,
        "returned" => TrackingStatus::Returned,
        _ => {
            if history_count > 0 {
                TrackingStatus::InTransit
            } else {
                TrackingStatus::Unknown
            }
        }
    }
}
