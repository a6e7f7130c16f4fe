//! # gudang-tracking: Courier Tracking Synchronizer
//!
//! Keeps purchase transactions' shipment status current by querying the
//! KlikResi courier-tracking HTTP service.
//!
//! ## Module Organization
//!
//! - [`client`] - reqwest client for the provider endpoint
//! - [`sync`] - per-transaction refresh and the batch sweep
//! - [`couriers`] - supported courier code directory
//! - [`error`] - tracking error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gudang_tracking::{CourierClient, CourierClientConfig, Synchronizer};
//!
//! let client = CourierClient::new(CourierClientConfig::new(
//!     "https://klikresi.com",
//!     api_key,
//! ))?;
//! let sync = Synchronizer::new(db, client);
//!
//! // Single refresh, e.g. from the "check now" endpoint:
//! let snapshot = sync.refresh(&transaction_id).await?;
//!
//! // Periodic sweep, from an external trigger:
//! let outcome = sync.refresh_all().await?;
//! ```

pub mod client;
pub mod couriers;
pub mod error;
pub mod sync;

pub use client::{CourierClient, CourierClientConfig, ProviderPayload};
pub use error::TrackingError;
pub use sync::{SweepOutcome, Synchronizer};
