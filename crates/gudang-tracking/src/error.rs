//! # Tracking Error Types
//!
//! Error types for the courier tracking synchronizer.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tracking Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Preconditions  │  │    Provider     │  │      Persistence        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotFound       │  │  ExternalService│  │  Db                     │ │
//! │  │  MissingInfo    │  │  Connect        │  │                         │ │
//! │  │                 │  │  Malformed      │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Provider failures are surfaced, never swallowed: the single-refresh
//! path propagates them to the caller, the batch sweep counts them and
//! moves on. Nothing is retried inline; the next sweep tries again.

use thiserror::Error;

use gudang_db::DbError;

/// Result type alias for tracking operations.
pub type TrackingResult<T> = Result<T, TrackingError>;

/// Tracking synchronizer errors.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// The transaction does not exist.
    #[error("Transaction not found: {0}")]
    NotFound(String),

    /// The transaction has no tracking number or courier code.
    #[error("Transaction {0} has no tracking information")]
    MissingTrackingInfo(String),

    /// The provider answered with a non-success HTTP status.
    #[error("Courier tracking service returned HTTP {status}")]
    ExternalService { status: u16 },

    /// The provider could not be reached (connect failure, timeout).
    #[error("Failed to reach courier tracking service: {0}")]
    Connect(#[from] reqwest::Error),

    /// The provider answered 2xx but the body was not the expected JSON.
    #[error("Malformed tracking response: {0}")]
    MalformedResponse(String),

    /// Persisting the refreshed status failed.
    #[error(transparent)]
    Db(#[from] DbError),
}
