//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error → Status Mapping                             │
//! │                                                                         │
//! │  Unauthorized        → 401  (checked first, before any core logic)     │
//! │  Validation          → 400                                              │
//! │  InsufficientStock   → 400  (message carries name + available)          │
//! │  NotFound            → 404                                              │
//! │  Conflict            → 409  (duplicate SKU / category name / email)     │
//! │  External            → 502  (courier API failure, retryable)            │
//! │  Internal            → 500  (logged; client gets a generic message)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use gudang_core::CoreError;
use gudang_db::{DbError, StoreError};
use gudang_tracking::TrackingError;

/// Custom error type for the API service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session.
    #[error("Unauthorized")]
    Unauthorized,

    /// Missing/malformed input or a violated business rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Sale quantity exceeds available stock.
    #[error("{0}")]
    InsufficientStock(String),

    /// Referenced entity absent.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique value, or a blocked delete.
    #[error("{0}")]
    Conflict(String),

    /// The courier tracking service failed; retryable by the caller.
    #[error("Courier tracking service error: {0}")]
    External(String),

    /// Unclassified failure. Logged; the client sees a generic message.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::NotFound(format!("{resource} not found: {id}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InsufficientStock(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::External(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::DebtNotFound(id) => ApiError::not_found("Debt", &id),
            CoreError::InsufficientStock { .. } => ApiError::InsufficientStock(err.to_string()),
            CoreError::EmptyTransaction
            | CoreError::ShippingNotAllowed
            | CoreError::InvalidPaymentAmount { .. } => ApiError::Validation(err.to_string()),
            CoreError::Validation(e) => ApiError::Validation(e.to_string()),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::Conflict(format!("{field} '{value}' already exists"))
            }
            DbError::ForeignKeyViolation { message } => {
                ApiError::Conflict(format!("Invalid reference: {message}"))
            }
            other => {
                // Log the actual error but return a generic message
                error!("Database error: {other}");
                ApiError::Internal
            }
        }
    }
}

/// Converts combined store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(e) => e.into(),
            StoreError::Db(e) => e.into(),
        }
    }
}

/// Converts tracking errors to API errors.
impl From<TrackingError> for ApiError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::NotFound(id) => ApiError::not_found("Transaction", &id),
            TrackingError::MissingTrackingInfo(_) => ApiError::Validation(err.to_string()),
            TrackingError::ExternalService { .. }
            | TrackingError::Connect(_)
            | TrackingError::MalformedResponse(_) => ApiError::External(err.to_string()),
            TrackingError::Db(e) => e.into(),
        }
    }
}

/// Type alias for API results.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ApiError::validation("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::not_found("Product", "x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Conflict("dup".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::External("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ApiError::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_insufficient_stock_is_bad_request_with_context() {
        let err: ApiError = CoreError::InsufficientStock {
            name: "Produk A".to_string(),
            available: 3,
            requested: 5,
        }
        .into();

        match &err {
            ApiError::InsufficientStock(msg) => {
                assert!(msg.contains("Produk A"));
                assert!(msg.contains('3'));
            }
            other => panic!("unexpected variant: {other}"),
        }
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err: ApiError = DbError::duplicate("products.sku", "ELEC-001").into();
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }
}
