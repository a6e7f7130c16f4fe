//! # gudang-core: Pure Business Logic for Gudang
//!
//! This crate is the **heart** of Gudang, a small-business inventory and
//! bookkeeping system. It contains all business logic as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gudang Architecture                              │
//! │                                                                         │
//! │  HTTP API (axum handlers)                                              │
//! │       │                                                                 │
//! │  ┌────▼────────────────────────────────────────────────────────────┐   │
//! │  │               ★ gudang-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │  │  types  │ │  money  │ │ posting  │ │ reports  │ │tracking│ │   │
//! │  │  │ Product │ │  Money  │ │   plan   │ │ margins  │ │ status │ │   │
//! │  │  │  Debt   │ │  (IDR)  │ │  deltas  │ │ buckets  │ │  map   │ │   │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └────┬────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │  gudang-db (SQLite) / gudang-tracking (courier API)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Transaction, Debt, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`posting`] - Transaction posting plan computation
//! - [`reports`] - Report aggregation math
//! - [`tracking`] - Courier status normalization
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole rupiah (i64), no floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod posting;
pub mod reports;
pub mod tracking;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use gudang_core::Money` instead of
// `use gudang_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single transaction.
///
/// ## Business Reason
/// Prevents runaway requests and keeps transaction sizes reasonable for a
/// small-business workload.
pub const MAX_TRANSACTION_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 10000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 99_999;

/// Default minimum-stock threshold applied when a product is created
/// without one.
pub const DEFAULT_MIN_STOCK: i64 = 5;

/// Default unit label for products.
pub const DEFAULT_UNIT: &str = "pcs";
