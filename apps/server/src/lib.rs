//! # gudang-server: HTTP API for Gudang
//!
//! The app surface of the Gudang inventory and bookkeeping system: axum
//! handlers over the core/db/tracking crates, with session-token auth
//! gating every route.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Request Flow                                   │
//! │                                                                         │
//! │  Client ──► axum Router                                                │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │          require_auth middleware                                        │
//! │          (Bearer token → AuthUser, or 401 before any core logic)        │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │          handler (routes/*)                                             │
//! │          ├── gudang-db repositories                                     │
//! │          ├── gudang-core plan/report math                               │
//! │          └── gudang-tracking synchronizer                               │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │          ApiError → status code, or Json envelope                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use state::AppState;
