//! Shared application state handed to every handler.

use std::sync::Arc;

use gudang_db::Database;
use gudang_tracking::Synchronizer;

use crate::auth::TokenManager;

/// Shared application state.
///
/// Cheap to clone: the database holds a pool, the synchronizer holds a
/// reqwest client (itself an Arc), and the token manager is wrapped.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenManager>,
    pub tracking: Synchronizer,
}

impl AppState {
    /// Assembles the state from its parts.
    pub fn new(db: Database, tokens: TokenManager, tracking: Synchronizer) -> Self {
        AppState {
            db,
            tokens: Arc::new(tokens),
            tracking,
        }
    }
}
