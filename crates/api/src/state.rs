use std::sync::Arc;

use waypoint_core::clock::Clock;
use waypoint_core::types::Timestamp;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything non-`Clone` sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: waypoint_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Source of "now" for catch-up, overdue derivation and transitions.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}
