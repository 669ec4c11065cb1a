use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: foodshare_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Domain events are published here after a write commits.
    pub event_bus: Arc<foodshare_events::EventBus>,
}
