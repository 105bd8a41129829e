use std::sync::Arc;

use audiosrv_db::Models;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used directly by the health check.
    pub pool: audiosrv_db::DbPool,
    /// Repository registry.
    pub models: Models,
    pub config: Arc<ServerConfig>,
}
