//! Liveness endpoint for load balancers and deploy checks.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the catalog database answers a ping, `degraded` otherwise.
    pub status: &'static str,
    /// The `APP_ENV` the server was started with.
    pub environment: String,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
///
/// Always answers 200 so the process is seen as alive; callers read
/// `db_healthy` to decide whether the catalog is usable.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match audiosrv_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog database ping failed");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mounted at the root, outside the versioned `/api/v1` tree.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
