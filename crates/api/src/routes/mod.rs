pub mod health;
pub mod track;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /tracks          list, create
/// /tracks/{id}     get, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/tracks", track::router())
}
