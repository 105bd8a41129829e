//! Path extractors that reject with the JSON error envelope.

use audiosrv_core::types::DbId;
use audiosrv_db::DbError;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;

/// A record ID taken from the `{id}` path segment.
///
/// A segment that is not an integer cannot name a record, so it is reported
/// as not found rather than as axum's plain-text 400.
#[derive(Debug, Clone, Copy)]
pub struct IdParam(pub DbId);

impl<S: Send + Sync> FromRequestParts<S> for IdParam {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<DbId>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Rejected record id path segment");
                AppError::Db(DbError::RecordNotFound)
            })?;
        Ok(IdParam(id))
    }
}
