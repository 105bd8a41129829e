//! Repository layer.
//!
//! Each repository owns a handle to the shared pool and provides async
//! operations for one table. Every operation runs in its own transaction with
//! a server-side `statement_timeout`, so an expired query is cancelled and
//! rolled back by Postgres rather than merely abandoned by the caller.

use std::future::Future;
use std::time::Duration;

use sqlx::{Postgres, Transaction};

use crate::error::DbError;
use crate::DbPool;

pub mod track_repo;

pub use track_repo::TrackRepo;

/// Default per-operation timeout.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Extra time the client waits beyond the server-side limit before giving up
/// on its own (e.g. the connection itself is stuck).
const CLIENT_GRACE: Duration = Duration::from_millis(500);

/// SQLSTATE `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";

/// All repositories, composed into one cloneable handle for callers.
#[derive(Debug, Clone)]
pub struct Models {
    pub tracks: TrackRepo,
}

impl Models {
    pub fn new(pool: DbPool) -> Self {
        Self::with_query_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_query_timeout(pool: DbPool, query_timeout: Duration) -> Self {
        Self {
            tracks: TrackRepo::new(pool, query_timeout),
        }
    }
}

/// Open a transaction whose statements are cancelled by the server after
/// `limit`. Nothing done inside it is visible unless it is committed.
pub(crate) async fn begin_bounded(
    pool: &DbPool,
    limit: Duration,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT set_config('statement_timeout', $1, true)")
        .bind(format!("{}ms", limit.as_millis().max(1)))
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Run `fut` under `limit`.
///
/// A server-side cancellation is reported as [`DbError::Timeout`]. The client
/// also stops waiting shortly after `limit`, dropping the transaction without
/// committing it.
pub(crate) async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit + CLIENT_GRACE, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) if is_query_canceled(&err) => {
            tracing::warn!(timeout = ?limit, "Database statement cancelled by server timeout");
            Err(DbError::Timeout(limit))
        }
        Ok(Err(err)) => Err(DbError::from(err)),
        Err(_) => {
            tracing::warn!(timeout = ?limit, "Database operation timed out");
            Err(DbError::Timeout(limit))
        }
    }
}

fn is_query_canceled(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(QUERY_CANCELED))
}
