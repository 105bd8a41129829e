//! Repository for the `tracks` table.

use std::time::Duration;

use audiosrv_core::filter::{calculate_metadata, Filter, Metadata};
use audiosrv_core::types::{DbId, Timestamp, FIRST_ID};
use sqlx::FromRow;
use uuid::Uuid;

use super::{begin_bounded, bounded};
use crate::error::DbError;
use crate::models::track::{CreateTrack, Track};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_at, updated_at, title, duration_ms, genres, albums, version";

/// A listing row: the track plus the windowed count of all matching rows.
#[derive(FromRow)]
struct CountedTrack {
    total_records: i64,
    #[sqlx(flatten)]
    track: Track,
}

/// Provides create, lookup, search, conditional update and delete for tracks.
#[derive(Debug, Clone)]
pub struct TrackRepo {
    pool: DbPool,
    query_timeout: Duration,
}

impl TrackRepo {
    pub fn new(pool: DbPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Insert a new track. The store assigns id, timestamps and version.
    ///
    /// The input must already have passed
    /// [`validate_track`](crate::models::track::validate_track).
    pub async fn create(&self, input: &CreateTrack) -> Result<Track, DbError> {
        let query = format!(
            "INSERT INTO tracks (title, duration_ms, genres, albums) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        bounded(self.query_timeout, async {
            let mut tx = begin_bounded(&self.pool, self.query_timeout).await?;
            let track = sqlx::query_as::<_, Track>(&query)
                .bind(&input.title)
                .bind(input.duration_ms)
                .bind(&input.genres)
                .bind(&input.albums)
                .fetch_one(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(track)
        })
        .await
    }

    /// Find a track by its ID.
    ///
    /// IDs start at 1; anything lower is reported as missing without a query.
    pub async fn find(&self, id: DbId) -> Result<Track, DbError> {
        if id < FIRST_ID {
            return Err(DbError::RecordNotFound);
        }

        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        bounded(self.query_timeout, async {
            let mut tx = begin_bounded(&self.pool, self.query_timeout).await?;
            let track = sqlx::query_as::<_, Track>(&query)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(track)
        })
        .await?
        .ok_or(DbError::RecordNotFound)
    }

    /// Search tracks and return one page plus pagination metadata.
    ///
    /// - An empty `title` matches every row; otherwise a full-text match on
    ///   the title is required.
    /// - An empty `genres` matches every row; otherwise the stored genres must
    ///   contain all requested genres.
    ///
    /// `filter` must already have passed
    /// [`validate_filter`](audiosrv_core::filter::validate_filter); a sort
    /// outside the safelist or a page below 1 is refused without a query.
    ///
    /// Ordered by the filter's sort column, then `id` so pages are stable when
    /// the sort column has duplicates. The total is a window count over the
    /// filtered set, computed in the same statement.
    pub async fn find_all(
        &self,
        title: &str,
        genres: &[String],
        filter: &Filter,
    ) -> Result<(Vec<Track>, Metadata), DbError> {
        if filter.page < 1 || filter.page_size < 1 {
            return Err(DbError::InvalidPage {
                page: filter.page,
                page_size: filter.page_size,
            });
        }
        let column = filter
            .sort_column()
            .ok_or_else(|| DbError::UnsafeSort(filter.sort.clone()))?;
        let direction = filter.sort_direction().as_sql();

        let query = format!(
            "SELECT count(*) OVER() AS total_records, {COLUMNS} \
             FROM tracks \
             WHERE (to_tsvector('simple', title) @@ plainto_tsquery('simple', $1) OR $1 = '') \
             AND (genres @> $2 OR $2 = '{{}}') \
             ORDER BY {column} {direction}, id ASC \
             LIMIT $3 OFFSET $4"
        );

        let rows = bounded(self.query_timeout, async {
            let mut tx = begin_bounded(&self.pool, self.query_timeout).await?;
            let rows = sqlx::query_as::<_, CountedTrack>(&query)
                .bind(title)
                .bind(genres)
                .bind(filter.limit())
                .bind(filter.offset())
                .fetch_all(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(rows)
        })
        .await?;

        let total_records = rows.first().map_or(0, |row| row.total_records);
        let metadata = calculate_metadata(total_records, filter.page, filter.page_size);
        let tracks = rows.into_iter().map(|row| row.track).collect();

        Ok((tracks, metadata))
    }

    /// Write `track`'s fields back to the store if, and only if, the stored
    /// version still equals `track.version`.
    ///
    /// The compare and the write are one statement. On success the new
    /// `updated_at` and `version` are copied into `track`; if the row changed
    /// or vanished since it was read, returns [`DbError::EditConflict`].
    pub async fn update(&self, track: &mut Track) -> Result<(), DbError> {
        let row: Option<(Timestamp, Uuid)> = bounded(self.query_timeout, async {
            let mut tx = begin_bounded(&self.pool, self.query_timeout).await?;
            let row: Option<(Timestamp, Uuid)> = sqlx::query_as(
                "UPDATE tracks SET \
                    title = $1, \
                    duration_ms = $2, \
                    genres = $3, \
                    albums = $4, \
                    updated_at = now(), \
                    version = gen_random_uuid() \
                 WHERE id = $5 AND version = $6 \
                 RETURNING updated_at, version",
            )
            .bind(&track.title)
            .bind(track.duration_ms)
            .bind(&track.genres)
            .bind(&track.albums)
            .bind(track.id)
            .bind(track.version)
            .fetch_optional(&mut *tx)
            .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(row)
        })
        .await?;

        let (updated_at, version) = row.ok_or(DbError::EditConflict)?;
        track.updated_at = updated_at;
        track.version = version;
        Ok(())
    }

    /// Hard-delete a track. Missing and already-deleted rows both report
    /// [`DbError::RecordNotFound`].
    pub async fn delete(&self, id: DbId) -> Result<(), DbError> {
        if id < FIRST_ID {
            return Err(DbError::RecordNotFound);
        }

        let rows_affected = bounded(self.query_timeout, async {
            let mut tx = begin_bounded(&self.pool, self.query_timeout).await?;
            let result = sqlx::query("DELETE FROM tracks WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(result.rows_affected())
        })
        .await?;

        if rows_affected == 0 {
            return Err(DbError::RecordNotFound);
        }
        Ok(())
    }
}
