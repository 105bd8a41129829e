use std::time::Duration;

/// Failures surfaced by the repository layer.
///
/// Backend absence is normalized to [`DbError::RecordNotFound`] so callers
/// never inspect sqlx errors themselves. Every other backend error is passed
/// through unchanged in [`DbError::Database`].
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("record not found")]
    RecordNotFound,

    /// The version presented on update no longer matches the stored row, or
    /// the row was deleted since it was read.
    #[error("edit conflict")]
    EditConflict,

    #[error("database operation timed out after {0:?}")]
    Timeout(Duration),

    /// A sort token outside the resource's safelist reached the repository.
    #[error("sort value '{0}' is not permitted")]
    UnsafeSort(String),

    /// A page or page size below 1 reached the repository.
    #[error("page {page} with page size {page_size} is out of range")]
    InvalidPage { page: i64, page_size: i64 },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
