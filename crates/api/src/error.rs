use audiosrv_core::error::CoreError;
use audiosrv_db::DbError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";
const INTERNAL_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`DbError`] for repository
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `audiosrv_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A repository error from `audiosrv_db`.
    #[error(transparent)]
    Db(#[from] DbError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message): (StatusCode, &str, Value) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    json!(format!("{entity} with id {id} not found")),
                ),
                CoreError::Validation(errors) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    json!(errors),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", json!(msg)),
            },

            // --- Repository errors ---
            AppError::Db(err) => classify_db_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", json!(msg)),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a repository error into an HTTP status, error code, and message.
///
/// - `RecordNotFound` maps to 404.
/// - `EditConflict` maps to 409.
/// - Everything else maps to 500 with a sanitized message; the original
///   cause is logged.
fn classify_db_error(err: &DbError) -> (StatusCode, &'static str, Value) {
    match err {
        DbError::RecordNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", json!(NOT_FOUND_MESSAGE)),
        DbError::EditConflict => (
            StatusCode::CONFLICT,
            "CONFLICT",
            json!(EDIT_CONFLICT_MESSAGE),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                json!(INTERNAL_MESSAGE),
            )
        }
    }
}
