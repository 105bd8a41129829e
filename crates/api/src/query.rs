//! Shared query parameter types for API handlers.
//!
//! Values arrive as raw strings so malformed numbers can be reported as
//! field-level validation errors instead of a generic 400.

use audiosrv_core::validator::Validator;
use serde::Deserialize;

/// Query parameters for `GET /tracks`.
#[derive(Debug, Default, Deserialize)]
pub struct ListTracksParams {
    pub title: Option<String>,
    /// Comma-separated genre list; all must be present on a matching track.
    pub genres: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
}

/// Parse an optional integer parameter, recording a validation error under
/// `key` when it is present but not an integer.
pub fn read_int(value: Option<&str>, default: i64, key: &str, v: &mut Validator) -> i64 {
    match value {
        None | Some("") => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            v.add_error(key, "must be an integer value");
            default
        }),
    }
}

/// Split a comma-separated parameter, dropping empty segments.
pub fn read_csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
