//! Track entity model, DTOs and write validation.

use audiosrv_core::filter::SortKey;
use audiosrv_core::types::{DbId, Timestamp};
use audiosrv_core::validator::{unique, Validator};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum title length in bytes.
pub const MAX_TITLE_BYTES: usize = 500;

/// Sort tokens accepted when listing tracks, and the columns they map to.
pub const TRACK_SORT_SAFELIST: &[SortKey] = &[
    SortKey::new("id", "id"),
    SortKey::new("title", "title"),
    SortKey::new("duration", "duration_ms"),
    SortKey::new("genres", "genres"),
    SortKey::new("albums", "albums"),
    SortKey::new("created_at", "created_at"),
];

/// A row from the `tracks` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub title: String,
    pub duration_ms: i64,
    pub genres: Vec<String>,
    pub albums: Vec<String>,
    /// Optimistic-concurrency token; regenerated by the store on every update.
    pub version: Uuid,
}

/// DTO for creating a new track.
///
/// Missing fields default to empty values so they are reported by
/// [`validate_track`] rather than rejected during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateTrack {
    pub title: String,
    pub duration_ms: i64,
    pub genres: Vec<String>,
    pub albums: Vec<String>,
}

/// DTO for patching an existing track. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTrack {
    pub title: Option<String>,
    pub duration_ms: Option<i64>,
    pub genres: Option<Vec<String>>,
    pub albums: Option<Vec<String>>,
}

/// Borrowed view over the writable fields of a track, shared by the create
/// and update paths so both run the same validation.
#[derive(Debug, Clone, Copy)]
pub struct TrackInput<'a> {
    pub title: &'a str,
    pub duration_ms: i64,
    pub genres: &'a [String],
    pub albums: &'a [String],
}

impl CreateTrack {
    pub fn input(&self) -> TrackInput<'_> {
        TrackInput {
            title: &self.title,
            duration_ms: self.duration_ms,
            genres: &self.genres,
            albums: &self.albums,
        }
    }
}

impl Track {
    pub fn input(&self) -> TrackInput<'_> {
        TrackInput {
            title: &self.title,
            duration_ms: self.duration_ms,
            genres: &self.genres,
            albums: &self.albums,
        }
    }

    /// Overwrite the fields present in `patch`. Identity and version are untouched.
    pub fn apply(&mut self, patch: UpdateTrack) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(duration_ms) = patch.duration_ms {
            self.duration_ms = duration_ms;
        }
        if let Some(genres) = patch.genres {
            self.genres = genres;
        }
        if let Some(albums) = patch.albums {
            self.albums = albums;
        }
    }
}

/// Check a track's writable fields. Must pass before create or update.
pub fn validate_track(v: &mut Validator, track: &TrackInput<'_>) {
    v.check(!track.title.is_empty(), "title", "must be provided");
    v.check(
        track.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(track.duration_ms != 0, "duration_ms", "must be provided");
    v.check(track.duration_ms > 0, "duration_ms", "must be a positive duration");

    v.check(!track.genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(unique(track.genres), "genres", "must not contain duplicate values");

    v.check(!track.albums.is_empty(), "albums", "must contain at least 1 album");
    v.check(unique(track.albums), "albums", "must not contain duplicate values");
}
