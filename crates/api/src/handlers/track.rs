//! Handlers for the `/tracks` resource.

use audiosrv_core::error::CoreError;
use audiosrv_core::filter::{validate_filter, Filter, DEFAULT_PAGE_SIZE};
use audiosrv_core::types::DbId;
use audiosrv_core::validator::Validator;
use audiosrv_db::models::track::{validate_track, CreateTrack, UpdateTrack, TRACK_SORT_SAFELIST};
use audiosrv_db::DbError;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::IdParam;
use crate::query::{read_csv, read_int, ListTracksParams};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Optional precondition header carrying the version the client last saw.
pub const EXPECTED_VERSION_HEADER: &str = "x-expected-version";

/// Report a missing track with its ID; pass every other failure through.
fn not_found_as_track(id: DbId) -> impl FnOnce(DbError) -> AppError {
    move |err| match err {
        DbError::RecordNotFound => AppError::Core(CoreError::NotFound { entity: "Track", id }),
        other => AppError::Db(other),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tracks?title=&genres=&page=&page_size=&sort=
///
/// Search tracks by title text and genre set, one page at a time.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListTracksParams>,
) -> AppResult<impl IntoResponse> {
    let mut v = Validator::new();

    let title = params.title.unwrap_or_default();
    let genres = read_csv(params.genres.as_deref());
    let filter = Filter {
        page: read_int(params.page.as_deref(), 1, "page", &mut v),
        page_size: read_int(
            params.page_size.as_deref(),
            DEFAULT_PAGE_SIZE,
            "page_size",
            &mut v,
        ),
        sort: params.sort.unwrap_or_else(|| "id".to_string()),
        sort_safelist: TRACK_SORT_SAFELIST,
    };

    validate_filter(&mut v, &filter);
    v.into_result()?;

    let (tracks, metadata) = state
        .models
        .tracks
        .find_all(title.trim(), &genres, &filter)
        .await?;

    Ok(Json(PageResponse {
        data: tracks,
        metadata,
    }))
}

/// POST /api/v1/tracks
///
/// Create a new track. Responds 201 with a `Location` header.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTrack>,
) -> AppResult<impl IntoResponse> {
    let mut v = Validator::new();
    validate_track(&mut v, &input.input());
    v.into_result()?;

    let track = state.models.tracks.create(&input).await?;

    tracing::info!(track_id = track.id, title = %track.title, "Track created");

    let location = format!("/api/v1/tracks/{}", track.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(DataResponse { data: track }),
    ))
}

/// GET /api/v1/tracks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> AppResult<impl IntoResponse> {
    let track = state
        .models
        .tracks
        .find(id)
        .await
        .map_err(not_found_as_track(id))?;
    Ok(Json(DataResponse { data: track }))
}

/// PATCH /api/v1/tracks/{id}
///
/// Apply a partial update. The write only succeeds if nobody else changed the
/// track since it was fetched here; clients may additionally pin the version
/// they last saw with `X-Expected-Version`.
pub async fn update(
    State(state): State<AppState>,
    IdParam(id): IdParam,
    headers: HeaderMap,
    Json(input): Json<UpdateTrack>,
) -> AppResult<impl IntoResponse> {
    let mut track = state
        .models
        .tracks
        .find(id)
        .await
        .map_err(not_found_as_track(id))?;

    if let Some(raw) = headers.get(EXPECTED_VERSION_HEADER) {
        let expected = raw
            .to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .ok_or_else(|| {
                AppError::BadRequest(format!("{EXPECTED_VERSION_HEADER} must be a UUID"))
            })?;
        if expected != track.version {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "track {id} is at a different version than expected"
            ))));
        }
    }

    track.apply(input);

    let mut v = Validator::new();
    validate_track(&mut v, &track.input());
    v.into_result()?;

    state.models.tracks.update(&mut track).await?;

    tracing::info!(track_id = id, version = %track.version, "Track updated");

    Ok(Json(DataResponse { data: track }))
}

/// DELETE /api/v1/tracks/{id}
pub async fn delete(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> AppResult<impl IntoResponse> {
    state
        .models
        .tracks
        .delete(id)
        .await
        .map_err(not_found_as_track(id))?;

    tracing::info!(track_id = id, "Track deleted");

    Ok(StatusCode::NO_CONTENT)
}
