//! HTTP-level integration tests for the `/api/v1/tracks` endpoints.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the router.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, patch_json, post_json};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn nightfall() -> Value {
    json!({
        "title": "Nightfall",
        "duration_ms": 180_000,
        "genres": ["ambient"],
        "albums": ["Debut"],
    })
}

async fn create(pool: &PgPool, body: Value) -> Value {
    let response = post_json(build_test_app(pool.clone()), "/api/v1/tracks", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Test: Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_returns_201_with_location(pool: PgPool) {
    let response = post_json(build_test_app(pool), "/api/v1/tracks", nightfall()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response.headers()["location"].to_str().unwrap().to_string();
    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().unwrap();

    assert!(id > 0);
    assert_eq!(location, format!("/api/v1/tracks/{id}"));
    assert_eq!(json["data"]["title"], "Nightfall");
    assert_eq!(json["data"]["duration_ms"], 180_000);
    assert_eq!(json["data"]["genres"], json!(["ambient"]));
    assert_eq!(json["data"]["albums"], json!(["Debut"]));
    assert!(json["data"]["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_invalid_returns_field_errors(pool: PgPool) {
    let body = json!({ "title": "", "genres": ["rock", "rock"] });
    let response = post_json(build_test_app(pool.clone()), "/api/v1/tracks", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["title"], "must be provided");
    assert_eq!(json["error"]["duration_ms"], "must be provided");
    assert_eq!(json["error"]["genres"], "must not contain duplicate values");
    assert_eq!(json["error"]["albums"], "must contain at least 1 album");

    // Nothing reached the store.
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tracks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_malformed_json_is_rejected(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/tracks",
        json!({ "title": 42 }),
    )
    .await;
    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Test: Get
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_returns_created_track(pool: PgPool) {
    let created = create(&pool, nightfall()).await;
    let id = created["id"].as_i64().unwrap();

    let response = get(build_test_app(pool), &format!("/api/v1/tracks/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], created);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_returns_404(pool: PgPool) {
    for id in ["0", "-1", "424242"] {
        let response = get(build_test_app(pool.clone()), &format!("/api/v1/tracks/{id}")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "id {id}");
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_numeric_id_returns_json_404(pool: PgPool) {
    let uri = "/api/v1/tracks/abc";
    let responses = [
        get(build_test_app(pool.clone()), uri).await,
        patch_json(build_test_app(pool.clone()), uri, json!({ "title": "X" }), &[]).await,
        delete(build_test_app(pool), uri).await,
    ];
    for response in responses {
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["error"], "the requested resource could not be found");
    }
}

// ---------------------------------------------------------------------------
// Test: Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_updates_fields_and_version(pool: PgPool) {
    let created = create(&pool, nightfall()).await;
    let id = created["id"].as_i64().unwrap();

    let response = patch_json(
        build_test_app(pool),
        &format!("/api/v1/tracks/{id}"),
        json!({ "title": "Nightfall (Live)", "genres": ["ambient", "live"] }),
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "Nightfall (Live)");
    assert_eq!(updated["genres"], json!(["ambient", "live"]));
    assert_eq!(updated["duration_ms"], created["duration_ms"]);
    assert_eq!(updated["albums"], created["albums"]);
    assert_ne!(updated["version"], created["version"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_with_stale_expected_version_conflicts(pool: PgPool) {
    let created = create(&pool, nightfall()).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tracks/{id}");
    let original_version = created["version"].as_str().unwrap().to_string();

    let first = patch_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "title": "First" }),
        &[("x-expected-version", original_version.as_str())],
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = patch_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "title": "Second" }),
        &[("x-expected-version", original_version.as_str())],
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");

    let current = body_json(get(build_test_app(pool), &uri).await).await;
    assert_eq!(current["data"]["title"], "First");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_with_malformed_expected_version_is_400(pool: PgPool) {
    let created = create(&pool, nightfall()).await;
    let id = created["id"].as_i64().unwrap();

    let response = patch_json(
        build_test_app(pool),
        &format!("/api/v1/tracks/{id}"),
        json!({ "title": "Whatever" }),
        &[("x-expected-version", "not-a-uuid")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_invalid_returns_422(pool: PgPool) {
    let created = create(&pool, nightfall()).await;
    let id = created["id"].as_i64().unwrap();

    let response = patch_json(
        build_test_app(pool),
        &format!("/api/v1/tracks/{id}"),
        json!({ "albums": [] }),
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"]["albums"],
        "must contain at least 1 album"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_missing_returns_404(pool: PgPool) {
    let response = patch_json(
        build_test_app(pool),
        "/api/v1/tracks/999",
        json!({ "title": "Ghost" }),
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_then_delete_again(pool: PgPool) {
    let created = create(&pool, nightfall()).await;
    let uri = format!("/api/v1/tracks/{}", created["id"]);

    let first = delete(build_test_app(pool.clone()), &uri).await;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let second = delete(build_test_app(pool.clone()), &uri).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);

    let lookup = get(build_test_app(pool), &uri).await;
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_empty_table(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        "/api/v1/tracks?page=1&page_size=20&sort=id",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], json!([]));
    assert_eq!(
        json["metadata"],
        json!({
            "current_page": 0,
            "page_size": 0,
            "first_page": 0,
            "last_page": 0,
            "total_records": 0,
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_sorts_and_paginates(pool: PgPool) {
    for (title, genres) in [
        ("Blue Monday", json!(["synthpop", "dance"])),
        ("Blue Train", json!(["jazz"])),
        ("Kind of Blue", json!(["jazz", "modal"])),
        ("Red Alert", json!(["dance"])),
    ] {
        create(
            &pool,
            json!({ "title": title, "duration_ms": 1000, "genres": genres, "albums": ["X"] }),
        )
        .await;
    }

    let json = body_json(
        get(
            build_test_app(pool.clone()),
            "/api/v1/tracks?title=blue&sort=-title&page_size=2",
        )
        .await,
    )
    .await;
    let titles: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["Kind of Blue", "Blue Train"]);
    assert_eq!(json["metadata"]["total_records"], 3);
    assert_eq!(json["metadata"]["last_page"], 2);

    let json = body_json(
        get(build_test_app(pool), "/api/v1/tracks?genres=jazz,modal").await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["title"], "Kind of Blue");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_rejects_bad_parameters(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        "/api/v1/tracks?page=abc&page_size=500&sort=password",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["error"]["page"], "must be an integer value");
    assert_eq!(json["error"]["page_size"], "must be a maximum of 100");
    assert_eq!(json["error"]["sort"], "invalid sort value");
}
