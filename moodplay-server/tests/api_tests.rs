//! Integration tests for moodplay-server HTTP endpoints
//!
//! Tests cover:
//! - POST /get_playlist resolution order and defaults
//! - Malformed request bodies
//! - Landing page, /static assets, health, and build info routes

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use moodplay_common::PlaylistTable;
use moodplay_server::{build_router, AppState};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

fn fixture_table() -> PlaylistTable {
    PlaylistTable::from_entries([
        ("happy_rock", vec!["A", "B"]),
        ("rock", vec!["C"]),
        ("happy", vec!["D"]),
        ("neutral", vec!["E"]),
    ])
}

/// Test helper: App backed by a fixture table
fn setup_app() -> axum::Router {
    build_router(AppState::new(fixture_table()))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn playlist_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/get_playlist")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn fetch_playlist(body: Value) -> Value {
    let response = setup_app().oneshot(playlist_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    extract_json(response.into_body()).await
}

// =============================================================================
// Playlist Resolution
// =============================================================================

#[tokio::test]
async fn test_composite_key() {
    let body = fetch_playlist(json!({"emotion": "happy", "genre": "rock"})).await;
    assert_eq!(body, json!({"playlist": ["A", "B"]}));
}

#[tokio::test]
async fn test_genre_fallback() {
    let body = fetch_playlist(json!({"emotion": "sad", "genre": "rock"})).await;
    assert_eq!(body["playlist"], json!(["C"]));
}

#[tokio::test]
async fn test_emotion_only() {
    let body = fetch_playlist(json!({"emotion": "happy"})).await;
    assert_eq!(body["playlist"], json!(["D"]));
}

#[tokio::test]
async fn test_null_genre_is_absent() {
    let body = fetch_playlist(json!({"emotion": "happy", "genre": null})).await;
    assert_eq!(body["playlist"], json!(["D"]));
}

#[tokio::test]
async fn test_unknown_emotion_uses_neutral() {
    let body = fetch_playlist(json!({"emotion": "unknown"})).await;
    assert_eq!(body["playlist"], json!(["E"]));
}

#[tokio::test]
async fn test_unknown_emotion_and_genre_is_empty() {
    let body = fetch_playlist(json!({"emotion": "unknown", "genre": "unknown"})).await;
    assert_eq!(body["playlist"], json!([]));
}

#[tokio::test]
async fn test_empty_genre_is_absent() {
    let body = fetch_playlist(json!({"emotion": "unknown", "genre": ""})).await;
    assert_eq!(body["playlist"], json!(["E"]));
}

#[tokio::test]
async fn test_missing_emotion_defaults_to_neutral() {
    let body = fetch_playlist(json!({})).await;
    assert_eq!(body["playlist"], json!(["E"]));
}

// =============================================================================
// Malformed Requests
// =============================================================================

#[tokio::test]
async fn test_invalid_json_is_client_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/get_playlist")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "INVALID_BODY");
}

#[tokio::test]
async fn test_missing_content_type_is_client_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/get_playlist")
        .body(Body::from(r#"{"emotion": "happy"}"#))
        .unwrap();

    let response = setup_app().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_non_string_emotion_resolves() {
    let body = fetch_playlist(json!({"emotion": 42})).await;
    assert_eq!(body["playlist"], json!(["E"]));
}

#[tokio::test]
async fn test_falsy_genre_is_absent() {
    let body = fetch_playlist(json!({"emotion": "happy", "genre": false})).await;
    assert_eq!(body["playlist"], json!(["D"]));

    let body = fetch_playlist(json!({"emotion": "happy", "genre": 0})).await;
    assert_eq!(body["playlist"], json!(["D"]));
}

#[tokio::test]
async fn test_non_string_genre_matches_no_key() {
    let body = fetch_playlist(json!({"emotion": "happy", "genre": 7})).await;
    assert_eq!(body["playlist"], json!(["D"]));

    let body = fetch_playlist(json!({"emotion": "unknown", "genre": 7})).await;
    assert_eq!(body["playlist"], json!([]));
}

#[tokio::test]
async fn test_non_object_body_is_client_error() {
    let response = setup_app()
        .oneshot(playlist_request(json!(["happy"])))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

// =============================================================================
// Static and Service Routes
// =============================================================================

#[tokio::test]
async fn test_index_page() {
    let response = setup_app().oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/static/script.js"));
}

#[tokio::test]
async fn test_script_js() {
    let response = setup_app()
        .oneshot(get_request("/static/script.js"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/javascript"
    );
}

#[tokio::test]
async fn test_health_reports_table_state() {
    let response = setup_app().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "moodplay-server");
    assert_eq!(body["playlists"]["keys"], 4);
    assert_eq!(body["playlists"]["has_neutral"], true);
    assert_eq!(body["build"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_degraded_without_neutral() {
    let table = PlaylistTable::from_entries([("happy", vec!["D"])]);
    let app = build_router(AppState::new(table));

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["playlists"]["keys"], 1);
    assert_eq!(body["playlists"]["has_neutral"], false);
}

#[tokio::test]
async fn test_build_info() {
    let response = setup_app()
        .oneshot(get_request("/api/buildinfo"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
}

#[tokio::test]
async fn test_static_dir_files_are_served() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("models")).unwrap();
    fs::write(temp_dir.path().join("models/weights.json"), r#"{"layers": 3}"#).unwrap();

    let app = build_router(AppState::new(fixture_table()).with_static_dir(temp_dir.path()));

    let response = app
        .clone()
        .oneshot(get_request("/static/models/weights.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["layers"], 3);

    // Embedded script still served when the folder has no copy
    let response = app.oneshot(get_request("/static/script.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_static_dir_overrides_embedded_script() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("script.js"), "// custom").unwrap();

    let app = build_router(AppState::new(fixture_table()).with_static_dir(temp_dir.path()));
    let response = app.oneshot(get_request("/static/script.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"// custom");
}

#[tokio::test]
async fn test_missing_static_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let app = build_router(AppState::new(fixture_table()).with_static_dir(temp_dir.path()));

    let response = app
        .oneshot(get_request("/static/models/absent.bin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = setup_app().oneshot(get_request("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
