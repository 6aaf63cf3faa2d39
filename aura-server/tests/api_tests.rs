//! HTTP API integration tests
//!
//! Drives the full router through tower's `oneshot` with a stub video
//! search backend and a file-backed temp database.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use aura_common::db::init_database;
use aura_common::Config;
use aura_server::services::youtube::{SongQuery, VideoSearchBackend, YouTubeResolver};
use aura_server::{build_router, AppState};

struct StubBackend {
    result: Option<String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl VideoSearchBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn search(&self, _query: &SongQuery) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: PathBuf::from("/tmp"),
        youtube_api_key: None,
        base_url: "http://localhost:8000".to_string(),
    }
}

async fn test_app(name: &str, backend_result: Option<&str>) -> (Router, Arc<AtomicUsize>) {
    let path = PathBuf::from(format!(
        "/tmp/aura-api-test-{}-{}.db",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    let pool = init_database(&path).await.expect("init database");

    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = YouTubeResolver::with_backend(
        Box::new(StubBackend {
            result: backend_result.map(String::from),
            calls: calls.clone(),
        }),
        "http://localhost:8000".to_string(),
    );

    let state = AppState::new(pool, test_config(), resolver);
    (build_router(state), calls)
}

async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Register a user and return a session token
async fn register(app: &Router, email: &str) -> String {
    let (status, body) = request(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": email, "password": "correct horse", "name": "Tester"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app("health", None).await;

    let (status, body) = request(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "aura-server");
    assert_eq!(body["video_backend"], "stub");
}

#[tokio::test]
async fn test_register_login_me() {
    let (app, _) = test_app("auth", None).await;

    let token = register(&app, "alice@example.com").await;

    let (status, body) =
        request(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alice@example.com");
    // Password hash must never be serialized
    assert!(body.get("password_hash").is_none());

    // Duplicate registration conflicts
    let (status, body) = request(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "alice@example.com", "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert!(body["user"]["last_login"].is_string());

    let (status, _) = request(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@example.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let (app, _) = test_app("logout", None).await;
    let token = register(&app, "bob@example.com").await;

    let (status, _) =
        request(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthenticated_requests_rejected() {
    let (app, _) = test_app("unauth", None).await;

    let (status, body) = request(&app, Method::GET, "/api/library", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = request(
        &app,
        Method::GET,
        "/api/library",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_song_and_library_flow() {
    let (app, _) = test_app("library", None).await;
    let token = register(&app, "carol@example.com").await;

    let (status, song) = request(
        &app,
        Method::POST,
        "/api/songs",
        Some(&token),
        Some(json!({
            "title": "Blinding Lights",
            "artists": ["The Weeknd"],
            "genre": ["synthpop"],
            "platform": "spotify"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let song_id = song["song_id"].as_str().expect("song_id").to_string();

    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/library/{}", song_id),
        Some(&token),
        Some(json!({"source": "search"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, library) =
        request(&app, Method::GET, "/api/library", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(library.as_array().map(Vec::len), Some(1));
    assert_eq!(library[0]["title"], "Blinding Lights");
    assert_eq!(library[0]["source"], "search");
    assert_eq!(library[0]["play_count"], 0);

    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/library/{}/favorite", song_id),
        Some(&token),
        Some(json!({"is_favorite": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/api/library/{}", song_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, library) = request(&app, Method::GET, "/api/library", Some(&token), None).await;
    assert_eq!(library.as_array().map(Vec::len), Some(0));

    // Adding a nonexistent song is a 404
    let (status, _) = request(
        &app,
        Method::POST,
        "/api/library/no-such-song",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_bumps_play_count() {
    let (app, _) = test_app("history", None).await;
    let token = register(&app, "dave@example.com").await;

    let (_, song) = request(
        &app,
        Method::POST,
        "/api/songs",
        Some(&token),
        Some(json!({"title": "Song", "artists": ["A"]})),
    )
    .await;
    let song_id = song["song_id"].as_str().unwrap().to_string();

    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/library/{}", song_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, entry) = request(
        &app,
        Method::POST,
        "/api/history",
        Some(&token),
        Some(json!({
            "song_id": song_id,
            "song_title": "Song",
            "artists": ["A"],
            "completed": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["song_id"], song_id.as_str());

    let (_, library) = request(&app, Method::GET, "/api/library", Some(&token), None).await;
    assert_eq!(library[0]["play_count"], 1);
    assert!(library[0]["last_played"].is_string());

    let (status, entries) = request(
        &app,
        Method::GET,
        "/api/history?limit=10",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries.as_array().map(Vec::len), Some(1));
    assert_eq!(entries[0]["song_title"], "Song");
}

#[tokio::test]
async fn test_taste_profile_roundtrip() {
    let (app, _) = test_app("taste", None).await;
    let token = register(&app, "erin@example.com").await;

    let (status, _) =
        request(&app, Method::GET, "/api/profile/taste", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, profile) = request(
        &app,
        Method::PUT,
        "/api/profile/taste",
        Some(&token),
        Some(json!({"profile_data": {"genres": {"pop": 0.9}}, "song_count": 12})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["song_count"], 12);

    let (status, profile) =
        request(&app, Method::GET, "/api/profile/taste", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["profile_data"]["genres"]["pop"], 0.9);
}

#[tokio::test]
async fn test_resolve_video_endpoint() {
    let (app, calls) = test_app("resolve", Some("4NRXx6U8ABQ")).await;
    let token = register(&app, "frank@example.com").await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/video/resolve",
        Some(&token),
        Some(json!({"title": "Blinding Lights", "artists": ["The Weeknd"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["video_id"], "4NRXx6U8ABQ");
    assert!(body["embed_url"]
        .as_str()
        .unwrap()
        .starts_with("https://www.youtube-nocookie.com/embed/4NRXx6U8ABQ?"));
    assert_eq!(
        body["watch_url"],
        "https://www.youtube.com/watch?v=4NRXx6U8ABQ"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let (status, _) = request(
        &app,
        Method::POST,
        "/api/video/resolve",
        Some(&token),
        Some(json!({"title": "   ", "artists": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resolve_video_not_found() {
    let (app, _) = test_app("resolve-miss", None).await;
    let token = register(&app, "grace@example.com").await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/api/video/resolve",
        Some(&token),
        Some(json!({"title": "Obscure B-side", "artists": []})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_song_video_resolves_once_then_uses_stored_id() {
    let (app, calls) = test_app("song-video", Some("dQw4w9WgXcQ")).await;
    let token = register(&app, "heidi@example.com").await;

    let (_, song) = request(
        &app,
        Method::POST,
        "/api/songs",
        Some(&token),
        Some(json!({"title": "Never Gonna Give You Up", "artists": ["Rick Astley"]})),
    )
    .await;
    let song_id = song["song_id"].as_str().unwrap().to_string();

    let uri = format!("/api/songs/{}/video", song_id);
    let (status, body) = request(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["video_id"], "dQw4w9WgXcQ");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Second request serves the persisted ID without touching the backend
    let (status, body) = request(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["video_id"], "dQw4w9WgXcQ");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let (_, song) = request(
        &app,
        Method::GET,
        &format!("/api/songs/{}", song_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(song["youtube_video_id"], "dQw4w9WgXcQ");
}
