//! Integration tests for the per-entity query layer
//!
//! Uses file-backed temp SQLite databases so PRAGMA and pool behavior
//! match production.

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;

use aura_common::db::init_database;
use aura_common::db::models::{ListeningHistoryEntry, Session, Song, User};
use aura_server::db;

fn temp_db_path(name: &str) -> PathBuf {
    PathBuf::from(format!(
        "/tmp/aura-server-test-{}-{}.db",
        name,
        std::process::id()
    ))
}

async fn test_pool(name: &str) -> SqlitePool {
    let path = temp_db_path(name);
    let _ = std::fs::remove_file(&path);
    init_database(&path).await.expect("init database")
}

fn test_user(n: u32) -> User {
    User {
        user_id: format!("user-{}", n),
        email: format!("user{}@example.com", n),
        name: Some(format!("User {}", n)),
        password_hash: "salt$hash".to_string(),
        created_at: Utc::now(),
        last_login: None,
        profile: serde_json::json!({}),
    }
}

fn test_song(id: &str, title: &str, artists: &[&str]) -> Song {
    Song {
        song_id: id.to_string(),
        title: title.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
        genre: vec!["pop".to_string()],
        album: None,
        image: None,
        platform: "spotify".to_string(),
        platform_id: None,
        youtube_video_id: None,
        created_at: Utc::now(),
        last_updated: Utc::now(),
        extra_data: serde_json::json!({}),
    }
}

#[tokio::test]
async fn test_user_roundtrip_and_duplicate_email() {
    let pool = test_pool("users").await;

    let user = test_user(1);
    db::users::create_user(&pool, &user).await.unwrap();

    let by_email = db::users::get_user_by_email(&pool, "user1@example.com")
        .await
        .unwrap()
        .expect("user by email");
    assert_eq!(by_email.user_id, "user-1");
    assert_eq!(by_email.name.as_deref(), Some("User 1"));
    assert!(by_email.last_login.is_none());

    let mut duplicate = test_user(2);
    duplicate.email = "user1@example.com".to_string();
    assert!(db::users::create_user(&pool, &duplicate).await.is_err());

    db::users::update_last_login(&pool, "user-1").await.unwrap();
    let updated = db::users::get_user_by_id(&pool, "user-1")
        .await
        .unwrap()
        .expect("user by id");
    assert!(updated.last_login.is_some());
}

#[tokio::test]
async fn test_session_expiry_filtering() {
    let pool = test_pool("sessions").await;
    db::users::create_user(&pool, &test_user(1)).await.unwrap();

    let now = Utc::now();
    let live = Session {
        token: "live-token".to_string(),
        user_id: "user-1".to_string(),
        created_at: now,
        expires_at: now + Duration::days(7),
    };
    let expired = Session {
        token: "expired-token".to_string(),
        user_id: "user-1".to_string(),
        created_at: now - Duration::days(8),
        expires_at: now - Duration::days(1),
    };
    db::sessions::create_session(&pool, &live).await.unwrap();
    db::sessions::create_session(&pool, &expired).await.unwrap();

    assert!(db::sessions::get_valid_session(&pool, "live-token")
        .await
        .unwrap()
        .is_some());
    assert!(db::sessions::get_valid_session(&pool, "expired-token")
        .await
        .unwrap()
        .is_none());

    let purged = db::sessions::delete_expired_sessions(&pool).await.unwrap();
    assert_eq!(purged, 1);

    db::sessions::delete_session(&pool, "live-token")
        .await
        .unwrap();
    assert!(db::sessions::get_valid_session(&pool, "live-token")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_song_upsert_preserves_video_id() {
    let pool = test_pool("songs").await;

    let song = test_song("song-1", "Blinding Lights", &["The Weeknd"]);
    db::songs::upsert_song(&pool, &song).await.unwrap();

    db::songs::set_youtube_video_id(&pool, "song-1", "4NRXx6U8ABQ")
        .await
        .unwrap();

    // Metadata update must not clobber the resolved video ID
    let mut updated = song.clone();
    updated.album = Some("After Hours".to_string());
    updated.youtube_video_id = None;
    db::songs::upsert_song(&pool, &updated).await.unwrap();

    let stored = db::songs::get_song(&pool, "song-1")
        .await
        .unwrap()
        .expect("song");
    assert_eq!(stored.album.as_deref(), Some("After Hours"));
    assert_eq!(stored.youtube_video_id.as_deref(), Some("4NRXx6U8ABQ"));
    assert_eq!(stored.artists, vec!["The Weeknd"]);
}

#[tokio::test]
async fn test_library_add_favorite_play_remove() {
    let pool = test_pool("library").await;
    db::users::create_user(&pool, &test_user(1)).await.unwrap();
    db::songs::upsert_song(&pool, &test_song("song-1", "Song One", &["A"]))
        .await
        .unwrap();

    db::library::add_to_library(&pool, "user-1", "song-1", "manual")
        .await
        .unwrap();
    // Re-adding is a no-op, not an error
    db::library::add_to_library(&pool, "user-1", "song-1", "import")
        .await
        .unwrap();

    let entry = db::library::get_user_song(&pool, "user-1", "song-1")
        .await
        .unwrap()
        .expect("user song");
    assert_eq!(entry.source, "manual");
    assert_eq!(entry.play_count, 0);
    assert!(!entry.is_favorite);

    assert!(db::library::set_favorite(&pool, "user-1", "song-1", true)
        .await
        .unwrap());
    db::library::record_play(&pool, "user-1", "song-1")
        .await
        .unwrap();
    db::library::record_play(&pool, "user-1", "song-1")
        .await
        .unwrap();

    let entry = db::library::get_user_song(&pool, "user-1", "song-1")
        .await
        .unwrap()
        .expect("user song");
    assert!(entry.is_favorite);
    assert_eq!(entry.play_count, 2);
    assert!(entry.last_played.is_some());

    let listed = db::library::list_library(&pool, "user-1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].song.title, "Song One");
    assert_eq!(listed[0].play_count, 2);

    assert!(db::library::remove_from_library(&pool, "user-1", "song-1")
        .await
        .unwrap());
    assert!(!db::library::remove_from_library(&pool, "user-1", "song-1")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_history_newest_first_with_limit() {
    let pool = test_pool("history").await;
    db::users::create_user(&pool, &test_user(1)).await.unwrap();

    for i in 0..5 {
        let entry = ListeningHistoryEntry {
            id: 0,
            user_id: "user-1".to_string(),
            song_id: None,
            song_title: format!("Song {}", i),
            artists: vec!["A".to_string()],
            timestamp: Utc::now() - Duration::minutes(10 - i),
            source: "recommendation".to_string(),
            platform: None,
            duration_seconds: Some(180.0),
            completed: i % 2 == 0,
            extra_data: serde_json::json!({}),
        };
        db::history::record_entry(&pool, &entry).await.unwrap();
    }

    let entries = db::history::list_history(&pool, "user-1", 3).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].song_title, "Song 4");
    assert_eq!(entries[2].song_title, "Song 2");
}

#[tokio::test]
async fn test_history_survives_song_deletion() {
    let pool = test_pool("history-orphan").await;
    db::users::create_user(&pool, &test_user(1)).await.unwrap();
    db::songs::upsert_song(&pool, &test_song("song-1", "Ephemeral", &["B"]))
        .await
        .unwrap();

    let entry = ListeningHistoryEntry {
        id: 0,
        user_id: "user-1".to_string(),
        song_id: Some("song-1".to_string()),
        song_title: "Ephemeral".to_string(),
        artists: vec!["B".to_string()],
        timestamp: Utc::now(),
        source: "recommendation".to_string(),
        platform: None,
        duration_seconds: None,
        completed: true,
        extra_data: serde_json::json!({}),
    };
    db::history::record_entry(&pool, &entry).await.unwrap();

    sqlx::query("DELETE FROM songs WHERE song_id = 'song-1'")
        .execute(&pool)
        .await
        .unwrap();

    let entries = db::history::list_history(&pool, "user-1", 10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].song_id, None);
    assert_eq!(entries[0].song_title, "Ephemeral");
}

#[tokio::test]
async fn test_taste_profile_upsert() {
    let pool = test_pool("taste").await;
    db::users::create_user(&pool, &test_user(1)).await.unwrap();

    assert!(db::taste_profiles::get_profile(&pool, "user-1")
        .await
        .unwrap()
        .is_none());

    db::taste_profiles::upsert_profile(
        &pool,
        "user-1",
        &serde_json::json!({"genres": {"pop": 0.8}}),
        10,
    )
    .await
    .unwrap();

    let first = db::taste_profiles::get_profile(&pool, "user-1")
        .await
        .unwrap()
        .expect("profile");
    assert_eq!(first.song_count, 10);

    db::taste_profiles::upsert_profile(
        &pool,
        "user-1",
        &serde_json::json!({"genres": {"pop": 0.6, "rock": 0.3}}),
        25,
    )
    .await
    .unwrap();

    let second = db::taste_profiles::get_profile(&pool, "user-1")
        .await
        .unwrap()
        .expect("profile");
    assert_eq!(second.id, first.id);
    assert_eq!(second.song_count, 25);
    assert_eq!(second.profile_data["genres"]["rock"], 0.3);
}
