//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    /// User preferences and settings (free-form JSON)
    pub profile: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub song_id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub genre: Vec<String>,
    pub album: Option<String>,
    pub image: Option<String>,
    pub platform: String,
    pub platform_id: Option<String>,
    pub youtube_video_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub extra_data: serde_json::Value,
}

/// A song in a user's collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSong {
    pub id: i64,
    pub user_id: String,
    pub song_id: String,
    pub source: String,
    pub added_at: DateTime<Utc>,
    pub is_favorite: bool,
    pub play_count: i64,
    pub last_played: Option<DateTime<Utc>>,
}

/// One listening event; title and artists are snapshotted so the entry
/// survives song deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListeningHistoryEntry {
    pub id: i64,
    pub user_id: String,
    pub song_id: Option<String>,
    pub song_title: String,
    pub artists: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub platform: Option<String>,
    pub duration_seconds: Option<f64>,
    pub completed: bool,
    pub extra_data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasteProfile {
    pub id: i64,
    pub user_id: String,
    /// Taste vector and preference weights (free-form JSON)
    pub profile_data: serde_json::Value,
    pub song_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}
