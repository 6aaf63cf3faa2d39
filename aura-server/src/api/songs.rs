//! Song catalog endpoints

use axum::http::HeaderMap;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use aura_common::db::models::Song;

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

#[derive(Debug, Deserialize)]
pub struct UpsertSongRequest {
    /// Omitted on first insert; a uuid is assigned
    pub song_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub album: Option<String>,
    pub image: Option<String>,
    pub platform: Option<String>,
    pub platform_id: Option<String>,
    #[serde(default)]
    pub extra_data: serde_json::Value,
}

/// POST /api/songs
pub async fn upsert_song(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpsertSongRequest>,
) -> ApiResult<Json<Song>> {
    super::authenticate(&state, &headers).await?;

    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Song title is required".to_string()));
    }

    let song_id = request
        .song_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let now = Utc::now();

    // created_at only applies on first insert; upsert keeps the original
    let existing = db::songs::get_song(&state.db, &song_id).await?;
    let song = Song {
        song_id,
        title: request.title,
        artists: request.artists,
        genre: request.genre,
        album: request.album,
        image: request.image,
        platform: request.platform.unwrap_or_else(|| "unknown".to_string()),
        platform_id: request.platform_id,
        youtube_video_id: existing.as_ref().and_then(|s| s.youtube_video_id.clone()),
        created_at: existing.map(|s| s.created_at).unwrap_or(now),
        last_updated: now,
        extra_data: request.extra_data,
    };
    db::songs::upsert_song(&state.db, &song).await?;

    Ok(Json(song))
}

/// GET /api/songs/:song_id
pub async fn get_song(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(song_id): Path<String>,
) -> ApiResult<Json<Song>> {
    super::authenticate(&state, &headers).await?;

    let song = db::songs::get_song(&state.db, &song_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Song not found: {}", song_id)))?;

    Ok(Json(song))
}

pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/api/songs", post(upsert_song))
        .route("/api/songs/:song_id", get(get_song))
}
