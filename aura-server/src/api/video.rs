//! Video resolution endpoints
//!
//! `GET /api/songs/:song_id/video` prefers the song's stored video ID and
//! falls back to live resolution, persisting the result. `POST
//! /api/video/resolve` resolves a (title, artists) pair directly without
//! touching the catalog.

use axum::http::HeaderMap;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::services::youtube::SongQuery;
use crate::{db, AppState};

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub video_id: String,
    pub embed_url: String,
    pub watch_url: String,
}

impl VideoResponse {
    fn build(state: &AppState, video_id: String) -> Self {
        let embed_url = state.resolver.embed_url(&video_id);
        let watch_url = state.resolver.watch_url(&video_id);
        Self {
            video_id,
            embed_url,
            watch_url,
        }
    }
}

/// GET /api/songs/:song_id/video
pub async fn song_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(song_id): Path<String>,
) -> ApiResult<Json<VideoResponse>> {
    super::authenticate(&state, &headers).await?;

    let song = db::songs::get_song(&state.db, &song_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Song not found: {}", song_id)))?;

    if let Some(video_id) = song.youtube_video_id {
        return Ok(Json(VideoResponse::build(&state, video_id)));
    }

    let query = SongQuery::new(song.title.clone(), song.artists.clone());
    let video_id = state
        .resolver
        .search_video_id(&query)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("No video found for song: {}", song_id)))?;

    db::songs::set_youtube_video_id(&state.db, &song_id, &video_id).await?;
    info!(song_id = %song_id, video_id = %video_id, "Persisted resolved video ID");

    Ok(Json(VideoResponse::build(&state, video_id)))
}

/// POST /api/video/resolve
pub async fn resolve_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ResolveRequest>,
) -> ApiResult<Json<VideoResponse>> {
    super::authenticate(&state, &headers).await?;

    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let query = SongQuery::new(request.title, request.artists);
    let video_id = state
        .resolver
        .search_video_id(&query)
        .await
        .ok_or_else(|| ApiError::NotFound("No video found".to_string()))?;

    Ok(Json(VideoResponse::build(&state, video_id)))
}

pub fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/api/songs/:song_id/video", get(song_video))
        .route("/api/video/resolve", post(resolve_video))
}
