//! Listening history endpoints

use axum::http::HeaderMap;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use aura_common::db::models::ListeningHistoryEntry;

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct RecordHistoryRequest {
    pub song_id: Option<String>,
    pub song_title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    pub source: Option<String>,
    pub platform: Option<String>,
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub extra_data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// POST /api/history
///
/// Records a listening event. When the song is in the user's collection
/// its play_count and last_played are bumped as well.
pub async fn record_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RecordHistoryRequest>,
) -> ApiResult<Json<ListeningHistoryEntry>> {
    let user = super::authenticate(&state, &headers).await?;

    if request.song_title.trim().is_empty() {
        return Err(ApiError::BadRequest("song_title is required".to_string()));
    }

    // A stale song_id should not fail the whole event; the entry carries
    // its own title/artist snapshot
    let song_id = match &request.song_id {
        Some(id) => db::songs::get_song(&state.db, id)
            .await?
            .map(|s| s.song_id),
        None => None,
    };

    let mut entry = ListeningHistoryEntry {
        id: 0,
        user_id: user.user_id.clone(),
        song_id: song_id.clone(),
        song_title: request.song_title,
        artists: request.artists,
        timestamp: Utc::now(),
        source: request.source.unwrap_or_else(|| "recommendation".to_string()),
        platform: request.platform,
        duration_seconds: request.duration_seconds,
        completed: request.completed,
        extra_data: request.extra_data,
    };
    entry.id = db::history::record_entry(&state.db, &entry).await?;

    if let Some(song_id) = &song_id {
        db::library::record_play(&state.db, &user.user_id, song_id).await?;
    }

    Ok(Json(entry))
}

/// GET /api/history?limit=N
pub async fn list_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<ListeningHistoryEntry>>> {
    let user = super::authenticate(&state, &headers).await?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let entries = db::history::list_history(&state.db, &user.user_id, limit).await?;

    Ok(Json(entries))
}

pub fn history_routes() -> Router<AppState> {
    Router::new().route("/api/history", get(list_history).post(record_history))
}
