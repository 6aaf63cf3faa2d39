//! User collection endpoints

use axum::http::HeaderMap;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::db::library::LibraryEntry;
use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

#[derive(Debug, Deserialize, Default)]
pub struct AddToLibraryRequest {
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub is_favorite: bool,
}

/// GET /api/library
pub async fn list_library(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<LibraryEntry>>> {
    let user = super::authenticate(&state, &headers).await?;
    let entries = db::library::list_library(&state.db, &user.user_id).await?;
    Ok(Json(entries))
}

/// POST /api/library/:song_id
pub async fn add_to_library(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(song_id): Path<String>,
    request: Option<Json<AddToLibraryRequest>>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = super::authenticate(&state, &headers).await?;

    if db::songs::get_song(&state.db, &song_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Song not found: {}", song_id)));
    }

    let source = request
        .and_then(|Json(r)| r.source)
        .unwrap_or_else(|| "manual".to_string());
    db::library::add_to_library(&state.db, &user.user_id, &song_id, &source).await?;

    Ok(Json(serde_json::json!({ "status": "added" })))
}

/// POST /api/library/:song_id/favorite
pub async fn set_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(song_id): Path<String>,
    Json(request): Json<FavoriteRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = super::authenticate(&state, &headers).await?;

    let updated =
        db::library::set_favorite(&state.db, &user.user_id, &song_id, request.is_favorite).await?;
    if !updated {
        return Err(ApiError::NotFound(format!(
            "Song not in library: {}",
            song_id
        )));
    }

    Ok(Json(
        serde_json::json!({ "is_favorite": request.is_favorite }),
    ))
}

/// DELETE /api/library/:song_id
pub async fn remove_from_library(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(song_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = super::authenticate(&state, &headers).await?;

    let removed = db::library::remove_from_library(&state.db, &user.user_id, &song_id).await?;
    if !removed {
        return Err(ApiError::NotFound(format!(
            "Song not in library: {}",
            song_id
        )));
    }

    Ok(Json(serde_json::json!({ "status": "removed" })))
}

pub fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/api/library", get(list_library))
        .route(
            "/api/library/:song_id",
            post(add_to_library).delete(remove_from_library),
        )
        .route("/api/library/:song_id/favorite", post(set_favorite))
}
