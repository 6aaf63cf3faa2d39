//! Taste profile endpoints

use axum::http::HeaderMap;
use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;

use aura_common::db::models::TasteProfile;

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

#[derive(Debug, Deserialize)]
pub struct UpdateTasteProfileRequest {
    pub profile_data: serde_json::Value,
    pub song_count: Option<i64>,
}

/// GET /api/profile/taste
pub async fn get_taste_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<TasteProfile>> {
    let user = super::authenticate(&state, &headers).await?;

    let profile = db::taste_profiles::get_profile(&state.db, &user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No taste profile yet".to_string()))?;

    Ok(Json(profile))
}

/// PUT /api/profile/taste
pub async fn update_taste_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateTasteProfileRequest>,
) -> ApiResult<Json<TasteProfile>> {
    let user = super::authenticate(&state, &headers).await?;

    if !request.profile_data.is_object() {
        return Err(ApiError::BadRequest(
            "profile_data must be a JSON object".to_string(),
        ));
    }

    db::taste_profiles::upsert_profile(
        &state.db,
        &user.user_id,
        &request.profile_data,
        request.song_count.unwrap_or(0),
    )
    .await?;

    let profile = db::taste_profiles::get_profile(&state.db, &user.user_id)
        .await?
        .ok_or_else(|| {
            ApiError::Internal("Taste profile missing immediately after upsert".to_string())
        })?;

    Ok(Json(profile))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/api/profile/taste",
        get(get_taste_profile).put(update_taste_profile),
    )
}
