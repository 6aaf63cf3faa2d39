//! HTTP API handlers
//!
//! One module per route area; each exposes a `*_routes()` builder merged in
//! `build_router`. Authenticated routes carry a session token in the
//! `Authorization: Bearer <token>` header.

pub mod auth;
pub mod health;
pub mod history;
pub mod library;
pub mod profile;
pub mod songs;
pub mod video;

pub use auth::auth_routes;
pub use health::health_routes;
pub use history::history_routes;
pub use library::library_routes;
pub use profile::profile_routes;
pub use songs::song_routes;
pub use video::video_routes;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use aura_common::db::models::User;

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> ApiResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;
    let value = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Malformed Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))
}

/// Resolve the session token to its user, rejecting expired sessions
pub(crate) async fn authenticate(state: &AppState, headers: &HeaderMap) -> ApiResult<User> {
    let token = bearer_token(headers)?;

    let session = db::sessions::get_valid_session(&state.db, token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

    db::users::get_user_by_id(&state.db, &session.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session user no longer exists".to_string()))
}
