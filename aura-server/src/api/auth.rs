//! Account registration, login and session endpoints

use axum::http::HeaderMap;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use aura_common::auth::{generate_token, hash_password, verify_password};
use aura_common::db::models::{Session, User};

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// Sessions outlive the login by one week
const SESSION_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    if request.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if db::users::get_user_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let user = User {
        user_id: Uuid::new_v4().to_string(),
        email,
        name: request.name,
        password_hash: hash_password(&request.password),
        created_at: Utc::now(),
        last_login: None,
        profile: serde_json::json!({}),
    };
    db::users::create_user(&state.db, &user).await?;
    info!(user_id = %user.user_id, "Registered new user");

    let session = issue_session(&state, &user.user_id).await?;
    Ok(Json(AuthResponse {
        token: session.token,
        user,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = request.email.trim().to_lowercase();

    let user = db::users::get_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    db::users::update_last_login(&state.db, &user.user_id).await?;
    let user = db::users::get_user_by_id(&state.db, &user.user_id)
        .await?
        .ok_or_else(|| ApiError::Internal("User vanished during login".to_string()))?;
    let session = issue_session(&state, &user.user_id).await?;
    info!(user_id = %user.user_id, "User logged in");

    Ok(Json(AuthResponse {
        token: session.token,
        user,
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    // Authenticate first so an invalid token is reported, not silently
    // accepted
    super::authenticate(&state, &headers).await?;

    if let Some(token) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        db::sessions::delete_session(&state.db, token).await?;
    }

    Ok(Json(serde_json::json!({ "status": "logged_out" })))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<User>> {
    let user = super::authenticate(&state, &headers).await?;
    Ok(Json(user))
}

async fn issue_session(state: &AppState, user_id: &str) -> ApiResult<Session> {
    let now = Utc::now();
    let session = Session {
        token: generate_token(),
        user_id: user_id.to_string(),
        created_at: now,
        expires_at: now + Duration::days(SESSION_LIFETIME_DAYS),
    };
    db::sessions::create_session(&state.db, &session).await?;
    Ok(session)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}
