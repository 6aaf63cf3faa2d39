//! aura-server library interface
//!
//! Exposes the router and state for integration testing.

pub mod api;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use aura_common::Config;

use crate::services::youtube::YouTubeResolver;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved configuration, read-only after startup
    pub config: Arc<Config>,
    /// Video resolver, constructed once at startup
    pub resolver: Arc<YouTubeResolver>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config, resolver: YouTubeResolver) -> Self {
        Self {
            db,
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::auth_routes())
        .merge(api::song_routes())
        .merge(api::library_routes())
        .merge(api::history_routes())
        .merge(api::profile_routes())
        .merge(api::video_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
