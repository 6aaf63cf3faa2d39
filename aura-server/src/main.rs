//! aura-server - music recommendation backend
//!
//! HTTP API for accounts, the song catalog, listening history and taste
//! profiles, plus YouTube video resolution for playback.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aura_common::{db::init_database, Config};
use aura_server::services::youtube::YouTubeResolver;
use aura_server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting aura-server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let db_path = config.database_path();
    info!("Database: {}", db_path.display());

    let db_pool = init_database(&db_path).await?;
    info!("Database connection established");

    let purged = aura_server::db::sessions::delete_expired_sessions(&db_pool).await?;
    if purged > 0 {
        info!(purged, "Removed expired sessions");
    }

    let resolver = YouTubeResolver::from_config(&config)?;
    info!("Video search backend: {}", resolver.backend_name());

    let bind_addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(db_pool, config, resolver);
    let app = aura_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
