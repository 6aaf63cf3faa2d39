//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up with
//! idempotent `CREATE TABLE IF NOT EXISTS` statements. Dates are stored as
//! RFC 3339 text, list/object columns as JSON text.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Connection options apply to every pooled connection; a plain PRAGMA
    // query would only reach one of them. WAL allows concurrent readers
    // with one writer.
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Run migrations (idempotent - safe to call multiple times)
    create_users_table(&pool).await?;
    create_sessions_table(&pool).await?;
    create_songs_table(&pool).await?;
    create_user_songs_table(&pool).await?;
    create_listening_history_table(&pool).await?;
    create_taste_profiles_table(&pool).await?;

    Ok(pool)
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL,
            last_login TEXT,
            profile TEXT NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            song_id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            artists TEXT NOT NULL DEFAULT '[]',
            genre TEXT NOT NULL DEFAULT '[]',
            album TEXT,
            image TEXT,
            platform TEXT NOT NULL DEFAULT 'unknown',
            platform_id TEXT,
            youtube_video_id TEXT,
            created_at TEXT NOT NULL,
            last_updated TEXT NOT NULL,
            extra_data TEXT NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_title ON songs(title)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_user_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
            song_id TEXT NOT NULL REFERENCES songs(song_id) ON DELETE CASCADE,
            source TEXT NOT NULL DEFAULT 'manual',
            added_at TEXT NOT NULL,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            play_count INTEGER NOT NULL DEFAULT 0,
            last_played TEXT,
            UNIQUE(user_id, song_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_songs_user_id ON user_songs(user_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_songs_song_id ON user_songs(song_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_listening_history_table(pool: &SqlitePool) -> Result<()> {
    // song_title and artists are snapshots; history entries outlive songs
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS listening_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
            song_id TEXT REFERENCES songs(song_id) ON DELETE SET NULL,
            song_title TEXT NOT NULL,
            artists TEXT NOT NULL DEFAULT '[]',
            timestamp TEXT NOT NULL,
            source TEXT NOT NULL DEFAULT 'recommendation',
            platform TEXT,
            duration_seconds REAL,
            completed INTEGER NOT NULL DEFAULT 0,
            extra_data TEXT NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_listening_history_user_id ON listening_history(user_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_listening_history_timestamp ON listening_history(timestamp)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_taste_profiles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS taste_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL UNIQUE REFERENCES users(user_id) ON DELETE CASCADE,
            profile_data TEXT NOT NULL,
            song_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            last_updated TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
