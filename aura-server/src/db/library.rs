//! User library (collection) database operations

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use aura_common::db::models::{Song, UserSong};
use aura_common::Result;

use super::{parse_datetime, parse_opt_datetime};

/// Add a song to a user's collection; re-adding is a no-op
pub async fn add_to_library(
    pool: &SqlitePool,
    user_id: &str,
    song_id: &str,
    source: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_songs (user_id, song_id, source, added_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id, song_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(song_id)
    .bind(source)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn remove_from_library(pool: &SqlitePool, user_id: &str, song_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM user_songs WHERE user_id = ? AND song_id = ?")
        .bind(user_id)
        .bind(song_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_favorite(
    pool: &SqlitePool,
    user_id: &str,
    song_id: &str,
    is_favorite: bool,
) -> Result<bool> {
    let result =
        sqlx::query("UPDATE user_songs SET is_favorite = ? WHERE user_id = ? AND song_id = ?")
            .bind(is_favorite)
            .bind(user_id)
            .bind(song_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Bump play statistics after a listening event; no-op when the song is
/// not in the user's collection
pub async fn record_play(pool: &SqlitePool, user_id: &str, song_id: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE user_songs
        SET play_count = play_count + 1, last_played = ?
        WHERE user_id = ? AND song_id = ?
        "#,
    )
    .bind(Utc::now().to_rfc3339())
    .bind(user_id)
    .bind(song_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// A song joined with its per-user collection row
#[derive(Debug, Clone, serde::Serialize)]
pub struct LibraryEntry {
    #[serde(flatten)]
    pub song: Song,
    pub source: String,
    pub added_at: chrono::DateTime<Utc>,
    pub is_favorite: bool,
    pub play_count: i64,
    pub last_played: Option<chrono::DateTime<Utc>>,
}

/// List a user's collection, most recently added first
pub async fn list_library(pool: &SqlitePool, user_id: &str) -> Result<Vec<LibraryEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT s.song_id, s.title, s.artists, s.genre, s.album, s.image,
               s.platform, s.platform_id, s.youtube_video_id,
               s.created_at, s.last_updated, s.extra_data,
               us.source, us.added_at, us.is_favorite, us.play_count, us.last_played
        FROM user_songs us
        JOIN songs s ON s.song_id = us.song_id
        WHERE us.user_id = ?
        ORDER BY us.added_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let added_at: String = row.get("added_at");
        let last_played: Option<String> = row.get("last_played");
        let source: String = row.get("source");
        let is_favorite: bool = row.get("is_favorite");
        let play_count: i64 = row.get("play_count");

        entries.push(LibraryEntry {
            song: super::songs::decode_song(row)?,
            source,
            added_at: parse_datetime("added_at", &added_at)?,
            is_favorite,
            play_count,
            last_played: parse_opt_datetime("last_played", last_played)?,
        });
    }

    Ok(entries)
}

/// Fetch a single collection row, without the song join
pub async fn get_user_song(
    pool: &SqlitePool,
    user_id: &str,
    song_id: &str,
) -> Result<Option<UserSong>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, song_id, source, added_at, is_favorite, play_count, last_played
        FROM user_songs
        WHERE user_id = ? AND song_id = ?
        "#,
    )
    .bind(user_id)
    .bind(song_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let added_at: String = row.get("added_at");
            let last_played: Option<String> = row.get("last_played");
            Ok(Some(UserSong {
                id: row.get("id"),
                user_id: row.get("user_id"),
                song_id: row.get("song_id"),
                source: row.get("source"),
                added_at: parse_datetime("added_at", &added_at)?,
                is_favorite: row.get("is_favorite"),
                play_count: row.get("play_count"),
                last_played: parse_opt_datetime("last_played", last_played)?,
            }))
        }
        None => Ok(None),
    }
}
