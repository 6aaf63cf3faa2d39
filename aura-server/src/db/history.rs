//! Listening history database operations

use sqlx::{Row, SqlitePool};

use aura_common::db::models::ListeningHistoryEntry;
use aura_common::Result;

use super::{parse_datetime, parse_json_list, parse_json_value, to_json_text};

/// Record one listening event; returns the row id
pub async fn record_entry(pool: &SqlitePool, entry: &ListeningHistoryEntry) -> Result<i64> {
    let artists = to_json_text("artists", &entry.artists)?;
    let extra_data = to_json_text("extra_data", &entry.extra_data)?;

    let result = sqlx::query(
        r#"
        INSERT INTO listening_history (
            user_id, song_id, song_title, artists, timestamp,
            source, platform, duration_seconds, completed, extra_data
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.user_id)
    .bind(&entry.song_id)
    .bind(&entry.song_title)
    .bind(&artists)
    .bind(entry.timestamp.to_rfc3339())
    .bind(&entry.source)
    .bind(&entry.platform)
    .bind(entry.duration_seconds)
    .bind(entry.completed)
    .bind(&extra_data)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Newest entries first, capped at `limit`
pub async fn list_history(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<ListeningHistoryEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, song_id, song_title, artists, timestamp,
               source, platform, duration_seconds, completed, extra_data
        FROM listening_history
        WHERE user_id = ?
        ORDER BY timestamp DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let artists: String = row.get("artists");
        let timestamp: String = row.get("timestamp");
        let extra_data: String = row.get("extra_data");

        entries.push(ListeningHistoryEntry {
            id: row.get("id"),
            user_id: row.get("user_id"),
            song_id: row.get("song_id"),
            song_title: row.get("song_title"),
            artists: parse_json_list("artists", &artists)?,
            timestamp: parse_datetime("timestamp", &timestamp)?,
            source: row.get("source"),
            platform: row.get("platform"),
            duration_seconds: row.get("duration_seconds"),
            completed: row.get("completed"),
            extra_data: parse_json_value("extra_data", &extra_data)?,
        });
    }

    Ok(entries)
}
