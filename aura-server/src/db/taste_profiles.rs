//! Taste profile database operations

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use aura_common::db::models::TasteProfile;
use aura_common::Result;

use super::{parse_datetime, parse_json_value, to_json_text};

/// Insert or replace a user's taste profile; created_at is preserved on
/// update
pub async fn upsert_profile(
    pool: &SqlitePool,
    user_id: &str,
    profile_data: &serde_json::Value,
    song_count: i64,
) -> Result<()> {
    let profile_data = to_json_text("profile_data", profile_data)?;
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO taste_profiles (user_id, profile_data, song_count, created_at, last_updated)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            profile_data = excluded.profile_data,
            song_count = excluded.song_count,
            last_updated = excluded.last_updated
        "#,
    )
    .bind(user_id)
    .bind(&profile_data)
    .bind(song_count)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<TasteProfile>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, profile_data, song_count, created_at, last_updated
        FROM taste_profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let profile_data: String = row.get("profile_data");
            let created_at: String = row.get("created_at");
            let last_updated: String = row.get("last_updated");

            Ok(Some(TasteProfile {
                id: row.get("id"),
                user_id: row.get("user_id"),
                profile_data: parse_json_value("profile_data", &profile_data)?,
                song_count: row.get("song_count"),
                created_at: parse_datetime("created_at", &created_at)?,
                last_updated: parse_datetime("last_updated", &last_updated)?,
            }))
        }
        None => Ok(None),
    }
}
