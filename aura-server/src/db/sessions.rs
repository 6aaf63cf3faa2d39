//! Authentication session database operations

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use aura_common::db::models::Session;
use aura_common::Result;

use super::parse_datetime;

pub async fn create_session(pool: &SqlitePool, session: &Session) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sessions (token, user_id, created_at, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&session.token)
    .bind(&session.user_id)
    .bind(session.created_at.to_rfc3339())
    .bind(session.expires_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Look up a session that has not expired yet
pub async fn get_valid_session(pool: &SqlitePool, token: &str) -> Result<Option<Session>> {
    let row = sqlx::query(
        r#"
        SELECT token, user_id, created_at, expires_at
        FROM sessions
        WHERE token = ? AND expires_at > ?
        "#,
    )
    .bind(token)
    .bind(Utc::now().to_rfc3339())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let created_at: String = row.get("created_at");
            let expires_at: String = row.get("expires_at");
            Ok(Some(Session {
                token: row.get("token"),
                user_id: row.get("user_id"),
                created_at: parse_datetime("created_at", &created_at)?,
                expires_at: parse_datetime("expires_at", &expires_at)?,
            }))
        }
        None => Ok(None),
    }
}

pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}

/// Purge expired sessions; run at startup
pub async fn delete_expired_sessions(pool: &SqlitePool) -> Result<usize> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() as usize)
}
