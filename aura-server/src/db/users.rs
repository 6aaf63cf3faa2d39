//! User account database operations

use sqlx::{Row, SqlitePool};

use aura_common::db::models::User;
use aura_common::Result;

use super::{parse_datetime, parse_json_value, parse_opt_datetime, to_json_text};

/// Insert a new user; fails on duplicate email
pub async fn create_user(pool: &SqlitePool, user: &User) -> Result<()> {
    let created_at = user.created_at.to_rfc3339();
    let last_login = user.last_login.map(|dt| dt.to_rfc3339());
    let profile = to_json_text("profile", &user.profile)?;

    sqlx::query(
        r#"
        INSERT INTO users (user_id, email, name, password_hash, created_at, last_login, profile)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.user_id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.password_hash)
    .bind(&created_at)
    .bind(&last_login)
    .bind(&profile)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, email, name, password_hash, created_at, last_login, profile
        FROM users
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(decode_user).transpose()
}

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, email, name, password_hash, created_at, last_login, profile
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(decode_user).transpose()
}

/// Stamp last_login on successful authentication
pub async fn update_last_login(pool: &SqlitePool, user_id: &str) -> Result<()> {
    sqlx::query("UPDATE users SET last_login = ? WHERE user_id = ?")
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

fn decode_user(row: sqlx::sqlite::SqliteRow) -> Result<User> {
    let created_at: String = row.get("created_at");
    let last_login: Option<String> = row.get("last_login");
    let profile: String = row.get("profile");

    Ok(User {
        user_id: row.get("user_id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        created_at: parse_datetime("created_at", &created_at)?,
        last_login: parse_opt_datetime("last_login", last_login)?,
        profile: parse_json_value("profile", &profile)?,
    })
}
