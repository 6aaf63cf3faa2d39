//! Song catalog database operations

use sqlx::{Row, SqlitePool};

use aura_common::db::models::Song;
use aura_common::Result;

use super::{parse_datetime, parse_json_list, parse_json_value, to_json_text};

/// Insert or update a song by id; created_at is preserved on update
pub async fn upsert_song(pool: &SqlitePool, song: &Song) -> Result<()> {
    let artists = to_json_text("artists", &song.artists)?;
    let genre = to_json_text("genre", &song.genre)?;
    let extra_data = to_json_text("extra_data", &song.extra_data)?;

    sqlx::query(
        r#"
        INSERT INTO songs (
            song_id, title, artists, genre, album, image,
            platform, platform_id, youtube_video_id,
            created_at, last_updated, extra_data
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(song_id) DO UPDATE SET
            title = excluded.title,
            artists = excluded.artists,
            genre = excluded.genre,
            album = excluded.album,
            image = excluded.image,
            platform = excluded.platform,
            platform_id = excluded.platform_id,
            last_updated = excluded.last_updated,
            extra_data = excluded.extra_data
        "#,
    )
    .bind(&song.song_id)
    .bind(&song.title)
    .bind(&artists)
    .bind(&genre)
    .bind(&song.album)
    .bind(&song.image)
    .bind(&song.platform)
    .bind(&song.platform_id)
    .bind(&song.youtube_video_id)
    .bind(song.created_at.to_rfc3339())
    .bind(song.last_updated.to_rfc3339())
    .bind(&extra_data)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_song(pool: &SqlitePool, song_id: &str) -> Result<Option<Song>> {
    let row = sqlx::query(
        r#"
        SELECT song_id, title, artists, genre, album, image,
               platform, platform_id, youtube_video_id,
               created_at, last_updated, extra_data
        FROM songs
        WHERE song_id = ?
        "#,
    )
    .bind(song_id)
    .fetch_optional(pool)
    .await?;

    row.map(decode_song).transpose()
}

/// Persist a resolved video ID on a song
pub async fn set_youtube_video_id(pool: &SqlitePool, song_id: &str, video_id: &str) -> Result<()> {
    sqlx::query("UPDATE songs SET youtube_video_id = ?, last_updated = ? WHERE song_id = ?")
        .bind(video_id)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(song_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub(crate) fn decode_song(row: sqlx::sqlite::SqliteRow) -> Result<Song> {
    let artists: String = row.get("artists");
    let genre: String = row.get("genre");
    let extra_data: String = row.get("extra_data");
    let created_at: String = row.get("created_at");
    let last_updated: String = row.get("last_updated");

    Ok(Song {
        song_id: row.get("song_id"),
        title: row.get("title"),
        artists: parse_json_list("artists", &artists)?,
        genre: parse_json_list("genre", &genre)?,
        album: row.get("album"),
        image: row.get("image"),
        platform: row.get("platform"),
        platform_id: row.get("platform_id"),
        youtube_video_id: row.get("youtube_video_id"),
        created_at: parse_datetime("created_at", &created_at)?,
        last_updated: parse_datetime("last_updated", &last_updated)?,
        extra_data: parse_json_value("extra_data", &extra_data)?,
    })
}
