//! Playlist database queries.
//!
//! Playlist markup is stored pre-rendered: `items`, `prefetch` and
//! `exclusive` columns hold SMIL fragments that may contain sub-playlist
//! placeholders.

use playout_common::{Error, PlaylistId, PlaylistMode, Result, Zones};
use rusqlite::{Connection, OptionalExtension};

use crate::models::{Playlist, PlaylistContent};

/// Create a new, empty playlist.
///
/// # Returns
///
/// * `Ok(Playlist)` - The created playlist
/// * `Err(Error)` - If a database error occurs
pub fn create_playlist(
    conn: &Connection,
    name: &str,
    mode: PlaylistMode,
    duration: u64,
) -> Result<Playlist> {
    conn.execute(
        "INSERT INTO playlists (playlist_name, playlist_mode, duration)
         VALUES (:name, :mode, :duration)",
        rusqlite::named_params! {
            ":name": name,
            ":mode": mode.to_string(),
            ":duration": duration as i64,
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Playlist {
        id: PlaylistId::from(conn.last_insert_rowid()),
        name: name.to_string(),
        mode,
        duration,
    })
}

/// Replace the stored markup of a playlist.
pub fn set_content(conn: &Connection, id: PlaylistId, content: &PlaylistContent) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE playlists
             SET items = :items, prefetch = :prefetch, exclusive = :exclusive,
                 updated_at = datetime('now')
             WHERE playlist_id = :id",
            rusqlite::named_params! {
                ":items": content.items,
                ":prefetch": content.prefetch,
                ":exclusive": content.exclusive,
                ":id": id.get(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if updated == 0 {
        return Err(Error::not_found(format!("playlist {}", id)));
    }
    Ok(())
}

/// Store the multizone layout of a playlist.
pub fn set_zones(conn: &Connection, id: PlaylistId, zones: &Zones) -> Result<()> {
    let json = serde_json::to_string(zones).map_err(|e| Error::internal(e.to_string()))?;
    let updated = conn
        .execute(
            "UPDATE playlists SET multizone = :zones WHERE playlist_id = :id",
            rusqlite::named_params! { ":zones": json, ":id": id.get() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if updated == 0 {
        return Err(Error::not_found(format!("playlist {}", id)));
    }
    Ok(())
}

/// Get the stored markup of a playlist.
///
/// # Returns
///
/// * `Ok(Some(PlaylistContent))` - The markup if the playlist exists
/// * `Ok(None)` - If the playlist does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_content(conn: &Connection, id: PlaylistId) -> Result<Option<PlaylistContent>> {
    conn.query_row(
        "SELECT items, prefetch, exclusive FROM playlists WHERE playlist_id = :id",
        rusqlite::named_params! { ":id": id.get() },
        |row| {
            Ok(PlaylistContent {
                items: row.get(0)?,
                prefetch: row.get(1)?,
                exclusive: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Get playlist metadata by id.
pub fn get_playlist(conn: &Connection, id: PlaylistId) -> Result<Option<Playlist>> {
    let row = conn
        .query_row(
            "SELECT playlist_id, playlist_name, playlist_mode, duration
             FROM playlists WHERE playlist_id = :id",
            rusqlite::named_params! { ":id": id.get() },
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )
        .optional()
        .map_err(|e| Error::database(e.to_string()))?;

    row.map(|(id, name, mode, duration)| {
        Ok(Playlist {
            id: PlaylistId::from(id),
            name,
            mode: mode.parse().map_err(Error::database)?,
            duration: duration.max(0) as u64,
        })
    })
    .transpose()
}
