//! Player database queries.
//!
//! A player row is joined with its assigned playlist to produce the
//! [`Player`] entity the index compiler consumes.

use playout_common::{
    Error, Player, PlayerModel, PlayerProperties, PlayerStatus, PlaylistId, PlaylistMode,
    ReportFlags, Result, ScreenTimeDay, Zones,
};
use rusqlite::{Connection, OptionalExtension, Row};

const PLAYER_SELECT: &str = "SELECT p.uuid, p.player_name, p.firmware, p.model, p.status,
        p.playlist_id, p.refresh, p.commands, p.reports, p.screen_times, p.width, p.height,
        pl.playlist_name, pl.playlist_mode, pl.duration, pl.multizone
     FROM players p
     LEFT JOIN playlists pl ON pl.playlist_id = p.playlist_id";

/// Get a player by device uuid.
///
/// # Returns
///
/// * `Ok(Some(Player))` - The player if known
/// * `Ok(None)` - If the device has never been seen
/// * `Err(Error)` - If a database error occurs or a stored column is malformed
pub fn get_player(conn: &Connection, uuid: &str) -> Result<Option<Player>> {
    let sql = format!("{} WHERE p.uuid = :uuid", PLAYER_SELECT);
    let row = conn
        .query_row(&sql, rusqlite::named_params! { ":uuid": uuid }, PlayerRow::from_row)
        .optional()
        .map_err(|e| Error::database(e.to_string()))?;

    row.map(PlayerRow::into_player).transpose()
}

/// Insert a newly seen device as unregistered.
///
/// Registering a uuid that already exists leaves the stored row untouched.
pub fn register_player(
    conn: &Connection,
    uuid: &str,
    name: &str,
    firmware: &str,
    model: PlayerModel,
) -> Result<Player> {
    conn.execute(
        "INSERT OR IGNORE INTO players (uuid, player_name, firmware, model, status)
         VALUES (:uuid, :name, :firmware, :model, :status)",
        rusqlite::named_params! {
            ":uuid": uuid,
            ":name": name,
            ":firmware": firmware,
            ":model": model.as_str(),
            ":status": PlayerStatus::Unregistered.code(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    get_player(conn, uuid)?.ok_or_else(|| Error::not_found(format!("player {}", uuid)))
}

/// Record a poll: refresh firmware and model as reported by the device.
pub fn touch_player(conn: &Connection, uuid: &str, firmware: &str, model: PlayerModel) -> Result<()> {
    conn.execute(
        "UPDATE players SET firmware = :firmware, model = :model, last_access = datetime('now')
         WHERE uuid = :uuid",
        rusqlite::named_params! {
            ":firmware": firmware,
            ":model": model.as_str(),
            ":uuid": uuid,
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// Change the lifecycle status of a player.
pub fn set_status(conn: &Connection, uuid: &str, status: PlayerStatus) -> Result<()> {
    update_one(
        conn,
        uuid,
        "UPDATE players SET status = :value WHERE uuid = :uuid",
        status.code(),
    )
}

/// Assign a playlist to a player (`PlaylistId::NONE` unassigns).
pub fn assign_playlist(conn: &Connection, uuid: &str, playlist_id: PlaylistId) -> Result<()> {
    update_one(
        conn,
        uuid,
        "UPDATE players SET playlist_id = :value WHERE uuid = :uuid",
        playlist_id.get(),
    )
}

/// Set the poll interval in seconds.
pub fn set_refresh(conn: &Connection, uuid: &str, refresh: u64) -> Result<()> {
    update_one(
        conn,
        uuid,
        "UPDATE players SET refresh = :value WHERE uuid = :uuid",
        refresh as i64,
    )
}

/// Replace the pending remote commands.
pub fn set_commands(conn: &Connection, uuid: &str, commands: &[String]) -> Result<()> {
    let json = serde_json::to_string(commands).map_err(|e| Error::internal(e.to_string()))?;
    update_one(
        conn,
        uuid,
        "UPDATE players SET commands = :value WHERE uuid = :uuid",
        json,
    )
}

/// Replace the enabled report flags.
pub fn set_reports(conn: &Connection, uuid: &str, reports: &ReportFlags) -> Result<()> {
    let json = serde_json::to_string(reports).map_err(|e| Error::internal(e.to_string()))?;
    update_one(
        conn,
        uuid,
        "UPDATE players SET reports = :value WHERE uuid = :uuid",
        json,
    )
}

/// Replace the weekly screen schedule.
pub fn set_screen_times(conn: &Connection, uuid: &str, days: &[ScreenTimeDay]) -> Result<()> {
    let json = serde_json::to_string(days).map_err(|e| Error::internal(e.to_string()))?;
    update_one(
        conn,
        uuid,
        "UPDATE players SET screen_times = :value WHERE uuid = :uuid",
        json,
    )
}

fn update_one<V: rusqlite::ToSql>(conn: &Connection, uuid: &str, sql: &str, value: V) -> Result<()> {
    let updated = conn
        .execute(sql, rusqlite::named_params! { ":value": value, ":uuid": uuid })
        .map_err(|e| Error::database(e.to_string()))?;

    if updated == 0 {
        return Err(Error::not_found(format!("player {}", uuid)));
    }
    Ok(())
}

/// Raw column values, decoded into a [`Player`] outside the rusqlite closure
/// so JSON failures surface as our own error type.
struct PlayerRow {
    uuid: String,
    name: String,
    firmware: String,
    model: String,
    status: i64,
    playlist_id: i64,
    refresh: i64,
    commands: String,
    reports: String,
    screen_times: String,
    width: u32,
    height: u32,
    playlist_name: Option<String>,
    playlist_mode: Option<String>,
    duration: Option<i64>,
    multizone: Option<String>,
}

impl PlayerRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            uuid: row.get(0)?,
            name: row.get(1)?,
            firmware: row.get(2)?,
            model: row.get(3)?,
            status: row.get(4)?,
            playlist_id: row.get(5)?,
            refresh: row.get(6)?,
            commands: row.get(7)?,
            reports: row.get(8)?,
            screen_times: row.get(9)?,
            width: row.get(10)?,
            height: row.get(11)?,
            playlist_name: row.get(12)?,
            playlist_mode: row.get(13)?,
            duration: row.get(14)?,
            multizone: row.get(15)?,
        })
    }

    fn into_player(self) -> Result<Player> {
        let malformed = |column: &str, e: serde_json::Error| {
            Error::database(format!("malformed {} for player {}: {}", column, self.uuid, e))
        };

        let commands: Vec<String> =
            serde_json::from_str(&self.commands).map_err(|e| malformed("commands", e))?;
        let reports: ReportFlags =
            serde_json::from_str(&self.reports).map_err(|e| malformed("reports", e))?;
        let screen_times: Vec<ScreenTimeDay> =
            serde_json::from_str(&self.screen_times).map_err(|e| malformed("screen_times", e))?;
        let zones: Option<Zones> = match self.multizone.as_deref() {
            Some(json) if !json.is_empty() => {
                Some(serde_json::from_str(json).map_err(|e| malformed("multizone", e))?)
            }
            _ => None,
        };

        let playlist_mode = match self.playlist_mode.as_deref() {
            Some(mode) => mode.parse().map_err(Error::database)?,
            None => PlaylistMode::default(),
        };

        Ok(Player {
            model: self.model.parse().unwrap_or(PlayerModel::Unknown),
            status: PlayerStatus::from_code(self.status),
            playlist_id: PlaylistId::from(self.playlist_id),
            playlist_name: self.playlist_name.unwrap_or_default(),
            playlist_mode,
            zones,
            duration: self.duration.unwrap_or(0).max(0) as u64,
            refresh: self.refresh.max(0) as u64,
            commands,
            reports,
            screen_times,
            properties: PlayerProperties {
                width: self.width,
                height: self.height,
            },
            uuid: self.uuid,
            name: self.name,
            firmware: self.firmware,
        })
    }
}
