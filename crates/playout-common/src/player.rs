//! Player entity as read by the index compiler.
//!
//! The entity is owned by the persistence layer. Zones and screen times are
//! stored as JSON and deserialize straight into the types below.

use serde::{Deserialize, Serialize};

use crate::ids::{PlaylistId, ZoneId};
use crate::types::{ExportUnit, PlayerModel, PlayerStatus, PlaylistMode};

/// A player device and its playout assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub uuid: String,
    pub name: String,
    pub firmware: String,
    pub model: PlayerModel,
    pub status: PlayerStatus,
    pub playlist_id: PlaylistId,
    pub playlist_name: String,
    pub playlist_mode: PlaylistMode,
    pub zones: Option<Zones>,
    /// Total duration of the assigned playlist in seconds.
    pub duration: u64,
    /// Poll interval in seconds.
    pub refresh: u64,
    /// Pending remote tasks.
    pub commands: Vec<String>,
    pub reports: ReportFlags,
    pub screen_times: Vec<ScreenTimeDay>,
    pub properties: PlayerProperties,
}

impl Player {
    /// A freshly seen device that nobody has claimed yet.
    pub fn unregistered(uuid: &str, name: &str, firmware: &str, model: PlayerModel) -> Self {
        Self {
            uuid: uuid.to_string(),
            name: name.to_string(),
            firmware: firmware.to_string(),
            model,
            ..Self::default()
        }
    }

    /// Whether the playlist is composed from several zones.
    pub fn is_multizone(&self) -> bool {
        self.playlist_mode == PlaylistMode::Multizone
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            uuid: String::new(),
            name: String::new(),
            firmware: String::new(),
            model: PlayerModel::Unknown,
            status: PlayerStatus::Unregistered,
            playlist_id: PlaylistId::NONE,
            playlist_name: String::new(),
            playlist_mode: PlaylistMode::Master,
            zones: None,
            duration: 0,
            refresh: 900,
            commands: Vec::new(),
            reports: ReportFlags::default(),
            screen_times: Vec::new(),
            properties: PlayerProperties::default(),
        }
    }
}

/// Root canvas dimensions of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProperties {
    pub width: u32,
    pub height: u32,
}

impl Default for PlayerProperties {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Telemetry the device should push to the report server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFlags {
    #[serde(default)]
    pub inventory: bool,
    #[serde(default)]
    pub played_durations: bool,
    #[serde(default)]
    pub event_logs: bool,
    #[serde(default)]
    pub configuration: bool,
    #[serde(default)]
    pub executions: bool,
}

/// Multizone layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zones {
    #[serde(default)]
    pub export_unit: ExportUnit,
    pub screen_width: u32,
    pub screen_height: u32,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl Zones {
    /// Zones paired with their 1-based ids.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (ZoneId, &Zone)> {
        self.zones
            .iter()
            .enumerate()
            .map(|(index, zone)| (ZoneId::from_index(index), zone))
    }
}

/// One region of a multizone layout, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(default)]
    pub zone_name: String,
    pub zone_left: u32,
    pub zone_top: u32,
    pub zone_width: u32,
    pub zone_height: u32,
    #[serde(default)]
    pub zone_z_index: i32,
    #[serde(default = "default_bgcolor")]
    pub zone_bgcolor: String,
    pub zone_playlist_id: PlaylistId,
}

fn default_bgcolor() -> String {
    "transparent".to_string()
}

/// On-periods of one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenTimeDay {
    /// ISO weekday, 1 = Monday .. 7 = Sunday.
    pub day: u8,
    #[serde(default)]
    pub periods: Vec<ScreenPeriod>,
}

/// A span during which the screen should be on, as `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPeriod {
    pub start: String,
    pub end: String,
}
