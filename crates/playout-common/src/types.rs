//! Core type definitions for players and playlists.
//!
//! Enums stored as text are serialized in snake_case; the player status is
//! stored as its integer code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hardware/software family of a player device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerModel {
    /// Device could not be identified.
    #[default]
    Unknown,
    /// Garlic player (Linux, Android, Windows builds).
    Garlic,
    /// IAdea XMP-1x0 series.
    IadeaXmp1x0,
    /// IAdea XMP-2x00, XDS and 6200/7300 series.
    IadeaXmp2x00,
    /// IAdea XMP-3x0 series.
    IadeaXmp3x0,
    /// IDS digital signage app.
    Ids,
    /// Qbic signage boxes.
    Qbic,
    /// Screenlite web player.
    Screenlite,
    /// Other SMIL compatible players.
    Compatible,
}

impl PlayerModel {
    /// Stable text representation used for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Garlic => "garlic",
            Self::IadeaXmp1x0 => "iadea_xmp1x0",
            Self::IadeaXmp2x00 => "iadea_xmp2x00",
            Self::IadeaXmp3x0 => "iadea_xmp3x0",
            Self::Ids => "ids",
            Self::Qbic => "qbic",
            Self::Screenlite => "screenlite",
            Self::Compatible => "compatible",
        }
    }

    /// Whether the device honours scheduled standby periods.
    pub fn supports_standby(&self) -> bool {
        matches!(self, Self::Garlic | Self::IadeaXmp2x00 | Self::IadeaXmp3x0)
    }
}

impl fmt::Display for PlayerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(Self::Unknown),
            "garlic" => Ok(Self::Garlic),
            "iadea_xmp1x0" => Ok(Self::IadeaXmp1x0),
            "iadea_xmp2x00" => Ok(Self::IadeaXmp2x00),
            "iadea_xmp3x0" => Ok(Self::IadeaXmp3x0),
            "ids" => Ok(Self::Ids),
            "qbic" => Ok(Self::Qbic),
            "screenlite" => Ok(Self::Screenlite),
            "compatible" => Ok(Self::Compatible),
            _ => Err(format!("Unknown player model: {}", s)),
        }
    }
}

/// Lifecycle status of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Seen for the first time, not yet claimed.
    Unregistered,
    /// Claimed but not released for playout.
    Unreleased,
    /// Released for playout.
    Released,
    /// Serve a fixture that makes the device upload its logs.
    DebugFtp,
    /// Conformance fixture: valid index.
    TestSmilOk,
    /// Conformance fixture: malformed index.
    TestSmilError,
    /// Conformance fixture: index referencing missing media.
    TestNoContent,
    /// Conformance fixture: index without prefetch section.
    TestNoPrefetch,
    /// Deliberately fail the request.
    TestException,
    /// Any status code this build does not know about.
    Unknown(i64),
}

impl PlayerStatus {
    /// Map a stored status code to a status.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Unregistered,
            1 => Self::Unreleased,
            2 => Self::Released,
            3 => Self::DebugFtp,
            10 => Self::TestSmilOk,
            11 => Self::TestSmilError,
            12 => Self::TestNoContent,
            13 => Self::TestNoPrefetch,
            14 => Self::TestException,
            other => Self::Unknown(other),
        }
    }

    /// Stored status code.
    pub fn code(&self) -> i64 {
        match self {
            Self::Unregistered => 0,
            Self::Unreleased => 1,
            Self::Released => 2,
            Self::DebugFtp => 3,
            Self::TestSmilOk => 10,
            Self::TestSmilError => 11,
            Self::TestNoContent => 12,
            Self::TestNoPrefetch => 13,
            Self::TestException => 14,
            Self::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unregistered => write!(f, "unregistered"),
            Self::Unreleased => write!(f, "unreleased"),
            Self::Released => write!(f, "released"),
            Self::DebugFtp => write!(f, "debug_ftp"),
            Self::TestSmilOk => write!(f, "test_smil_ok"),
            Self::TestSmilError => write!(f, "test_smil_error"),
            Self::TestNoContent => write!(f, "test_no_content"),
            Self::TestNoPrefetch => write!(f, "test_no_prefetch"),
            Self::TestException => write!(f, "test_exception"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// How the player's assigned playlist is composed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistMode {
    #[default]
    Master,
    Internal,
    External,
    Multizone,
    Channel,
}

impl fmt::Display for PlaylistMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master => write!(f, "master"),
            Self::Internal => write!(f, "internal"),
            Self::External => write!(f, "external"),
            Self::Multizone => write!(f, "multizone"),
            Self::Channel => write!(f, "channel"),
        }
    }
}

impl FromStr for PlaylistMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "master" => Ok(Self::Master),
            "internal" => Ok(Self::Internal),
            "external" => Ok(Self::External),
            "multizone" => Ok(Self::Multizone),
            "channel" => Ok(Self::Channel),
            _ => Err(format!("Unknown playlist mode: {}", s)),
        }
    }
}

/// Unit multizone geometry is exported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportUnit {
    #[default]
    Percent,
    Pixel,
}
