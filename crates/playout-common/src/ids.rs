//! Typed ID wrappers.
//!
//! Playlist ids are database integers where `0` means "nothing assigned".
//! Zone ids are the 1-based position of a zone in a multizone layout.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored playlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(i64);

impl PlaylistId {
    /// The "no playlist assigned" id.
    pub const NONE: PlaylistId = PlaylistId(0);

    /// Whether this id points at an actual playlist.
    pub fn is_assigned(self) -> bool {
        self.0 > 0
    }

    /// Raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for PlaylistId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<PlaylistId> for i64 {
    fn from(id: PlaylistId) -> Self {
        id.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a zone within a multizone layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(u32);

impl ZoneId {
    /// Zone id for the zone at `index` (0-based) in the zone list.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }
}

impl From<u32> for ZoneId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_id_assignment() {
        assert!(!PlaylistId::NONE.is_assigned());
        assert!(!PlaylistId::from(-3).is_assigned());
        assert!(PlaylistId::from(1).is_assigned());
    }

    #[test]
    fn test_playlist_id_serializes_transparently() {
        let json = serde_json::to_string(&PlaylistId::from(42)).unwrap();
        assert_eq!(json, "42");
        let id: PlaylistId = serde_json::from_str("17").unwrap();
        assert_eq!(id.get(), 17);
    }

    #[test]
    fn test_zone_id_is_one_based() {
        assert_eq!(ZoneId::from_index(0).to_string(), "1");
        assert_eq!(ZoneId::from_index(3), ZoneId::from(4));
    }
}
