//! Row models that are not part of the shared player entity.

use playout_common::{PlaylistId, PlaylistMode};
use serde::{Deserialize, Serialize};

/// Stored markup of one playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistContent {
    pub items: String,
    pub prefetch: String,
    pub exclusive: String,
}

/// Playlist metadata row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub mode: PlaylistMode,
    pub duration: u64,
}
