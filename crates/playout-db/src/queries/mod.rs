//! Database query modules.
//!
//! - players: Player lookup, registration, and assignment
//! - playlists: Playlist metadata, stored markup, and multizone layouts

pub mod players;
pub mod playlists;
