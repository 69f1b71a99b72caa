//! Content sources for the resolver.

use async_trait::async_trait;
use playout_common::{PlaylistId, Result};

/// Stored markup of local playlists.
#[async_trait]
pub trait ContentReader: Send + Sync {
    /// Item markup of a playlist.
    async fn load_items(&self, id: PlaylistId) -> Result<String>;

    /// Prefetch markup of a playlist.
    async fn load_prefetch(&self, id: PlaylistId) -> Result<String>;

    /// Exclusive-zone markup of a playlist.
    async fn load_exclusive(&self, id: PlaylistId) -> Result<String>;
}

/// Pre-rendered item fragments of playlists hosted elsewhere.
#[async_trait]
pub trait ExternalContentReader: Send + Sync {
    async fn load_items(&self, url: &str) -> Result<String>;
}
