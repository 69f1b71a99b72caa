//! Playlist builders.
//!
//! A builder turns a player's playlist assignment into a single
//! [`PlaylistStructure`]. The factory is the only place that branches on the
//! playlist mode.

use async_trait::async_trait;
use playout_common::{Player, PlaylistId, ZoneId};

use crate::format::{format_multizone_exclusive, format_multizone_items, wrap_with_sequence};
use crate::resolver::ContentResolver;
use crate::structure::PlaylistStructure;

/// Composes the playlist of one compilation.
#[async_trait]
pub trait PlaylistBuilder: Send + Sync {
    async fn build_playlist(&self) -> PlaylistStructure;
}

/// One playlist playing full screen.
pub struct StandardPlaylistBuilder {
    playlist_id: PlaylistId,
    resolver: ContentResolver,
}

impl StandardPlaylistBuilder {
    pub fn new(playlist_id: PlaylistId, resolver: ContentResolver) -> Self {
        Self {
            playlist_id,
            resolver,
        }
    }
}

#[async_trait]
impl PlaylistBuilder for StandardPlaylistBuilder {
    async fn build_playlist(&self) -> PlaylistStructure {
        let (items, prefetch, exclusive) = futures::join!(
            self.resolver.collect_items(self.playlist_id),
            self.resolver.collect_prefetches(self.playlist_id),
            self.resolver.collect_exclusives(self.playlist_id),
        );

        PlaylistStructure::new(wrap_with_sequence(&items), prefetch, exclusive)
    }
}

/// Several zones, each playing its own playlist.
pub struct MultizonePlaylistBuilder {
    zones: Vec<(ZoneId, PlaylistId)>,
    resolver: ContentResolver,
}

impl MultizonePlaylistBuilder {
    pub fn new(zones: Vec<(ZoneId, PlaylistId)>, resolver: ContentResolver) -> Self {
        Self { zones, resolver }
    }
}

#[async_trait]
impl PlaylistBuilder for MultizonePlaylistBuilder {
    async fn build_playlist(&self) -> PlaylistStructure {
        let mut items = String::new();
        let mut prefetches = Vec::with_capacity(self.zones.len());
        let mut exclusive = String::new();

        for &(zone_id, playlist_id) in &self.zones {
            let zone_items = self.resolver.collect_items(playlist_id).await;
            items.push_str(&format_multizone_items(zone_id, &zone_items));

            prefetches.push(self.resolver.collect_prefetches(playlist_id).await);

            let zone_exclusive = self.resolver.collect_exclusives(playlist_id).await;
            exclusive.push_str(&format_multizone_exclusive(zone_id, &zone_exclusive));
        }

        PlaylistStructure::new(items, prefetches.join("\n"), exclusive)
    }
}

/// Picks the builder matching the player's playlist mode.
#[derive(Clone)]
pub struct PlaylistBuilderFactory {
    resolver: ContentResolver,
}

impl PlaylistBuilderFactory {
    pub fn new(resolver: ContentResolver) -> Self {
        Self { resolver }
    }

    pub fn create(&self, player: &Player) -> Box<dyn PlaylistBuilder> {
        if player.is_multizone() {
            let zones = match &player.zones {
                Some(zones) => zones
                    .iter_with_ids()
                    .map(|(zone_id, zone)| (zone_id, zone.zone_playlist_id))
                    .collect(),
                None => {
                    tracing::warn!(uuid = %player.uuid, "Multizone playlist without zones");
                    Vec::new()
                }
            };
            Box::new(MultizonePlaylistBuilder::new(zones, self.resolver.clone()))
        } else {
            Box::new(StandardPlaylistBuilder::new(
                player.playlist_id,
                self.resolver.clone(),
            ))
        }
    }
}
