//! In-memory readers for unit tests.

use async_trait::async_trait;
use playout_common::{Error, PlaylistId, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::reader::{ContentReader, ExternalContentReader};
use crate::resolver::{ContentResolver, ResolverLimits};

#[derive(Default, Clone)]
pub struct Stored {
    pub items: String,
    pub prefetch: String,
    pub exclusive: String,
}

#[derive(Default)]
pub struct MemoryReader {
    playlists: HashMap<i64, Stored>,
    loads: Arc<AtomicUsize>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, id: i64, items: &str) -> Self {
        self.playlists.entry(id).or_default().items = items.to_string();
        self
    }

    pub fn with_prefetch(mut self, id: i64, prefetch: &str) -> Self {
        self.playlists.entry(id).or_default().prefetch = prefetch.to_string();
        self
    }

    pub fn with_exclusive(mut self, id: i64, exclusive: &str) -> Self {
        self.playlists.entry(id).or_default().exclusive = exclusive.to_string();
        self
    }

    /// Shared count of stored playlists read so far.
    pub fn load_counter(&self) -> Arc<AtomicUsize> {
        self.loads.clone()
    }

    fn get(&self, id: PlaylistId) -> Result<&Stored> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.playlists
            .get(&id.get())
            .ok_or_else(|| Error::not_found(format!("playlist {}", id)))
    }
}

#[async_trait]
impl ContentReader for MemoryReader {
    async fn load_items(&self, id: PlaylistId) -> Result<String> {
        Ok(self.get(id)?.items.clone())
    }

    async fn load_prefetch(&self, id: PlaylistId) -> Result<String> {
        Ok(self.get(id)?.prefetch.clone())
    }

    async fn load_exclusive(&self, id: PlaylistId) -> Result<String> {
        Ok(self.get(id)?.exclusive.clone())
    }
}

#[derive(Default)]
pub struct MemoryExternal {
    pages: HashMap<String, String>,
}

impl MemoryExternal {
    pub fn with_page(mut self, url: &str, content: &str) -> Self {
        self.pages.insert(url.to_string(), content.to_string());
        self
    }
}

#[async_trait]
impl ExternalContentReader for MemoryExternal {
    async fn load_items(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::external(format!("no content at {}", url)))
    }
}

pub fn resolver(reader: MemoryReader, external: MemoryExternal) -> ContentResolver {
    ContentResolver::new(Arc::new(reader), Arc::new(external), ResolverLimits::default())
}
