//! Publication of compiled indexes.
//!
//! Devices read the published file while it may be replaced, so content is
//! written to a temporary file in the target directory and renamed into
//! place. Publishes to the same path are serialized.

use dashmap::DashMap;
use parking_lot::Mutex;
use playout_common::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a publish did to the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// New content was written.
    Written,
    /// The artifact already had this content.
    Unchanged,
    /// Nothing was generated; the previous artifact stays in place.
    Stale,
}

#[derive(Default)]
pub struct IndexPublisher {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl IndexPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `content` at `path`.
    ///
    /// Empty content keeps a previous artifact and is an error when there is
    /// none. Blocking; call from a blocking context.
    pub fn publish(&self, path: &Path, content: &str) -> Result<PublishOutcome> {
        let lock = self.locks.entry(path.to_path_buf()).or_default().clone();
        let _guard = lock.lock();

        if content.is_empty() {
            if path.is_file() {
                tracing::warn!(path = %path.display(), "Index generation produced nothing, serving previous index");
                return Ok(PublishOutcome::Stale);
            }
            return Err(Error::NoIndex(path.display().to_string()));
        }

        match std::fs::read(path) {
            Ok(existing) if existing == content.as_bytes() => {
                tracing::debug!(path = %path.display(), "Index unchanged");
                return Ok(PublishOutcome::Unchanged);
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let dir = path
            .parent()
            .ok_or_else(|| Error::invalid_input(format!("index path has no parent: {}", path.display())))?;
        std::fs::create_dir_all(dir)?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "Index written");
        Ok(PublishOutcome::Written)
    }
}
