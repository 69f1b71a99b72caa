//! The composed playlist of one compilation.

/// Items, prefetch and exclusive fragments ready to embed in an index.
///
/// Built once per compilation and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistStructure {
    items: String,
    prefetch: String,
    exclusive: String,
}

impl PlaylistStructure {
    pub fn new(items: String, prefetch: String, exclusive: String) -> Self {
        Self {
            items,
            prefetch,
            exclusive,
        }
    }

    pub fn items(&self) -> &str {
        &self.items
    }

    pub fn prefetch(&self) -> &str {
        &self.prefetch
    }

    pub fn exclusive(&self) -> &str {
        &self.exclusive
    }
}
