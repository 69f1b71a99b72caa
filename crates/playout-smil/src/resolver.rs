//! Recursive playlist content resolution.
//!
//! Stored playlist markup embeds other playlists through placeholders:
//!
//! - `{ITEMS_<id>}` - the resolved items of local playlist `<id>`
//! - `{PREFETCH_<id>}` - the resolved prefetch markup of local playlist `<id>`
//! - `{ITEMS_<id>#<url>}` - the items of the external playlist at `<url>`,
//!   spliced verbatim
//!
//! The grammar is the persisted wire format and must not change.
//!
//! Resolution never fails outwards: a broken sub-playlist, a cycle or a
//! limit breach is logged and the whole fragment comes back empty.

use futures::future::BoxFuture;
use playout_common::{Error, PlaylistId, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::reader::{ContentReader, ExternalContentReader};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(ITEMS|PREFETCH)_(\d+)(?:#([^}]+))?\}").expect("Invalid placeholder regex")
});

/// Caps on how far a single resolution may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverLimits {
    /// Maximum nesting of sub-playlists below the root.
    pub max_depth: usize,
    /// Maximum number of placeholders expanded in one pass.
    pub max_expansions: usize,
}

impl Default for ResolverLimits {
    fn default() -> Self {
        Self {
            max_depth: 16,
            max_expansions: 256,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fragment {
    Items,
    Prefetch,
    Exclusive,
}

impl Fragment {
    fn tag(self) -> &'static str {
        match self {
            Self::Items | Self::Exclusive => "ITEMS",
            Self::Prefetch => "PREFETCH",
        }
    }

    fn allows_external(self) -> bool {
        self != Self::Prefetch
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Items => write!(f, "items"),
            Self::Prefetch => write!(f, "prefetch"),
            Self::Exclusive => write!(f, "exclusive"),
        }
    }
}

struct Placeholder {
    start: usize,
    end: usize,
    id: i64,
    url: Option<String>,
}

#[derive(Default)]
struct Pass {
    ancestors: HashSet<i64>,
    expansions: usize,
}

/// Splices sub-playlist content into stored playlist markup.
#[derive(Clone)]
pub struct ContentResolver {
    reader: Arc<dyn ContentReader>,
    external: Arc<dyn ExternalContentReader>,
    limits: ResolverLimits,
}

impl ContentResolver {
    pub fn new(
        reader: Arc<dyn ContentReader>,
        external: Arc<dyn ExternalContentReader>,
        limits: ResolverLimits,
    ) -> Self {
        Self {
            reader,
            external,
            limits,
        }
    }

    /// Fully resolved item markup of a playlist, or `""` on failure.
    pub async fn collect_items(&self, id: PlaylistId) -> String {
        let mut pass = Pass::default();
        let result = self.resolve_local(Fragment::Items, id, &mut pass, 0).await;
        recover(Fragment::Items, id, result)
    }

    /// Fully resolved prefetch markup of a playlist, or `""` on failure.
    pub async fn collect_prefetches(&self, id: PlaylistId) -> String {
        let mut pass = Pass::default();
        let result = self.resolve_local(Fragment::Prefetch, id, &mut pass, 0).await;
        recover(Fragment::Prefetch, id, result)
    }

    /// Fully resolved exclusive markup of a playlist, or `""` on failure.
    ///
    /// Sub-playlists without exclusive markup contribute their regular items.
    pub async fn collect_exclusives(&self, id: PlaylistId) -> String {
        let mut pass = Pass::default();
        let result = self.resolve_local(Fragment::Exclusive, id, &mut pass, 0).await;
        recover(Fragment::Exclusive, id, result)
    }

    fn resolve_local<'a>(
        &'a self,
        fragment: Fragment,
        id: PlaylistId,
        pass: &'a mut Pass,
        depth: usize,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            if depth > self.limits.max_depth {
                return Err(Error::limit_exceeded(format!(
                    "playlist {} nested deeper than {}",
                    id, self.limits.max_depth
                )));
            }
            if !pass.ancestors.insert(id.get()) {
                return Err(Error::Cycle(id.get()));
            }

            let (raw, fragment) = self.load(fragment, id, depth).await?;
            let result = self.expand(fragment, raw, pass, depth).await;

            pass.ancestors.remove(&id.get());
            result
        })
    }

    /// Load one playlist's markup. Exclusive sub-playlists with no exclusive
    /// markup fall back to their items, which are then resolved as items.
    async fn load(&self, fragment: Fragment, id: PlaylistId, depth: usize) -> Result<(String, Fragment)> {
        match fragment {
            Fragment::Items => Ok((self.reader.load_items(id).await?, fragment)),
            Fragment::Prefetch => Ok((self.reader.load_prefetch(id).await?, fragment)),
            Fragment::Exclusive => {
                let exclusive = self.reader.load_exclusive(id).await?;
                if depth > 0 && exclusive.trim().is_empty() {
                    tracing::debug!(playlist_id = %id, "No exclusive content, using items");
                    Ok((self.reader.load_items(id).await?, Fragment::Items))
                } else {
                    Ok((exclusive, fragment))
                }
            }
        }
    }

    async fn expand(
        &self,
        fragment: Fragment,
        text: String,
        pass: &mut Pass,
        depth: usize,
    ) -> Result<String> {
        let placeholders = find_placeholders(fragment, &text)?;
        if placeholders.is_empty() {
            return Ok(text);
        }

        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        for placeholder in placeholders {
            pass.expansions += 1;
            if pass.expansions > self.limits.max_expansions {
                return Err(Error::limit_exceeded(format!(
                    "more than {} placeholders expanded",
                    self.limits.max_expansions
                )));
            }

            output.push_str(&text[last..placeholder.start]);
            let spliced = match placeholder.url {
                Some(url) => {
                    tracing::debug!(url = %url, "Loading external playlist");
                    self.external.load_items(&url).await?
                }
                None => {
                    let sub = PlaylistId::from(placeholder.id);
                    self.resolve_local(fragment, sub, pass, depth + 1).await?
                }
            };
            output.push_str(&spliced);
            last = placeholder.end;
        }
        output.push_str(&text[last..]);

        Ok(output)
    }
}

fn find_placeholders(fragment: Fragment, text: &str) -> Result<Vec<Placeholder>> {
    let mut found = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        if &caps[1] != fragment.tag() {
            continue;
        }
        let url = caps.get(3).map(|m| m.as_str().to_string());
        if url.is_some() && !fragment.allows_external() {
            continue;
        }
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let id = caps[2]
            .parse::<i64>()
            .map_err(|e| Error::invalid_input(format!("placeholder id {}: {}", &caps[2], e)))?;

        found.push(Placeholder {
            start: whole.start(),
            end: whole.end(),
            id,
            url,
        });
    }
    Ok(found)
}

fn recover(fragment: Fragment, id: PlaylistId, result: Result<String>) -> String {
    match result {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(
                playlist_id = %id,
                error = %e,
                "Failed to resolve {} content, using empty fragment",
                fragment
            );
            String::new()
        }
    }
}
