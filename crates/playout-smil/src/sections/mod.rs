//! Section preparers.
//!
//! Each preparer turns the player (and, for the playlist section, the
//! composed [`PlaylistStructure`]) into the rows of one template section.
//! A row maps placeholder names to rendered values; sections with repeated
//! elements (regions, subscriptions, standby periods) produce several rows.

mod layout;
mod meta;
mod playlist;
mod screen_times;
mod subscription;

pub use layout::LayoutPreparer;
pub use meta::MetaPreparer;
pub use playlist::{prefetch_refresh_time, PlaylistPreparer};
pub use screen_times::ScreenTimesPreparer;
pub use subscription::{SubscriptionPreparer, SubscriptionTargets};

use chrono::NaiveDate;
use playout_common::Player;
use std::collections::BTreeMap;
use std::fmt;

use crate::structure::PlaylistStructure;

/// Placeholder name to value.
pub type SectionRow = BTreeMap<String, String>;

/// Section name to its rows.
pub type SectionData = BTreeMap<String, Vec<SectionRow>>;

/// Template sections of an index document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Meta,
    Layout,
    Playlist,
    ScreenTimes,
    Subscriptions,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        Self::Meta,
        Self::Layout,
        Self::Playlist,
        Self::ScreenTimes,
        Self::Subscriptions,
    ];

    /// Name the section is addressed by in templates.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::Layout => "layout",
            Self::Playlist => "playlist",
            Self::ScreenTimes => "screen_times",
            Self::Subscriptions => "subscriptions",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces the rows of one template section.
pub trait SectionPreparer: Send + Sync {
    fn prepare(&self) -> Vec<SectionRow>;
}

/// Creates the preparer for a section from everything one compilation knows.
pub struct PreparerFactory<'a> {
    player: &'a Player,
    playlist: &'a PlaylistStructure,
    targets: &'a SubscriptionTargets,
    simple_playlist: bool,
    today: NaiveDate,
}

impl<'a> PreparerFactory<'a> {
    pub fn new(
        player: &'a Player,
        playlist: &'a PlaylistStructure,
        targets: &'a SubscriptionTargets,
        simple_playlist: bool,
        today: NaiveDate,
    ) -> Self {
        Self {
            player,
            playlist,
            targets,
            simple_playlist,
            today,
        }
    }

    pub fn create(&self, kind: SectionKind) -> Box<dyn SectionPreparer + 'a> {
        match kind {
            SectionKind::Meta => Box::new(MetaPreparer::new(self.player)),
            SectionKind::Layout => Box::new(LayoutPreparer::new(self.player)),
            SectionKind::Playlist => Box::new(PlaylistPreparer::new(
                self.player,
                self.playlist,
                self.simple_playlist,
            )),
            SectionKind::ScreenTimes => Box::new(ScreenTimesPreparer::new(self.player, self.today)),
            SectionKind::Subscriptions => {
                Box::new(SubscriptionPreparer::new(self.player, self.targets))
            }
        }
    }

    /// Run every preparer and collect the sections.
    pub fn prepare_all(&self) -> SectionData {
        SectionKind::ALL
            .iter()
            .map(|&kind| (kind.as_str().to_string(), self.create(kind).prepare()))
            .collect()
    }
}

/// Build a row from `(name, value)` pairs.
pub(crate) fn row<const N: usize>(pairs: [(&str, String); N]) -> SectionRow {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Escape text for use inside an XML attribute or element.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
