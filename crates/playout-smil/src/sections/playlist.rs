use playout_common::Player;

use super::{row, SectionPreparer, SectionRow};
use crate::structure::PlaylistStructure;

/// Lower bound of the prefetch refresh window, in seconds.
const PREFETCH_FLOOR_SECS: u64 = 900;

/// Items, exclusive and prefetch fragments plus the prefetch window.
pub struct PlaylistPreparer<'a> {
    player: &'a Player,
    playlist: &'a PlaylistStructure,
    simple: bool,
}

impl<'a> PlaylistPreparer<'a> {
    /// `simple` emits only the items, for templates without prefetch support.
    pub fn new(player: &'a Player, playlist: &'a PlaylistStructure, simple: bool) -> Self {
        Self {
            player,
            playlist,
            simple,
        }
    }
}

impl SectionPreparer for PlaylistPreparer<'_> {
    fn prepare(&self) -> Vec<SectionRow> {
        if self.simple {
            return vec![row([("items", self.playlist.items().to_string())])];
        }

        vec![row([
            ("items", self.playlist.items().to_string()),
            ("exclusive", self.playlist.exclusive().to_string()),
            ("prefetch", self.playlist.prefetch().to_string()),
            (
                "prefetch_refresh_time",
                prefetch_refresh_time(self.player.duration, self.player.refresh).to_string(),
            ),
        ])]
    }
}

/// Seconds the device should look ahead when prefetching.
///
/// A playlist shorter than one poll interval gets two intervals. A longer one
/// gets one interval more than it takes to play through once. Never below
/// 900 seconds.
///
/// ```
/// use playout_smil::sections::prefetch_refresh_time;
///
/// assert_eq!(prefetch_refresh_time(120, 900), 1800);
/// assert_eq!(prefetch_refresh_time(2000, 900), 3600);
/// assert_eq!(prefetch_refresh_time(30, 60), 900);
/// ```
pub fn prefetch_refresh_time(duration: u64, refresh: u64) -> u64 {
    let refresh = refresh.max(1);
    let window = if duration <= refresh {
        refresh.saturating_mul(2)
    } else {
        duration
            .div_ceil(refresh)
            .saturating_add(1)
            .saturating_mul(refresh)
    };
    window.max(PREFETCH_FLOOR_SECS)
}
