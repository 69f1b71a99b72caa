use playout_common::Player;

use super::{row, xml_escape, SectionPreparer, SectionRow};

/// Document title and poll interval.
pub struct MetaPreparer<'a> {
    player: &'a Player,
}

impl<'a> MetaPreparer<'a> {
    pub fn new(player: &'a Player) -> Self {
        Self { player }
    }
}

impl SectionPreparer for MetaPreparer<'_> {
    fn prepare(&self) -> Vec<SectionRow> {
        let title = format!("{} - {}", self.player.name, self.player.playlist_name);
        vec![row([
            ("title", xml_escape(&title)),
            ("refresh", self.player.refresh.to_string()),
        ])]
    }
}
