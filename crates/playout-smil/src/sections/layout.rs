use playout_common::{ExportUnit, Player, Zones};

use super::{row, xml_escape, SectionPreparer, SectionRow};

/// Root canvas and playback regions.
pub struct LayoutPreparer<'a> {
    player: &'a Player,
}

impl<'a> LayoutPreparer<'a> {
    pub fn new(player: &'a Player) -> Self {
        Self { player }
    }

    fn full_screen(&self) -> Vec<SectionRow> {
        vec![self.region(
            "screen".to_string(),
            ["0".to_string(), "0".to_string(), "100%".to_string(), "100%".to_string()],
            0,
            "transparent",
        )]
    }

    fn zones(&self, zones: &Zones) -> Vec<SectionRow> {
        zones
            .iter_with_ids()
            .map(|(zone_id, zone)| {
                let geometry = match zones.export_unit {
                    ExportUnit::Pixel => [
                        zone.zone_left.to_string(),
                        zone.zone_top.to_string(),
                        zone.zone_width.to_string(),
                        zone.zone_height.to_string(),
                    ],
                    ExportUnit::Percent => [
                        percent(zone.zone_left, zones.screen_width),
                        percent(zone.zone_top, zones.screen_height),
                        percent(zone.zone_width, zones.screen_width),
                        percent(zone.zone_height, zones.screen_height),
                    ],
                };
                self.region(
                    format!("screen{}", zone_id),
                    geometry,
                    zone.zone_z_index,
                    &zone.zone_bgcolor,
                )
            })
            .collect()
    }

    fn region(&self, name: String, geometry: [String; 4], z_index: i32, background: &str) -> SectionRow {
        let [left, top, width, height] = geometry;
        row([
            ("root_width", self.player.properties.width.to_string()),
            ("root_height", self.player.properties.height.to_string()),
            ("region_name", name),
            ("left", left),
            ("top", top),
            ("width", width),
            ("height", height),
            ("z_index", z_index.to_string()),
            ("background_color", xml_escape(background)),
        ])
    }
}

impl SectionPreparer for LayoutPreparer<'_> {
    fn prepare(&self) -> Vec<SectionRow> {
        match &self.player.zones {
            Some(zones) if self.player.is_multizone() && !zones.zones.is_empty() => self.zones(zones),
            _ => self.full_screen(),
        }
    }
}

/// `value` as a percentage of `total`, at most two decimals, trailing zeros
/// trimmed.
fn percent(value: u32, total: u32) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let formatted = format!("{:.2}", f64::from(value) * 100.0 / f64::from(total));
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", trimmed)
}
