//! Device family template selection.

use playout_common::PlayerModel;
use std::fmt;

/// Oldest Garlic build that understands the full template.
const GARLIC_MIN_BUILD: u32 = 740;

/// Index document template, one per device family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexTemplate {
    Garlic,
    Xmp,
    XmpLegacy,
    Ids,
    Qbic,
    Generic,
}

impl IndexTemplate {
    pub const ALL: [IndexTemplate; 6] = [
        Self::Garlic,
        Self::Xmp,
        Self::XmpLegacy,
        Self::Ids,
        Self::Qbic,
        Self::Generic,
    ];

    /// Template name, also the file stem of the template source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Garlic => "garlic",
            Self::Xmp => "xmp",
            Self::XmpLegacy => "xmp_legacy",
            Self::Ids => "ids",
            Self::Qbic => "qbic",
            Self::Generic => "generic",
        }
    }

    /// Whether the template has exclusive and prefetch sections.
    pub fn supports_prefetch(&self) -> bool {
        !matches!(self, Self::Generic | Self::XmpLegacy)
    }
}

impl fmt::Display for IndexTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick the template for a device.
pub fn select_template(model: PlayerModel, firmware: &str) -> IndexTemplate {
    match model {
        PlayerModel::Garlic => match build_number(firmware) {
            Some(build) if build >= GARLIC_MIN_BUILD => IndexTemplate::Garlic,
            _ => IndexTemplate::Generic,
        },
        PlayerModel::IadeaXmp2x00 | PlayerModel::IadeaXmp3x0 => IndexTemplate::Xmp,
        PlayerModel::IadeaXmp1x0 => IndexTemplate::XmpLegacy,
        PlayerModel::Ids => IndexTemplate::Ids,
        PlayerModel::Qbic => IndexTemplate::Qbic,
        PlayerModel::Unknown | PlayerModel::Screenlite | PlayerModel::Compatible => {
            IndexTemplate::Generic
        }
    }
}

/// Last run of digits in a firmware string, e.g. `745` in `1.0.0.745`.
fn build_number(firmware: &str) -> Option<u32> {
    firmware
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .last()
        .and_then(|part| part.parse().ok())
}
