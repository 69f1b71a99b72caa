//! Player identification from the `User-Agent` header.
//!
//! Devices announce themselves in one of three shapes:
//!
//! ```text
//! GAPI/1.0 (UUID:<uuid>; NAME:<name>) <platform>/<firmware> (MODEL:<model>)
//! ADAPI/<v> (UUID:<uuid>; NAME:<name>) <platform>/<firmware> (MODEL:<model>)
//! ADAPI/<v> (UUID:<uuid>) <platform>/<firmware> (MODEL:<model>)
//! ```
//!
//! The last one comes from older firmware without a name field; such devices
//! are named after their uuid.

use playout_common::PlayerModel;
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

static GAPI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^GAPI/1\.0 \(UUID:([^;)]+); NAME:([^)]*)\) ([^/\s]+)/(\S+) \(MODEL:([^)]+)\)")
        .expect("Invalid GAPI regex")
});

static ADAPI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ADAPI/[\d.]+ \(UUID:([^;)]+); NAME:([^)]*)\) ([^/\s]+)/(\S+) \(MODEL:([^)]+)\)")
        .expect("Invalid ADAPI regex")
});

static ADAPI_LEGACY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ADAPI/[\d.]+ \(UUID:([^;)]+)\) ([^/\s]+)/(\S+) \(MODEL:([^)]+)\)")
        .expect("Invalid legacy ADAPI regex")
});

/// Model token prefixes, checked in order, case-insensitively.
const MODELS: &[(&str, PlayerModel)] = &[
    ("garlic", PlayerModel::Garlic),
    ("xmp-1", PlayerModel::IadeaXmp1x0),
    ("xmp-2", PlayerModel::IadeaXmp2x00),
    ("xmp-6", PlayerModel::IadeaXmp2x00),
    ("xmp-7", PlayerModel::IadeaXmp2x00),
    ("xds-", PlayerModel::IadeaXmp2x00),
    ("xmp-3", PlayerModel::IadeaXmp3x0),
    ("ids", PlayerModel::Ids),
    ("qbic", PlayerModel::Qbic),
    ("bxp-", PlayerModel::Qbic),
    ("screenlite", PlayerModel::Screenlite),
    ("smil", PlayerModel::Compatible),
];

/// What a device says about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerIdentity {
    pub uuid: String,
    pub name: String,
    pub platform: String,
    pub firmware: String,
    pub model_token: String,
    pub model: PlayerModel,
}

impl PlayerIdentity {
    /// Parse a user agent. Strings matching no grammar yield an unknown
    /// identity.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let user_agent = user_agent.trim();

        if let Some(caps) = GAPI.captures(user_agent).or_else(|| ADAPI.captures(user_agent)) {
            return Self::from_parts(&caps, Some(2), 3, 4, 5);
        }
        if let Some(caps) = ADAPI_LEGACY.captures(user_agent) {
            return Self::from_parts(&caps, None, 2, 3, 4);
        }

        tracing::debug!(user_agent, "User agent matches no known grammar");
        Self::default()
    }

    fn from_parts(
        caps: &Captures,
        name: Option<usize>,
        platform: usize,
        firmware: usize,
        model: usize,
    ) -> Self {
        let group = |index: usize| caps.get(index).map_or("", |m| m.as_str()).trim();

        let uuid = group(1).to_string();
        let name = match name.map(group) {
            Some(raw) if !raw.is_empty() => decode_name(raw),
            _ => uuid.clone(),
        };
        let model_token = group(model).to_string();

        Self {
            model: model_from_token(&model_token),
            uuid,
            name,
            platform: group(platform).to_string(),
            firmware: group(firmware).to_string(),
            model_token,
        }
    }

    /// Whether the device belongs to a supported family.
    pub fn is_known(&self) -> bool {
        self.model != PlayerModel::Unknown && !self.uuid.is_empty()
    }
}

fn decode_name(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Map a device's model token to its family.
pub fn model_from_token(token: &str) -> PlayerModel {
    let token = token.trim().to_ascii_lowercase();
    MODELS
        .iter()
        .find(|(prefix, _)| token.starts_with(prefix))
        .map_or(PlayerModel::Unknown, |&(_, model)| model)
}
