//! Fragment formatting.
//!
//! Deterministic, side-effect-free transforms applied to resolved playlist
//! fragments before they are handed to the section preparers.

use playout_common::ZoneId;
use regex::{Captures, Regex};
use std::sync::LazyLock;

const SEQ_INDENT: &str = "\t\t\t";

static REGION_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(^|\s)region="([^"]*)""#).expect("Invalid region regex"));

/// Wrap a fragment in an indefinitely repeating sequence.
///
/// ```
/// use playout_smil::format::wrap_with_sequence;
///
/// let wrapped = wrap_with_sequence("<img src=\"a.jpg\"/>\n");
/// assert!(wrapped.starts_with("\t\t\t<seq id=\"media\" repeatCount=\"indefinite\">\n"));
/// assert!(wrapped.ends_with("\t\t\t</seq>\n"));
/// ```
pub fn wrap_with_sequence(content: &str) -> String {
    sequence("media", content)
}

/// Wrap a zone's items in a zone-qualified sequence and make every region
/// reference unique to that zone.
pub fn format_multizone_items(zone_id: ZoneId, items: &str) -> String {
    sequence(&format!("media{}", zone_id), &rename_regions(zone_id, items))
}

/// Rename the region references of a zone's exclusive fragment.
///
/// No wrapping is applied and empty input stays empty.
pub fn format_multizone_exclusive(zone_id: ZoneId, exclusive: &str) -> String {
    if exclusive.is_empty() {
        return String::new();
    }
    rename_regions(zone_id, exclusive)
}

fn sequence(id: &str, content: &str) -> String {
    format!(
        "{indent}<seq id=\"{id}\" repeatCount=\"indefinite\">\n{content}{indent}</seq>\n",
        indent = SEQ_INDENT,
        id = id,
        content = content
    )
}

fn rename_regions(zone_id: ZoneId, fragment: &str) -> String {
    REGION_ATTR
        .replace_all(fragment, |caps: &Captures<'_>| {
            format!("{}region=\"{}{}\"", &caps[1], &caps[2], zone_id)
        })
        .into_owned()
}
