//! Section renderer.
//!
//! [`SectionRenderer`] is the seam between composition and the template
//! engine. [`BlockRenderer`] understands two constructs:
//!
//! - `{{#section}} ... {{/section}}` repeats its body once per row of the
//!   section, replacing `{{key}}` with the row's values
//! - `{{section.key}}` reads `key` from the first row of the section
//!
//! Unknown sections and keys render empty.

use playout_common::{Error, Result};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::sections::{SectionData, SectionRow};
use crate::template::IndexTemplate;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#(\w+)\}\}(.*?)\{\{/(\w+)\}\}|\{\{(\w+)\.(\w+)\}\}")
        .expect("Invalid template tag regex")
});

static ROW_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("Invalid row key regex"));

/// Renders prepared sections into an index document.
pub trait SectionRenderer: Send + Sync {
    fn render(&self, template: &str, data: &SectionData) -> Result<String>;
}

/// Placeholder and block renderer over a fixed set of named templates.
#[derive(Debug, Clone)]
pub struct BlockRenderer {
    templates: HashMap<String, String>,
}

impl BlockRenderer {
    /// Renderer with the built-in templates.
    pub fn new() -> Self {
        let templates = IndexTemplate::ALL
            .into_iter()
            .map(|template| (template.name().to_string(), builtin(template).to_string()))
            .collect();
        Self { templates }
    }

    /// Built-in templates, replaced by `<dir>/<name>.smil` where present.
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut renderer = Self::new();
        for template in IndexTemplate::ALL {
            let path = dir.join(format!("{}.smil", template.name()));
            if path.is_file() {
                let source = std::fs::read_to_string(&path)?;
                tracing::debug!(template = %template, path = %path.display(), "Using template override");
                renderer.templates.insert(template.name().to_string(), source);
            }
        }
        Ok(renderer)
    }

    fn expand(source: &str, data: &SectionData) -> Result<String> {
        let mut out = String::with_capacity(source.len());
        let mut last = 0;

        for caps in TAG.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push_str(&source[last..whole.start()]);
            last = whole.end();

            match (caps.get(1), caps.get(4)) {
                (Some(open), _) => {
                    let close = caps.get(3).map_or("", |m| m.as_str());
                    if open.as_str() != close {
                        return Err(Error::render(format!(
                            "Block {{{{#{}}}}} closed by {{{{/{}}}}}",
                            open.as_str(),
                            close
                        )));
                    }
                    let body = caps.get(2).map_or("", |m| m.as_str());
                    for row in data.get(open.as_str()).into_iter().flatten() {
                        out.push_str(&fill_row(body, row));
                    }
                }
                (None, Some(section)) => {
                    let key = caps.get(5).map_or("", |m| m.as_str());
                    let value = data
                        .get(section.as_str())
                        .and_then(|rows| rows.first())
                        .and_then(|row| row.get(key));
                    if let Some(value) = value {
                        out.push_str(value);
                    }
                }
                (None, None) => {}
            }
        }

        out.push_str(&source[last..]);
        Ok(out)
    }
}

impl Default for BlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionRenderer for BlockRenderer {
    fn render(&self, template: &str, data: &SectionData) -> Result<String> {
        let source = self
            .templates
            .get(template)
            .ok_or_else(|| Error::render(format!("Unknown template: {}", template)))?;
        Self::expand(source, data)
    }
}

fn fill_row(body: &str, row: &SectionRow) -> String {
    ROW_KEY
        .replace_all(body, |caps: &Captures| {
            row.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

fn builtin(template: IndexTemplate) -> &'static str {
    match template {
        IndexTemplate::Garlic => include_str!("../templates/garlic.smil"),
        IndexTemplate::Xmp => include_str!("../templates/xmp.smil"),
        IndexTemplate::XmpLegacy => include_str!("../templates/xmp_legacy.smil"),
        IndexTemplate::Ids => include_str!("../templates/ids.smil"),
        IndexTemplate::Qbic => include_str!("../templates/qbic.smil"),
        IndexTemplate::Generic => include_str!("../templates/generic.smil"),
    }
}
