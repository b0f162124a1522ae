//! TOML front matter for project markdown files.
//!
//! Every project file opens with a `+++`-delimited TOML block:
//!
//! ```text
//! +++
//! title = "Folio"
//! date = 2023-03-01
//! summary = "A static portfolio generator"
//! images = ["/static/images/folio.png"]
//! layout = "ProjectSimple"
//! tags = ["rust", "web"]
//! +++
//!
//! Markdown body...
//! ```
//!
//! `date` and `lastmod` accept native TOML dates and datetimes as well as
//! strings; both end up as UTC timestamps.

use crate::types::Images;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

const DELIMITER: &str = "+++";
const DATE_KEYS: &[&str] = &["date", "lastmod"];

/// Raw front matter as written by the author.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontMatter {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub lastmod: Option<String>,
    #[serde(default)]
    pub images: Option<Images>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Overrides the path-derived slug.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
}

/// Split a document into its front matter block and the remaining body.
///
/// Returns `None` if the document does not open with a `+++` line or the
/// block is never closed.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content.strip_prefix(DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a front matter block.
///
/// Native TOML datetimes under `date`/`lastmod` are converted to their string
/// form first so both spellings deserialize into the same field.
pub fn parse_front_matter(block: &str) -> Result<FrontMatter, toml::de::Error> {
    let mut table: toml::Table = toml::from_str(block)?;
    for key in DATE_KEYS {
        let as_text = match table.get(*key) {
            Some(toml::Value::Datetime(dt)) => Some(dt.to_string()),
            _ => None,
        };
        if let Some(text) = as_text {
            table.insert((*key).to_string(), toml::Value::String(text));
        }
    }
    toml::Value::Table(table).try_into()
}

/// Parse a publish/modification timestamp.
///
/// Accepted forms, first match wins:
/// - RFC 3339 (`2023-03-01T10:00:00+02:00`)
/// - local datetime, treated as UTC (`2023-03-01T10:00:00`, `2023-03-01 10:00:00`)
/// - bare date, midnight UTC (`2023-03-01`)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
