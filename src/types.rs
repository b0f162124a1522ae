//! Shared types used across pipeline stages.
//!
//! These types are serialized to JSON between scan and generate and must stay
//! identical on both sides of the manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One project write-up, loaded from a markdown file with front matter.
///
/// Entries are immutable once scanned. `slug` is unique across the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Unique path-derived identifier, `/`-separated (e.g. `web/folio`).
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// Publish timestamp.
    pub date: DateTime<Utc>,
    /// Modification timestamp; `date` is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Images>,
    /// Name of the layout template; unknown or absent names use the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    /// Markdown source, relative to the projects directory.
    pub source_path: String,
    /// Compiled HTML body.
    pub body: String,
    #[serde(default)]
    pub toc: Vec<TocEntry>,
}

impl ContentEntry {
    /// Modification time, falling back to the publish date.
    pub fn modified(&self) -> DateTime<Utc> {
        self.lastmod.unwrap_or(self.date)
    }

    /// Images normalized to an ordered list; `None` if the entry defines none.
    pub fn image_list(&self) -> Option<Vec<String>> {
        self.images.as_ref().and_then(Images::to_list)
    }

    /// The serialization-safe projection without the compiled body.
    pub fn core(&self) -> CoreContent {
        CoreContent {
            slug: self.slug.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            date: self.date,
            lastmod: self.lastmod,
            images: self.images.clone(),
            layout: self.layout.clone(),
            draft: self.draft,
            tags: self.tags.clone(),
            toc: self.toc.clone(),
            source_path: self.source_path.clone(),
        }
    }
}

/// Front matter `images`: a single path or an ordered list of paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Images {
    One(String),
    Many(Vec<String>),
}

impl Images {
    /// Normalize to a list. An empty list or empty string counts as absent.
    pub fn to_list(&self) -> Option<Vec<String>> {
        let list = match self {
            Images::One(path) => vec![path.clone()],
            Images::Many(paths) => paths.clone(),
        };
        let list: Vec<String> = list.into_iter().filter(|p| !p.trim().is_empty()).collect();
        (!list.is_empty()).then_some(list)
    }
}

/// One heading in a project's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading level, 1–6.
    pub depth: u8,
    pub text: String,
    /// Anchor id assigned to the heading in the compiled body.
    pub id: String,
}

/// An entry without its compiled body, as handed to layouts for navigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreContent {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Images>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    pub draft: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub toc: Vec<TocEntry>,
    pub source_path: String,
}

impl CoreContent {
    /// Site-relative URL of the project page.
    pub fn href(&self) -> String {
        project_href(&self.slug)
    }
}

/// Site-relative URL of a project page: `/projects/<slug>/`.
pub fn project_href(slug: &str) -> String {
    format!("/projects/{}/", slug.trim_matches('/'))
}
