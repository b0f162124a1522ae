//! Page head metadata: title, description, Open Graph and Twitter card.
//!
//! Metadata is derived from one entry plus the site-wide defaults in
//! [`SiteMetadata`]. It is looked up in the raw collection, so drafts get
//! metadata even when their page is not published.
//!
//! ## Image resolution
//!
//! The entry's `images` (one path or a list) are used when present, else the
//! site's `social_banner`. The two consumers want different forms:
//!
//! - **Open Graph** images are absolute: a path containing `://` is kept,
//!   anything else is joined onto `site_url`.
//! - **Twitter** images are passed through unresolved.
//!
//! The serialized field names (`openGraph.publishedTime`, `twitter.card`, ...)
//! are what crawlers and social platforms read and must not change.

use crate::config::SiteMetadata;
use crate::resolve::find_entry;
use crate::types::{ContentEntry, project_href};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub site_name: String,
    pub locale: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub published_time: String,
    pub modified_time: String,
    pub url: String,
    pub images: Vec<OgImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

/// ISO-8601 UTC with milliseconds, e.g. `2023-01-01T00:00:00.000Z`.
pub fn iso_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Resolve an image path to an absolute URL.
pub fn absolute_url(site_url: &str, path: &str) -> String {
    if path.contains("://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Entry images, or the site banner when the entry defines none.
pub fn image_list(entry: &ContentEntry, site: &SiteMetadata) -> Vec<String> {
    entry
        .image_list()
        .unwrap_or_else(|| vec![site.social_banner.clone()])
}

/// Canonical URL of a project page.
pub fn canonical_url(entry: &ContentEntry, site: &SiteMetadata) -> String {
    match &entry.canonical_url {
        Some(url) => url.clone(),
        None => absolute_url(&site.site_url, &project_href(&entry.slug)),
    }
}

/// Build metadata for one entry.
pub fn build_metadata(entry: &ContentEntry, site: &SiteMetadata) -> PageMetadata {
    let images = image_list(entry, site);
    let og_images = images
        .iter()
        .map(|img| OgImage {
            url: absolute_url(&site.site_url, img),
        })
        .collect();

    PageMetadata {
        title: entry.title.clone(),
        description: entry.summary.clone(),
        open_graph: OpenGraph {
            title: entry.title.clone(),
            description: entry.summary.clone(),
            site_name: site.title.clone(),
            locale: site.locale.clone(),
            kind: "article".to_string(),
            published_time: iso_timestamp(entry.date),
            modified_time: iso_timestamp(entry.modified()),
            url: canonical_url(entry, site),
            images: og_images,
        },
        twitter: TwitterCard {
            card: "summary_large_image".to_string(),
            title: entry.title.clone(),
            description: entry.summary.clone(),
            images,
        },
    }
}

/// Metadata for `slug`, or `None` when no entry in the raw collection has it.
pub fn page_metadata(
    entries: &[ContentEntry],
    slug: &str,
    site: &SiteMetadata,
) -> Option<PageMetadata> {
    find_entry(entries, slug).map(|entry| build_metadata(entry, site))
}
