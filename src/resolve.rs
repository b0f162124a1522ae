//! Slug resolution and prev/next navigation.
//!
//! The collection is always passed in explicitly and never mutated. Two views
//! of it are used per page:
//!
//! - the **raw collection**, every scanned entry (drafts included), used for
//!   metadata and for the entry actually rendered;
//! - the **published list**, drafts removed in production and sorted by date
//!   descending, used to decide whether a page exists and who its neighbors
//!   are.
//!
//! A draft is therefore found by [`find_entry`] but is [`PageError::NotFound`]
//! from [`resolve_page`] in production. Its metadata still resolves.

use crate::layout::Layout;
use crate::slug::split_slug;
use crate::types::{ContentEntry, CoreContent};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PageError {
    #[error("No published project with slug '{0}'")]
    NotFound(String),
}

/// Find the entry whose slug equals `slug`.
pub fn find_entry<'a>(entries: &'a [ContentEntry], slug: &str) -> Option<&'a ContentEntry> {
    entries.iter().find(|e| e.slug == slug)
}

/// Sort entries by publish date, newest first. Equal dates keep input order.
pub fn sort_by_date_desc(entries: &mut [&ContentEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// The publicly navigable list: drafts removed when `production` is set,
/// sorted newest first.
pub fn published(entries: &[ContentEntry], production: bool) -> Vec<&ContentEntry> {
    let mut list: Vec<&ContentEntry> = entries
        .iter()
        .filter(|e| !(production && e.draft))
        .collect();
    sort_by_date_desc(&mut list);
    list
}

/// Position of `slug` in a published list.
pub fn position(list: &[&ContentEntry], slug: &str) -> Option<usize> {
    list.iter().position(|e| e.slug == slug)
}

/// Chronological neighbors of one entry in a date-descending list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbors<'a> {
    /// The older entry (`index + 1`).
    pub prev: Option<&'a ContentEntry>,
    /// The newer entry (`index - 1`).
    pub next: Option<&'a ContentEntry>,
}

/// Neighbors of the entry at `index` in a date-descending list.
pub fn neighbors<'a>(list: &[&'a ContentEntry], index: usize) -> Neighbors<'a> {
    Neighbors {
        prev: list.get(index + 1).copied(),
        next: index.checked_sub(1).and_then(|i| list.get(i)).copied(),
    }
}

/// Everything a layout needs to render one project page.
#[derive(Debug, Clone)]
pub struct ProjectPage<'a> {
    pub entry: &'a ContentEntry,
    pub layout: Layout,
    pub content: CoreContent,
    pub prev: Option<CoreContent>,
    pub next: Option<CoreContent>,
}

/// Resolve a slug to a renderable page.
///
/// The slug must be present in the published list; otherwise the request is
/// `NotFound`, even when the raw collection holds the entry.
pub fn resolve_page<'a>(
    entries: &'a [ContentEntry],
    slug: &str,
    production: bool,
) -> Result<ProjectPage<'a>, PageError> {
    let list = published(entries, production);
    let index = position(&list, slug).ok_or_else(|| PageError::NotFound(slug.to_string()))?;
    let around = neighbors(&list, index);
    let entry = find_entry(entries, slug).ok_or_else(|| PageError::NotFound(slug.to_string()))?;

    Ok(ProjectPage {
        entry,
        layout: Layout::select(entry.layout.as_deref()),
        content: entry.core(),
        prev: around.prev.map(ContentEntry::core),
        next: around.next.map(ContentEntry::core),
    })
}

/// Every slug as percent-encoded route segments, for build-time
/// pre-generation. [`decode_slug`](crate::slug::decode_slug) turns each path
/// back into its slug.
///
/// Drafts are included; whether a path renders is decided by [`resolve_page`].
pub fn static_paths(entries: &[ContentEntry]) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|e| {
            split_slug(&e.slug)
                .iter()
                .map(|segment| urlencoding::encode(segment).into_owned())
                .collect()
        })
        .collect()
}
