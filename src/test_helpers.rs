//! Shared test utilities.
//!
//! Entry builders for pure-function tests, and a fixture copier plus lookups
//! for tests that go through the scanner.

use std::path::Path;
use tempfile::TempDir;

use crate::frontmatter::parse_timestamp;
use crate::scan::Manifest;
use crate::types::ContentEntry;

// =========================================================================
// Entry builders
// =========================================================================

/// A published entry with the given slug and `YYYY-MM-DD` date.
pub fn entry(slug: &str, date: &str) -> ContentEntry {
    ContentEntry {
        slug: slug.to_string(),
        title: format!("Project {slug}"),
        summary: format!("Summary of {slug}"),
        date: parse_timestamp(date).unwrap_or_else(|| panic!("bad test date '{date}'")),
        lastmod: None,
        images: None,
        layout: None,
        draft: false,
        tags: Vec::new(),
        canonical_url: None,
        source_path: format!("{slug}.md"),
        body: format!("<p>Body of {slug}</p>"),
        toc: Vec::new(),
    }
}

/// Same as [`entry`] but marked as a draft.
pub fn draft(slug: &str, date: &str) -> ContentEntry {
    ContentEntry {
        draft: true,
        ..entry(slug, date)
    }
}

/// Slugs of a list, in order.
pub fn slugs<'a>(list: &[&'a ContentEntry]) -> Vec<&'a str> {
    list.iter().map(|e| e.slug.as_str()).collect()
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Find a scanned project by slug. Panics if not found.
pub fn find_project<'a>(manifest: &'a Manifest, slug: &str) -> &'a ContentEntry {
    manifest
        .projects
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.projects.iter().map(|p| p.slug.as_str()).collect();
            panic!("project '{slug}' not found. Available: {slugs:?}")
        })
}
