//! Content scanning and manifest generation.
//!
//! Stage 1 of the build. Walks the projects directory, parses each markdown
//! file's front matter, compiles its body, and produces a [`Manifest`] that
//! the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── static/                      # Copied verbatim to dist/static/
//! │   └── images/folio.png
//! └── projects/
//!     ├── 010-folio.md             # slug "folio" (NNN- prefix stripped)
//!     ├── weather-station.md       # slug "weather-station"
//!     └── web/
//!         └── tiny-http.md         # slug "web/tiny-http"
//! ```
//!
//! Hidden files and directories (leading `.`) are skipped. Only `.md` files
//! are read.
//!
//! ## Validation
//!
//! - Every project must open with a `+++` front matter block
//! - `title` and `date` are required; dates must parse
//! - Slugs must be unique across the collection

use crate::config::{self, SiteConfig};
use crate::frontmatter::{parse_front_matter, parse_timestamp, split_front_matter};
use crate::markdown;
use crate::slug::{is_valid_slug, slug_from_path};
use crate::types::ContentEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("No +++ front matter block in {0}")]
    MissingFrontMatter(PathBuf),
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid date '{value}' in {path}")]
    InvalidDate { path: PathBuf, value: String },
    #[error("Cannot derive a slug for {0}")]
    InvalidSlug(PathBuf),
    #[error("Duplicate slug '{slug}': {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Manifest passed from scan to generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub projects: Vec<ContentEntry>,
    pub config: SiteConfig,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    // Uses defaults if config.toml doesn't exist
    let config = config::load_config(root)?;

    let projects_root = root.join(&config.projects_dir);
    let projects = if projects_root.is_dir() {
        scan_projects(&projects_root)?
    } else {
        Vec::new()
    };

    Ok(Manifest { projects, config })
}

fn scan_projects(dir: &Path) -> Result<Vec<ContentEntry>, ScanError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut projects = Vec::with_capacity(files.len());
    for path in &files {
        let relative = path.strip_prefix(dir).unwrap_or(path);
        let project = load_project(path, relative)?;
        if let Some(first) = seen.insert(project.slug.clone(), relative.to_path_buf()) {
            return Err(ScanError::DuplicateSlug {
                slug: project.slug,
                first,
                second: relative.to_path_buf(),
            });
        }
        projects.push(project);
    }
    Ok(projects)
}

/// Read one project file into a [`ContentEntry`].
///
/// `relative` is the path under the projects directory; it is used for the
/// derived slug, `source_path`, and error messages.
pub fn load_project(path: &Path, relative: &Path) -> Result<ContentEntry, ScanError> {
    let content = fs::read_to_string(path)?;
    let (front, body) = split_front_matter(&content)
        .ok_or_else(|| ScanError::MissingFrontMatter(relative.to_path_buf()))?;
    let fm = parse_front_matter(front).map_err(|source| ScanError::FrontMatter {
        path: relative.to_path_buf(),
        source,
    })?;

    let timestamp = |value: &str| {
        parse_timestamp(value).ok_or_else(|| ScanError::InvalidDate {
            path: relative.to_path_buf(),
            value: value.to_string(),
        })
    };
    let date = timestamp(&fm.date)?;
    let lastmod = fm.lastmod.as_deref().map(timestamp).transpose()?;

    let slug = match fm.slug.as_deref().map(|s| s.trim_matches('/')) {
        Some(explicit) if !explicit.is_empty() => explicit.to_string(),
        Some(_) => return Err(ScanError::InvalidSlug(relative.to_path_buf())),
        None => {
            slug_from_path(relative).ok_or_else(|| ScanError::InvalidSlug(relative.to_path_buf()))?
        }
    };

    if !is_valid_slug(&slug) {
        return Err(ScanError::InvalidSlug(relative.to_path_buf()));
    }

    let compiled = markdown::compile(body);

    Ok(ContentEntry {
        slug,
        title: fm.title,
        summary: fm.summary.unwrap_or_default(),
        date,
        lastmod,
        images: fm.images,
        layout: fm.layout,
        draft: fm.draft,
        tags: fm.tags,
        canonical_url: fm.canonical_url,
        source_path: display_path(relative),
        body: compiled.html,
        toc: compiled.toc,
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// `/`-separated form of a relative path, independent of platform.
fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn write_project(root: &Path, relative: &str, content: &str) {
        let path = root.join("projects").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn scan_fixtures_finds_all_projects() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();

        let mut slugs: Vec<&str> = manifest.projects.iter().map(|p| p.slug.as_str()).collect();
        slugs.sort();
        assert_eq!(
            slugs,
            vec!["folio", "secret-lab", "weather-station", "web/tiny-http"]
        );
    }

    #[test]
    fn fixture_fields_are_parsed() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();

        let folio = find_project(&manifest, "folio");
        assert_eq!(folio.title, "Folio");
        assert_eq!(folio.layout.as_deref(), Some("ProjectSimple"));
        assert_eq!(folio.source_path, "010-folio.md");
        assert!(folio.body.contains("<h2 id=\"why\">"));
        assert!(!folio.toc.is_empty());

        let tiny = find_project(&manifest, "web/tiny-http");
        assert!(tiny.lastmod.is_some());
        assert_eq!(tiny.source_path, "web/tiny-http.md");

        assert!(find_project(&manifest, "secret-lab").draft);
    }

    #[test]
    fn config_loaded_from_fixtures() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.config.site.site_url, "https://jane.dev");
        assert_eq!(manifest.config.render.max_workers, Some(2));
    }

    #[test]
    fn missing_projects_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let manifest = scan(tmp.path()).unwrap();
        assert!(manifest.projects.is_empty());
        assert_eq!(manifest.config.site.title, "Portfolio");
    }

    #[test]
    fn non_markdown_and_hidden_files_ignored() {
        let tmp = TempDir::new().unwrap();
        write_project(tmp.path(), "a.md", "+++\ntitle = \"A\"\ndate = 2023-01-01\n+++\n");
        write_project(tmp.path(), "notes.txt", "not a project");
        write_project(tmp.path(), ".hidden/b.md", "garbage");
        write_project(tmp.path(), ".c.md", "garbage");

        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.projects.len(), 1);
        assert_eq!(manifest.projects[0].slug, "a");
    }

    #[test]
    fn explicit_slug_overrides_path() {
        let tmp = TempDir::new().unwrap();
        write_project(
            tmp.path(),
            "020-long-file-name.md",
            "+++\ntitle = \"A\"\ndate = 2023-01-01\nslug = \"/short/\"\n+++\n",
        );
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.projects[0].slug, "short");
    }

    #[test]
    fn duplicate_slug_is_error() {
        let tmp = TempDir::new().unwrap();
        write_project(tmp.path(), "010-a.md", "+++\ntitle = \"A\"\ndate = 2023-01-01\n+++\n");
        write_project(tmp.path(), "020-a.md", "+++\ntitle = \"B\"\ndate = 2023-01-02\n+++\n");

        let result = scan(tmp.path());
        assert!(matches!(
            result,
            Err(ScanError::DuplicateSlug { ref slug, .. }) if slug == "a"
        ));
    }

    #[test]
    fn missing_front_matter_is_error() {
        let tmp = TempDir::new().unwrap();
        write_project(tmp.path(), "a.md", "# No front matter\n");
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::MissingFrontMatter(_))
        ));
    }

    #[test]
    fn bad_front_matter_is_error() {
        let tmp = TempDir::new().unwrap();
        write_project(tmp.path(), "a.md", "+++\ntitle = \"A\"\n+++\n");
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::FrontMatter { .. })
        ));
    }

    #[test]
    fn invalid_date_is_error() {
        let tmp = TempDir::new().unwrap();
        write_project(
            tmp.path(),
            "a.md",
            "+++\ntitle = \"A\"\ndate = \"someday\"\n+++\n",
        );
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::InvalidDate { ref value, .. }) if value == "someday"
        ));
    }

    #[test]
    fn invalid_lastmod_is_error() {
        let tmp = TempDir::new().unwrap();
        write_project(
            tmp.path(),
            "a.md",
            "+++\ntitle = \"A\"\ndate = 2023-01-01\nlastmod = \"nope\"\n+++\n",
        );
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::InvalidDate { .. })
        ));
    }

    #[test]
    fn empty_explicit_slug_is_error() {
        let tmp = TempDir::new().unwrap();
        write_project(
            tmp.path(),
            "a.md",
            "+++\ntitle = \"A\"\ndate = 2023-01-01\nslug = \"/\"\n+++\n",
        );
        assert!(matches!(scan(tmp.path()), Err(ScanError::InvalidSlug(_))));
    }

    #[test]
    fn traversal_slug_is_error() {
        let tmp = TempDir::new().unwrap();
        write_project(
            tmp.path(),
            "a.md",
            "+++\ntitle = \"A\"\ndate = 2023-01-01\nslug = \"../../etc\"\n+++\n",
        );
        assert!(matches!(scan(tmp.path()), Err(ScanError::InvalidSlug(_))));
    }

    #[test]
    fn manifest_roundtrips_through_json() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let json = serde_json::to_string(&manifest).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.projects, manifest.projects);
    }
}
