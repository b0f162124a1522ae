//! HTML site generation.
//!
//! Stage 2 of the build. Reads the scan manifest and writes one HTML page per
//! static path, plus a `404.html`.
//!
//! ## Per-page flow
//!
//! ```text
//! static path ["web", "tiny-http"]     (percent-encoded segments)
//!   → decode_slug         "web/tiny-http"
//!   → resolve_page        entry + layout + prev/next   (NotFound → skipped)
//!   → page_metadata       <head> title, description, og:*, twitter:*
//!   → layout template     dist/projects/web/tiny-http/index.html
//! ```
//!
//! Pages are independent, so they are rendered in parallel on the global
//! rayon pool. The manifest is shared read-only.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── 404.html
//! ├── static/                    # Copied from content/static/
//! └── projects/
//!     ├── folio/index.html
//!     └── web/
//!         └── tiny-http/index.html
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! The compiled project body is inserted pre-escaped; every other value is
//! auto-escaped.

use crate::config::{SiteConfig, SiteMetadata};
use crate::layout::Layout;
use crate::metadata::{PageMetadata, iso_timestamp, page_metadata};
use crate::resolve::{PageError, ProjectPage, resolve_page, static_paths};
use crate::scan::Manifest;
use crate::slug::{decode_slug, split_slug};
use crate::types::CoreContent;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One written project page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub slug: String,
    pub title: String,
    pub layout: Layout,
    /// Output file, relative to the output directory.
    pub path: String,
}

/// What a generate run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateReport {
    pub pages: Vec<RenderedPage>,
    /// Static paths with no published page (drafts in production).
    pub skipped: Vec<String>,
}

enum Outcome {
    Written(RenderedPage),
    Skipped(String),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Read the manifest at `manifest_path` and write the site into `output_dir`.
///
/// `source_root` is the content root; its `static/` directory, if present,
/// is copied to `output_dir/static/`. With `production` set, drafts are not
/// rendered.
pub fn generate(
    manifest_path: &Path,
    source_root: &Path,
    output_dir: &Path,
    production: bool,
) -> Result<GenerateReport, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_site(&manifest, source_root, output_dir, production)
}

/// Write the site for an already-loaded manifest.
pub fn generate_site(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
    production: bool,
) -> Result<GenerateReport, GenerateError> {
    let css = site_css(&manifest.config);

    fs::create_dir_all(output_dir)?;

    let static_src = source_root.join("static");
    if static_src.is_dir() {
        copy_static(&static_src, &output_dir.join("static"))?;
    }

    let not_found = render_not_found(&manifest.config, &css);
    fs::write(output_dir.join("404.html"), not_found.into_string())?;

    let outcomes = static_paths(&manifest.projects)
        .par_iter()
        .map(|segments| render_path(manifest, segments, output_dir, production, &css))
        .collect::<Result<Vec<_>, _>>()?;

    let mut report = GenerateReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Written(page) => report.pages.push(page),
            Outcome::Skipped(slug) => report.skipped.push(slug),
        }
    }
    Ok(report)
}

fn render_path(
    manifest: &Manifest,
    segments: &[String],
    output_dir: &Path,
    production: bool,
    css: &str,
) -> Result<Outcome, GenerateError> {
    let slug = decode_slug(segments);
    let page = match resolve_page(&manifest.projects, &slug, production) {
        Ok(page) => page,
        Err(PageError::NotFound(slug)) => return Ok(Outcome::Skipped(slug)),
    };
    let meta = page_metadata(&manifest.projects, &slug, &manifest.config.site);
    let markup = render_project_page(&page, meta.as_ref(), &manifest.config, css);

    let relative = page_output_path(&split_slug(&slug));
    let file = output_dir.join(&relative);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file, markup.into_string())?;

    Ok(Outcome::Written(RenderedPage {
        slug,
        title: page.entry.title.clone(),
        layout: page.layout,
        path: relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    }))
}

/// `projects/<segments...>/index.html`
pub fn page_output_path(segments: &[String]) -> PathBuf {
    let mut path = PathBuf::from("projects");
    path.extend(segments);
    path.join("index.html")
}

fn site_css(config: &SiteConfig) -> String {
    format!("{}\n\n{}", config.css_variables(), CSS_STATIC)
}

/// Mirror `src` into `dst`, creating directories as needed.
fn copy_static(src: &Path, dst: &Path) -> Result<(), GenerateError> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure.
///
/// Without metadata the head falls back to the site description.
fn base_document(
    title: &str,
    meta: Option<&PageMetadata>,
    site: &SiteMetadata,
    css: &str,
    body_class: &str,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some(meta) = meta {
                    (meta_tags(meta))
                } @else {
                    meta name="description" content=(site.description);
                }
                style { (PreEscaped(css)) }
            }
            body class=(body_class) {
                (site_header(site))
                (content)
            }
        }
    }
}

/// Description, canonical link, Open Graph and Twitter card tags.
pub fn meta_tags(meta: &PageMetadata) -> Markup {
    let og = &meta.open_graph;
    let tw = &meta.twitter;
    html! {
        meta name="description" content=(meta.description);
        link rel="canonical" href=(og.url);
        meta property="og:title" content=(og.title);
        meta property="og:description" content=(og.description);
        meta property="og:site_name" content=(og.site_name);
        meta property="og:locale" content=(og.locale);
        meta property="og:type" content=(og.kind);
        meta property="og:url" content=(og.url);
        meta property="article:published_time" content=(og.published_time);
        meta property="article:modified_time" content=(og.modified_time);
        @for image in &og.images {
            meta property="og:image" content=(image.url);
        }
        meta name="twitter:card" content=(tw.card);
        meta name="twitter:title" content=(tw.title);
        meta name="twitter:description" content=(tw.description);
        @for image in &tw.images {
            meta name="twitter:image" content=(image);
        }
    }
}

fn site_header(site: &SiteMetadata) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (site.title) }
        }
    }
}

fn page_title(title: &str, site: &SiteMetadata) -> String {
    format!("{} | {}", title, site.title)
}

/// Publish date line; shows the update date when it differs.
fn dateline(content: &CoreContent) -> Markup {
    let updated = content.lastmod.filter(|m| *m != content.date);
    html! {
        p.dateline {
            time datetime=(iso_timestamp(content.date)) {
                (content.date.format("%B %-d, %Y"))
            }
            @if let Some(updated) = updated {
                " · updated "
                time datetime=(iso_timestamp(updated)) {
                    (updated.format("%B %-d, %Y"))
                }
            }
        }
    }
}

fn tag_list(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tags {
                @for tag in tags {
                    li { (tag) }
                }
            }
        }
    }
}

fn table_of_contents(content: &CoreContent) -> Markup {
    html! {
        @if !content.toc.is_empty() {
            nav.toc aria-label="Table of contents" {
                h2 { "Contents" }
                ul {
                    @for heading in &content.toc {
                        li class={ "toc-depth-" (heading.depth) } {
                            a href={ "#" (heading.id) } { (heading.text) }
                        }
                    }
                }
            }
        }
    }
}

/// Previous (older) and next (newer) project links.
fn pager(prev: Option<&CoreContent>, next: Option<&CoreContent>) -> Markup {
    html! {
        @if prev.is_some() || next.is_some() {
            nav.pager {
                @if let Some(prev) = prev {
                    a.pager-prev href=(prev.href()) rel="prev" {
                        span.pager-label { "← Previous" }
                        span.pager-title { (prev.title) }
                    }
                }
                @if let Some(next) = next {
                    a.pager-next href=(next.href()) rel="next" {
                        span.pager-label { "Next →" }
                        span.pager-title { (next.title) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders one project page with its selected layout.
pub fn render_project_page(
    page: &ProjectPage,
    meta: Option<&PageMetadata>,
    config: &SiteConfig,
    css: &str,
) -> Markup {
    let content = match page.layout {
        Layout::ProjectSimple => layout_simple(page),
        Layout::ProjectBanner => layout_banner(page),
    };
    base_document(
        &page_title(&page.content.title, &config.site),
        meta,
        &config.site,
        css,
        page.layout.body_class(),
        content,
    )
}

fn layout_simple(page: &ProjectPage) -> Markup {
    let content = &page.content;
    html! {
        main.project-page {
            article.project {
                header.project-header {
                    h1 { (content.title) }
                    (dateline(content))
                    (tag_list(&content.tags))
                }
                (table_of_contents(content))
                div.project-body {
                    (PreEscaped(&page.entry.body))
                }
            }
            (pager(page.prev.as_ref(), page.next.as_ref()))
        }
    }
}

fn layout_banner(page: &ProjectPage) -> Markup {
    let content = &page.content;
    let banner = page
        .entry
        .image_list()
        .and_then(|images| images.into_iter().next());
    html! {
        main.project-page {
            article.project {
                @if let Some(banner) = banner {
                    figure.banner {
                        img src=(banner) alt=(content.title);
                    }
                }
                header.project-header {
                    h1 { (content.title) }
                    (dateline(content))
                    @if !content.summary.is_empty() {
                        p.summary { (content.summary) }
                    }
                    (tag_list(&content.tags))
                }
                div.project-body {
                    (PreEscaped(&page.entry.body))
                }
            }
            (pager(page.prev.as_ref(), page.next.as_ref()))
        }
    }
}

/// The page served for paths with no published project.
fn render_not_found(config: &SiteConfig, css: &str) -> Markup {
    let content = html! {
        main.not-found {
            h1 { "404" }
            p { "This project could not be found." }
            a href="/" { "Back home" }
        }
    };
    base_document(
        &page_title("Not Found", &config.site),
        None,
        &config.site,
        css,
        "not-found-page",
        content,
    )
}

// ============================================================================
// Tests
// ============================================================================
