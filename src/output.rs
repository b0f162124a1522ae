//! CLI output formatting for all pipeline stages.
//!
//! Output is information-first: every project line leads with its position
//! in the published order and its title, with the slug and source file as
//! indented context lines.
//!
//! ## Scan
//!
//! ```text
//! Projects (newest first)
//! 001 Folio
//!     Slug: folio
//!     Source: 010-folio.md
//!     Date: 2023-03-01
//! 002 Tiny HTTP
//!     Slug: web/tiny-http
//!     Source: web/tiny-http.md
//!     Date: 2023-01-01
//!     Layout: Nonexistent (unknown, using ProjectBanner)
//!
//! Drafts
//!     Secret Lab (secret-lab.md)
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Folio → projects/folio/index.html [ProjectSimple]
//! 002 Tiny HTTP → projects/web/tiny-http/index.html [ProjectBanner]
//!
//! Skipped (not published)
//!     secret-lab
//!
//! Generated 2 project pages, skipped 1
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::generate::GenerateReport;
use crate::layout::{self, Layout};
use crate::resolve::published;
use crate::scan::Manifest;
use crate::types::ContentEntry;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn project_lines(index: usize, project: &ContentEntry) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", format_index(index), project.title),
        format!("{}Slug: {}", indent(1), project.slug),
        format!("{}Source: {}", indent(1), project.source_path),
        format!("{}Date: {}", indent(1), project.date.format("%Y-%m-%d")),
    ];
    if layout::is_unknown(project.layout.as_deref()) {
        lines.push(format!(
            "{}Layout: {} (unknown, using {})",
            indent(1),
            project.layout.as_deref().unwrap_or_default(),
            Layout::DEFAULT
        ));
    }
    lines
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format the scanned project inventory.
///
/// Published projects are listed newest first; drafts follow in their own
/// section.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();
    let list = published(&manifest.projects, true);

    lines.push("Projects (newest first)".to_string());
    if list.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, project) in list.iter().enumerate() {
        lines.extend(project_lines(i + 1, project));
    }

    let drafts: Vec<&ContentEntry> = manifest.projects.iter().filter(|p| p.draft).collect();
    if !drafts.is_empty() {
        lines.push(String::new());
        lines.push("Drafts".to_string());
        for d in drafts {
            lines.push(format!("{}{} ({})", indent(1), d.title, d.source_path));
        }
    }

    lines.push(String::new());
    lines.push("Site".to_string());
    lines.push(format!("{}{}", indent(1), manifest.config.site.title));
    lines.push(format!("{}{}", indent(1), manifest.config.site.site_url));

    lines
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} → {} [{}]",
            format_index(i + 1),
            page.title,
            page.path,
            page.layout
        ));
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped (not published)".to_string());
        for slug in &report.skipped {
            lines.push(format!("{}{}", indent(1), slug));
        }
    }

    lines.push(String::new());
    let mut summary = format!(
        "Generated {}",
        plural(report.pages.len(), "project page", "project pages")
    );
    if !report.skipped.is_empty() {
        summary.push_str(&format!(", skipped {}", report.skipped.len()));
    }
    lines.push(summary);

    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Static paths
// ============================================================================

/// One line per static path, its percent-encoded segments joined with `/`.
pub fn format_paths(paths: &[Vec<String>]) -> Vec<String> {
    paths.iter().map(|segments| segments.join("/")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::generate::RenderedPage;
    use crate::test_helpers::{draft, entry};

    fn manifest(projects: Vec<ContentEntry>) -> Manifest {
        Manifest {
            projects,
            config: SiteConfig::default(),
        }
    }

    #[test]
    fn scan_output_lists_newest_first() {
        let m = manifest(vec![entry("old", "2022-01-01"), entry("new", "2023-01-01")]);
        let lines = format_scan_output(&m);
        assert_eq!(lines[0], "Projects (newest first)");
        assert_eq!(lines[1], "001 Project new");
        assert_eq!(lines[2], "    Slug: new");
        assert_eq!(lines[5], "002 Project old");
    }

    #[test]
    fn scan_output_warns_about_unknown_layout() {
        let mut e = entry("a", "2023-01-01");
        e.layout = Some("Fancy".to_string());
        let lines = format_scan_output(&manifest(vec![e]));
        assert!(lines.contains(&"    Layout: Fancy (unknown, using ProjectBanner)".to_string()));
    }

    #[test]
    fn scan_output_lists_drafts_separately() {
        let m = manifest(vec![entry("a", "2023-01-01"), draft("wip", "2023-02-01")]);
        let lines = format_scan_output(&m);
        let drafts_at = lines.iter().position(|l| l == "Drafts").unwrap();
        assert_eq!(lines[drafts_at + 1], "    Project wip (wip.md)");
        assert_eq!(lines[1], "001 Project a");
    }

    #[test]
    fn scan_output_empty_collection() {
        let lines = format_scan_output(&manifest(vec![]));
        assert_eq!(lines[1], "    (none)");
    }

    #[test]
    fn generate_output_summarizes() {
        let report = GenerateReport {
            pages: vec![RenderedPage {
                slug: "a".to_string(),
                title: "A".to_string(),
                layout: Layout::ProjectSimple,
                path: "projects/a/index.html".to_string(),
            }],
            skipped: vec!["wip".to_string()],
        };
        let lines = format_generate_output(&report);
        assert_eq!(lines[0], "001 A → projects/a/index.html [ProjectSimple]");
        assert!(lines.contains(&"    wip".to_string()));
        assert_eq!(lines.last().unwrap(), "Generated 1 project page, skipped 1");
    }

    #[test]
    fn paths_join_segments() {
        let paths = vec![
            vec!["web".to_string(), "tiny-http".to_string()],
            vec!["folio".to_string()],
        ];
        assert_eq!(format_paths(&paths), vec!["web/tiny-http", "folio"]);
    }
}
