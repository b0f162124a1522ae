//! # Folio
//!
//! A minimal static site generator for project portfolio pages. Each project
//! is a markdown file with TOML front matter; the generator turns the
//! collection into one page per project, with newest-first prev/next
//! navigation and the Open Graph and Twitter card metadata link previews need.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (markdown files → structured entries)
//! 2. Generate  manifest  →  dist/            (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON, so the collection the generator sees
//! can be inspected between stages.
//!
//! Everything between the manifest and the HTML is pure: slug lookup,
//! draft filtering, date ordering, neighbor selection, layout choice and
//! metadata derivation are functions of the entry collection and the site
//! config, and never touch the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the projects directory and produces the manifest |
//! | [`generate`] | Stage 2: renders project pages with Maud |
//! | [`resolve`] | Slug lookup, published ordering, prev/next neighbors |
//! | [`metadata`] | Page title, description, Open Graph and Twitter card data |
//! | [`layout`] | The closed set of page layouts and name-based selection |
//! | [`slug`] | Slug derivation from paths and decoding from route segments |
//! | [`frontmatter`] | `+++` TOML front matter and timestamp parsing |
//! | [`markdown`] | Markdown to HTML with heading anchors and a table of contents |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Entry types serialized in the manifest |
//! | [`output`] | CLI output formatting |
//!
//! # Content Layout
//!
//! ```text
//! content/
//! ├── config.toml                 # Site config (optional)
//! ├── static/                     # Copied to dist/static/
//! └── projects/
//!     ├── 010-folio.md            # slug "folio"
//!     └── web/
//!         └── tiny-http.md        # slug "web/tiny-http"
//! ```

pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod layout;
pub mod markdown;
pub mod metadata;
pub mod output;
pub mod resolve;
pub mod scan;
pub mod slug;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
