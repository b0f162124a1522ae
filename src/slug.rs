//! Slug derivation and decoding.
//!
//! A project's slug is its path under the projects directory, minus the
//! extension, with an optional `NNN-` ordering prefix stripped from every
//! segment:
//!
//! - `folio.md` → `folio`
//! - `010-web/020-folio.md` → `web/folio`
//! - `Drafts/notes.md` → `Drafts/notes`
//!
//! Front matter may override the derived slug with an explicit `slug` key.
//! Routes address a project by its slug segments; [`decode_slug`] turns those
//! segments back into the slug they came from.

use std::path::{Component, Path};

/// Strip an optional `NNN-` ordering prefix from a path segment.
///
/// - `"020-folio"` → `"folio"`
/// - `"folio"` → `"folio"`
/// - `"2023-retro"` → `"retro"`
/// - `"020-"` → `"020-"` (a bare prefix is kept as the name)
pub fn strip_order_prefix(name: &str) -> &str {
    match name.split_once('-') {
        Some((prefix, rest))
            if !prefix.is_empty() && !rest.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            rest
        }
        _ => name,
    }
}

/// Derive a slug from a markdown path relative to the projects directory.
///
/// Returns `None` when the path has no usable file stem.
pub fn slug_from_path(relative: &Path) -> Option<String> {
    let stem_path = relative.with_extension("");
    let segments: Vec<String> = stem_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(strip_order_prefix(&s.to_string_lossy()).to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();
    (!segments.is_empty()).then(|| segments.join("/"))
}

/// A slug is usable as an output path: no empty, `.` or `..` segments.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.split('/').all(|s| !s.is_empty() && s != "." && s != "..")
}

/// Split a slug into route segments.
pub fn split_slug(slug: &str) -> Vec<String> {
    slug.split('/').map(String::from).collect()
}

/// Join route segments and percent-decode them back into a slug.
///
/// Malformed escapes (invalid UTF-8 after decoding) leave the joined string
/// undecoded.
pub fn decode_slug<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/");
    match urlencoding::decode(&joined) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => joined,
    }
}
