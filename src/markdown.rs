//! Markdown compilation for project bodies.
//!
//! Bodies are compiled once during scan with `pulldown-cmark`. A fixed set of
//! [`Components`] adjusts the generated HTML:
//!
//! | Component | Effect |
//! |-----------|--------|
//! | heading anchors | every heading gets a unique `id`, collected into the TOC |
//! | external links | `http(s)://` links open in a new tab with `rel="noopener noreferrer"` |
//! | lazy images | `<img>` tags get `loading="lazy"` |

use crate::types::TocEntry;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};
use pulldown_cmark_escape::{escape_href, escape_html};
use std::collections::HashSet;
use std::fmt;

/// Markup substitutions applied while compiling a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Components {
    pub heading_anchors: bool,
    pub external_links: bool,
    pub lazy_images: bool,
}

impl Default for Components {
    fn default() -> Self {
        Self {
            heading_anchors: true,
            external_links: true,
            lazy_images: true,
        }
    }
}

/// A compiled body and its table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Compile markdown to HTML with the default components.
pub fn compile(source: &str) -> Compiled {
    compile_with(source, Components::default())
}

pub fn compile_with(source: &str, components: Components) -> Compiled {
    let mut events: Vec<Event> = Parser::new_ext(source, parser_options()).collect();

    let toc = if components.heading_anchors {
        assign_heading_ids(&mut events)
    } else {
        Vec::new()
    };

    let events = events.into_iter().map(|event| {
        if let Event::Start(Tag::Link {
            dest_url, title, ..
        }) = &event
        {
            if components.external_links && is_external(dest_url) {
                if let Ok(tag) = external_link_open(dest_url, title) {
                    return Event::InlineHtml(CowStr::from(tag));
                }
            }
        }
        event
    });

    let mut html = String::new();
    md_html::push_html(&mut html, events);

    if components.lazy_images {
        html = html.replace("<img ", "<img loading=\"lazy\" ");
    }

    Compiled { html, toc }
}

/// Give every heading an id and return the headings in document order.
///
/// Explicit `{#id}` attributes win over generated ids. Duplicates get the
/// first free numeric suffix (`intro`, `intro-1`, ...), so no two headings
/// share an id.
fn assign_heading_ids(events: &mut [Event]) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    let mut used: HashSet<String> = HashSet::new();

    let mut i = 0;
    while i < events.len() {
        let (level, explicit) = match &events[i] {
            Event::Start(Tag::Heading { level, id, .. }) => {
                (*level, id.as_ref().map(|s| s.to_string()))
            }
            _ => {
                i += 1;
                continue;
            }
        };

        let mut text = String::new();
        let mut end = i + 1;
        while end < events.len() {
            match &events[end] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            end += 1;
        }

        let base = explicit.unwrap_or_else(|| anchor_for(&text));
        let anchor = unique_anchor(base, &mut used);
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor.clone()));
        }
        toc.push(TocEntry {
            depth: level as u8,
            text: text.trim().to_string(),
            id: anchor,
        });
        i = end + 1;
    }
    toc
}

/// Lowercase, alphanumerics kept, everything else collapsed to single dashes.
pub fn anchor_for(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    for c in text.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            anchor.push(c);
        } else if !anchor.ends_with('-') && !anchor.is_empty() {
            anchor.push('-');
        }
    }
    let anchor = anchor.trim_end_matches('-').to_string();
    if anchor.is_empty() {
        "section".to_string()
    } else {
        anchor
    }
}

fn unique_anchor(base: String, used: &mut HashSet<String>) -> String {
    let mut anchor = base.clone();
    let mut n = 1;
    while used.contains(&anchor) {
        anchor = format!("{base}-{n}");
        n += 1;
    }
    used.insert(anchor.clone());
    anchor
}

fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Opening `<a>` tag for an external link. The href goes through the same
/// escaping pulldown-cmark applies to its own links.
fn external_link_open(url: &str, title: &str) -> Result<String, fmt::Error> {
    let mut tag = String::from("<a href=\"");
    escape_href(&mut tag, url)?;
    tag.push('"');
    if !title.is_empty() {
        tag.push_str(" title=\"");
        escape_html(&mut tag, title)?;
        tag.push('"');
    }
    tag.push_str(" target=\"_blank\" rel=\"noopener noreferrer\">");
    Ok(tag)
}
