//! Project page layout variants.
//!
//! The set of layouts is closed. A project names its layout in front matter;
//! absent or unrecognized names fall back to [`Layout::DEFAULT`].

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Title, date, optional table of contents, body.
    ProjectSimple,
    /// Full-width banner image above the title, then body.
    ProjectBanner,
}

impl Layout {
    pub const DEFAULT: Layout = Layout::ProjectBanner;
    pub const ALL: &'static [Layout] = &[Layout::ProjectSimple, Layout::ProjectBanner];

    pub fn name(self) -> &'static str {
        match self {
            Layout::ProjectSimple => "ProjectSimple",
            Layout::ProjectBanner => "ProjectBanner",
        }
    }

    /// Look up a layout by its exact name.
    pub fn from_name(name: &str) -> Option<Layout> {
        Self::ALL.iter().copied().find(|l| l.name() == name)
    }

    /// Select the layout for an entry. Never fails.
    pub fn select(name: Option<&str>) -> Layout {
        name.and_then(Self::from_name).unwrap_or(Self::DEFAULT)
    }

    /// CSS class applied to the page `<body>`.
    pub fn body_class(self) -> &'static str {
        match self {
            Layout::ProjectSimple => "layout-simple",
            Layout::ProjectBanner => "layout-banner",
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True if `name` is set but does not match any known layout.
pub fn is_unknown(name: Option<&str>) -> bool {
    name.is_some_and(|n| Layout::from_name(n).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_select_their_layout() {
        assert_eq!(Layout::select(Some("ProjectSimple")), Layout::ProjectSimple);
        assert_eq!(Layout::select(Some("ProjectBanner")), Layout::ProjectBanner);
    }

    #[test]
    fn absent_or_unknown_selects_default() {
        assert_eq!(Layout::select(None), Layout::ProjectBanner);
        assert_eq!(Layout::select(Some("Nonexistent")), Layout::ProjectBanner);
        assert_eq!(Layout::select(Some("projectsimple")), Layout::ProjectBanner);
    }

    #[test]
    fn names_roundtrip() {
        for layout in Layout::ALL {
            assert_eq!(Layout::from_name(layout.name()), Some(*layout));
            assert_eq!(layout.to_string(), layout.name());
        }
    }

    #[test]
    fn unknown_detection() {
        assert!(is_unknown(Some("Fancy")));
        assert!(!is_unknown(Some("ProjectSimple")));
        assert!(!is_unknown(None));
    }
}
