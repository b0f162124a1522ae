//! Site configuration.
//!
//! One optional `config.toml` at the content root, layered over the stock
//! defaults. A file only needs the keys it changes; unknown keys are errors.
//! Per-project choices (layout, images, canonical URL) belong in front matter.
//!
//! ```toml
//! projects_dir = "projects"
//!
//! [site]
//! title = "Portfolio"
//! site_url = "https://example.com"
//! description = "Selected projects"
//! social_banner = "/static/images/twitter-card.png"
//! locale = "en_US"
//! language = "en"
//!
//! [theme]
//! content_width = "48rem"
//! gutter = { min = "1rem", size = "4vw", max = "3rem" }
//!
//! [colors.light]   # and [colors.dark]
//! background = "#fdfcfa"
//! foreground = "#1c1b19"
//! muted = "#6b6760"
//! rule = "#e6e2da"
//! accent = "#1d4ed8"
//! accent_hover = "#1e3a8a"
//!
//! [render]
//! max_workers = 4   # omit for one worker per CPU core
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the content root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory under the content root holding project markdown.
    pub projects_dir: String,
    pub site: SiteMetadata,
    pub theme: ThemeConfig,
    pub colors: ColorConfig,
    pub render: RenderConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            projects_dir: "projects".to_string(),
            site: SiteMetadata::default(),
            theme: ThemeConfig::default(),
            colors: ColorConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Reject values that would produce broken pages or URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.site.site_url.as_str();
        let required = [
            ("projects_dir", self.projects_dir.as_str()),
            ("site.title", self.site.title.as_str()),
            ("site.locale", self.site.locale.as_str()),
            ("site.language", self.site.language.as_str()),
        ];
        if let Some((key, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::Validation(format!("{key} must not be empty")));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Validation(format!(
                "site.site_url must be an http(s) URL, got '{url}'"
            )));
        }
        Ok(())
    }

    /// Inline CSS custom properties for the palette and theme.
    pub fn css_variables(&self) -> String {
        format!(
            "{}\n\n{}",
            generate_color_css(&self.colors),
            generate_theme_css(&self.theme)
        )
    }
}

/// Defaults for every page head.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMetadata {
    /// `og:site_name` and the `<title>` suffix.
    pub title: String,
    /// Base for canonical URLs and absolute Open Graph images.
    pub site_url: String,
    /// Head description of pages without a project (the 404 page).
    pub description: String,
    /// Preview image for projects that list none.
    pub social_banner: String,
    pub locale: String,
    /// `<html lang>`.
    pub language: String,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            site_url: "https://example.com".to_string(),
            description: "Selected projects".to_string(),
            social_banner: "/static/images/twitter-card.png".to_string(),
            locale: "en_US".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Page rendering fan-out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Upper bound on parallel page renderers. `None` means one per core.
    pub max_workers: Option<usize>,
}

/// Worker count for the rayon pool: `max_workers` clamped to `1..=cores`.
pub fn effective_threads(config: &RenderConfig) -> usize {
    let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
    match config.max_workers {
        Some(n) => n.clamp(1, cores),
        None => cores,
    }
}

/// `clamp(min, size, max)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClampSize {
    pub min: String,
    pub size: String,
    pub max: String,
}

impl ClampSize {
    pub fn to_css(&self) -> String {
        format!("clamp({}, {}, {})", self.min, self.size, self.max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Max width of the article column.
    pub content_width: String,
    /// Horizontal page padding.
    pub gutter: ClampSize,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            content_width: "48rem".to_string(),
            gutter: ClampSize {
                min: "1rem".to_string(),
                size: "4vw".to_string(),
                max: "3rem".to_string(),
            },
        }
    }
}

/// Palettes applied by `prefers-color-scheme`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::light(),
            dark: ColorScheme::dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub foreground: String,
    /// Dates, tags and pager labels.
    pub muted: String,
    /// Borders and separators.
    pub rule: String,
    /// Links.
    pub accent: String,
    pub accent_hover: String,
}

impl ColorScheme {
    pub fn light() -> Self {
        Self {
            background: "#fdfcfa".to_string(),
            foreground: "#1c1b19".to_string(),
            muted: "#6b6760".to_string(),
            rule: "#e6e2da".to_string(),
            accent: "#1d4ed8".to_string(),
            accent_hover: "#1e3a8a".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#121110".to_string(),
            foreground: "#ebe8e2".to_string(),
            muted: "#a19c92".to_string(),
            rule: "#2e2c29".to_string(),
            accent: "#93c5fd".to_string(),
            accent_hover: "#dbeafe".to_string(),
        }
    }

    /// `--color-*` custom properties, one declaration per line.
    fn declarations(&self, indent: &str) -> String {
        [
            ("bg", &self.background),
            ("fg", &self.foreground),
            ("muted", &self.muted),
            ("rule", &self.rule),
            ("accent", &self.accent),
            ("accent-hover", &self.accent_hover),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}--color-{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::light()
    }
}

// =============================================================================
// Loading
// =============================================================================

/// The defaults as a TOML table, the layer user files are merged onto.
pub fn stock_defaults_value() -> Result<toml::Table, ConfigError> {
    match toml::Value::try_from(SiteConfig::default()) {
        Ok(toml::Value::Table(table)) => Ok(table),
        Ok(other) => Err(ConfigError::Validation(format!(
            "default config serialized to a {}, not a table",
            other.type_str()
        ))),
        Err(e) => Err(ConfigError::Validation(format!(
            "default config does not serialize: {e}"
        ))),
    }
}

/// Merge `overlay` into `base` in place.
///
/// Nested tables merge key by key; any other overlay value replaces the base
/// value outright.
pub fn merge_toml(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let toml::Value::Table(nested) = value else {
            base.insert(key, value);
            continue;
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge_toml(existing, nested);
            continue;
        }
        base.insert(key, toml::Value::Table(nested));
    }
}

/// Read `<root>/config.toml`, or `None` when there is none.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Table>, ConfigError> {
    match fs::read_to_string(root.join(CONFIG_FILE)) {
        Ok(content) => Ok(Some(content.parse::<toml::Table>()?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Layer `overlay` over `base`, deserialize, and validate.
pub fn resolve_config(
    mut base: toml::Table,
    overlay: Option<toml::Table>,
) -> Result<SiteConfig, ConfigError> {
    if let Some(overlay) = overlay {
        merge_toml(&mut base, overlay);
    }
    let config: SiteConfig = toml::Value::Table(base).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config for a content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(root)?)
}

/// A commented `config.toml` listing every option at its default.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio site configuration
#
# Put this file at content/config.toml. Every key is optional and the values
# below are the defaults; delete what you don't change. Misspelled keys are
# reported as errors.

# Where project markdown lives, relative to the content root.
projects_dir = "projects"

[site]
# Shown as og:site_name and after every page title.
title = "Portfolio"
# Canonical URLs and Open Graph images are built from this.
site_url = "https://example.com"
# Head description for pages that are not a project, such as the 404 page.
description = "Selected projects"
# Link-preview image for projects that list no images.
social_banner = "/static/images/twitter-card.png"
locale = "en_US"
language = "en"

[theme]
content_width = "48rem"

# Horizontal page padding: clamp(min, size, max).
[theme.gutter]
min = "1rem"
size = "4vw"
max = "3rem"

# Palette used when the reader prefers a light color scheme.
[colors.light]
background = "#fdfcfa"
foreground = "#1c1b19"
muted = "#6b6760"
rule = "#e6e2da"
accent = "#1d4ed8"
accent_hover = "#1e3a8a"

# Palette used when the reader prefers a dark color scheme.
[colors.dark]
background = "#121110"
foreground = "#ebe8e2"
muted = "#a19c92"
rule = "#2e2c29"
accent = "#93c5fd"
accent_hover = "#dbeafe"

[render]
# Pages are rendered in parallel. Leave unset for one worker per CPU core;
# larger values are capped at the core count.
# max_workers = 4
"##
}

/// Light palette on `:root`, dark palette inside a `prefers-color-scheme` query.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root {{\n{}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
        colors.light.declarations("    "),
        colors.dark.declarations("        "),
    )
}

pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        ":root {{\n    --content-width: {};\n    --gutter: {};\n}}",
        theme.content_width,
        theme.gutter.to_css()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), content).unwrap();
        tmp
    }

    #[test]
    fn defaults_describe_a_generic_portfolio() {
        let config = SiteConfig::default();
        assert_eq!(config.projects_dir, "projects");
        assert_eq!(config.site.locale, "en_US");
        assert_eq!(config.site.social_banner, "/static/images/twitter-card.png");
        assert_eq!(config.render.max_workers, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Portfolio");
    }

    #[test]
    fn file_overrides_only_what_it_names() {
        let tmp = write_config(
            "[site]\nsite_url = \"https://jane.dev\"\n\n[colors.dark]\naccent = \"#ff0000\"\n",
        );
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.site_url, "https://jane.dev");
        assert_eq!(config.site.title, "Portfolio");
        assert_eq!(config.colors.dark.accent, "#ff0000");
        assert_eq!(config.colors.dark.background, "#121110");
        assert_eq!(config.colors.light.accent, "#1d4ed8");
    }

    #[test]
    fn nested_tables_merge_key_by_key() {
        let mut base = stock_defaults_value().unwrap();
        let overlay: toml::Table = "[theme.gutter]\nmax = \"5rem\"\n".parse().unwrap();
        merge_toml(&mut base, overlay);
        let config = resolve_config(base, None).unwrap();
        assert_eq!(config.theme.gutter.to_css(), "clamp(1rem, 4vw, 5rem)");
        assert_eq!(config.theme.content_width, "48rem");
    }

    #[test]
    fn scalar_overlay_replaces_base() {
        let mut base: toml::Table = "a = 1\nb = { c = 2 }\n".parse().unwrap();
        merge_toml(&mut base, "b = 3\n".parse().unwrap());
        assert_eq!(base["a"].as_integer(), Some(1));
        assert_eq!(base["b"].as_integer(), Some(3));
    }

    #[test]
    fn malformed_toml_is_error() {
        let tmp = write_config("[site\ntitle = ");
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn misspelled_key_is_error() {
        let tmp = write_config("[site]\ntitel = \"typo\"\n");
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_is_error() {
        let tmp = write_config("[thumbnails]\nsize = 400\n");
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn non_http_site_url_is_rejected() {
        let tmp = write_config("[site]\nsite_url = \"ftp://example.com\"\n");
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn blank_required_values_are_rejected() {
        let mut config = SiteConfig::default();
        config.site.title = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid config: site.title must not be empty");

        let mut config = SiteConfig::default();
        config.projects_dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn stock_file_parses_to_defaults() {
        let parsed: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(parsed.site.title, defaults.site.title);
        assert_eq!(parsed.site.site_url, defaults.site.site_url);
        assert_eq!(parsed.colors.light.muted, defaults.colors.light.muted);
        assert_eq!(parsed.colors.dark.accent, defaults.colors.dark.accent);
        assert_eq!(parsed.theme.gutter, defaults.theme.gutter);
        assert_eq!(parsed.render.max_workers, None);
    }

    #[test]
    fn color_css_has_both_schemes() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains("    --color-bg: #fdfcfa;"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains("        --color-accent-hover: #dbeafe;"));
    }

    #[test]
    fn theme_css_renders_clamp() {
        let css = generate_theme_css(&ThemeConfig::default());
        assert!(css.contains("--content-width: 48rem;"));
        assert!(css.contains("--gutter: clamp(1rem, 4vw, 3rem);"));
    }

    #[test]
    fn worker_count_is_clamped() {
        let one = RenderConfig {
            max_workers: Some(1),
        };
        let zero = RenderConfig {
            max_workers: Some(0),
        };
        let huge = RenderConfig {
            max_workers: Some(usize::MAX),
        };
        assert_eq!(effective_threads(&one), 1);
        assert_eq!(effective_threads(&zero), 1);
        assert!(effective_threads(&huge) >= 1);
        assert_eq!(effective_threads(&huge), effective_threads(&RenderConfig::default()));
    }
}
