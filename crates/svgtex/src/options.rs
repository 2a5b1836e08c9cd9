//! Render options and their resolution.
//!
//! [`Options`] holds what a caller asked for: every field is optional, and an
//! unset field is filled from the parameters remembered in the document, then
//! from the configured defaults, then from the built-in defaults.
//! [`Options::resolve`] turns the result into [`RenderSettings`], which has no
//! optional fields left.
//!
//! # Example
//!
//! ```
//! # use svgtex::options::Options;
//! let explicit = Options::new().with_fontsize(12);
//! let remembered = Options::new().with_fontsize(11).with_math(true);
//!
//! let settings = explicit.or(&remembered).resolve();
//! assert_eq!(settings.fontsize(), 12);
//! assert!(settings.math());
//! assert_eq!(settings.scale(), 1.0);
//! ```

use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

/// Font size used when nothing else sets one.
pub const DEFAULT_FONTSIZE: u32 = 10;

/// Scale used when nothing else sets one.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Render options as requested by a caller.
///
/// Fields left as `None` fall back to remembered or default values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    preamble: Option<PathBuf>,
    packages: Option<String>,
    fontsize: Option<u32>,
    scale: Option<f64>,
    depth: Option<u32>,
    newline: Option<bool>,
    math: Option<bool>,
}

impl Options {
    /// Creates options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preamble file included before the document body.
    pub fn with_preamble(mut self, preamble: impl Into<PathBuf>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    /// Sets the comma or whitespace separated list of LaTeX packages.
    pub fn with_packages(mut self, packages: impl Into<String>) -> Self {
        self.packages = Some(packages.into());
        self
    }

    /// Sets the font size in points.
    pub fn with_fontsize(mut self, fontsize: u32) -> Self {
        self.fontsize = Some(fontsize);
        self
    }

    /// Sets the scale applied to the typeset output.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the maximum ancestor depth of rendered text elements; `0` is unlimited.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Sets whether runs are joined with forced LaTeX line breaks.
    pub fn with_newline(mut self, newline: bool) -> Self {
        self.newline = Some(newline);
        self
    }

    /// Sets whether content is wrapped in inline math.
    pub fn with_math(mut self, math: bool) -> Self {
        self.math = Some(math);
        self
    }

    pub fn preamble(&self) -> Option<&Path> {
        self.preamble.as_deref()
    }

    pub fn packages(&self) -> Option<&str> {
        self.packages.as_deref()
    }

    pub fn fontsize(&self) -> Option<u32> {
        self.fontsize
    }

    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    pub fn depth(&self) -> Option<u32> {
        self.depth
    }

    pub fn newline(&self) -> Option<bool> {
        self.newline
    }

    pub fn math(&self) -> Option<bool> {
        self.math
    }

    /// Returns these options with every unset field taken from `fallback`.
    pub fn or(&self, fallback: &Options) -> Options {
        Options {
            preamble: self.preamble.clone().or_else(|| fallback.preamble.clone()),
            packages: self.packages.clone().or_else(|| fallback.packages.clone()),
            fontsize: self.fontsize.or(fallback.fontsize),
            scale: self.scale.or(fallback.scale),
            depth: self.depth.or(fallback.depth),
            newline: self.newline.or(fallback.newline),
            math: self.math.or(fallback.math),
        }
    }

    /// Resolves every unset field to its built-in default.
    pub fn resolve(&self) -> RenderSettings {
        RenderSettings {
            preamble: self.preamble.clone(),
            packages: self
                .packages
                .as_deref()
                .map(split_packages)
                .unwrap_or_default(),
            fontsize: self.fontsize.unwrap_or(DEFAULT_FONTSIZE),
            scale: self.scale.filter(|&scale| valid_scale(scale)).unwrap_or_else(|| {
                if let Some(scale) = self.scale {
                    warn!(scale; "Ignoring scale that is not a positive number");
                }
                DEFAULT_SCALE
            }),
            depth: self.depth.unwrap_or(0),
            newline: self.newline.unwrap_or(false),
            math: self.math.unwrap_or(false),
        }
    }
}

fn valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

/// Formats a scale as a plain decimal with at least one fractional digit
/// (`2.0`, `0.0000001`), never in exponent notation.
pub fn format_scale(scale: f64) -> String {
    let digits = scale.to_string();
    if digits.contains('.') || !scale.is_finite() {
        digits
    } else {
        format!("{digits}.0")
    }
}

fn split_packages(list: &str) -> Vec<String> {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fully resolved render settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    preamble: Option<PathBuf>,
    packages: Vec<String>,
    fontsize: u32,
    scale: f64,
    depth: u32,
    newline: bool,
    math: bool,
}

impl RenderSettings {
    pub fn preamble(&self) -> Option<&Path> {
        self.preamble.as_deref()
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn fontsize(&self) -> u32 {
        self.fontsize
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Maximum ancestor depth; `0` means unlimited.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn newline(&self) -> bool {
        self.newline
    }

    pub fn math(&self) -> bool {
        self.math
    }

    /// The text appended after each run of a text element.
    pub fn line_ending(&self) -> &'static str {
        if self.newline { "\\\\\n" } else { "\n" }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Options::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let settings = Options::new().resolve();

        assert_eq!(settings.preamble(), None);
        assert!(settings.packages().is_empty());
        assert_eq!(settings.fontsize(), 10);
        assert_eq!(settings.scale(), 1.0);
        assert_eq!(settings.depth(), 0);
        assert!(!settings.newline());
        assert!(!settings.math());
    }

    #[test]
    fn test_explicit_wins_over_fallback() {
        let explicit = Options::new().with_scale(2.0).with_newline(false);
        let fallback = Options::new()
            .with_scale(3.0)
            .with_newline(true)
            .with_depth(2)
            .with_preamble("pre.tex");

        let merged = explicit.or(&fallback);
        assert_eq!(merged.scale(), Some(2.0));
        assert_eq!(merged.newline(), Some(false));
        assert_eq!(merged.depth(), Some(2));
        assert_eq!(merged.preamble(), Some(Path::new("pre.tex")));
        assert_eq!(merged.fontsize(), None);
    }

    #[test]
    fn test_packages_split() {
        let settings = Options::new()
            .with_packages("amsmath, amssymb\tbm,,")
            .resolve();
        assert_eq!(settings.packages(), ["amsmath", "amssymb", "bm"]);
    }

    #[test]
    fn test_format_scale_without_exponent() {
        assert_eq!(format_scale(1.0), "1.0");
        assert_eq!(format_scale(1.5), "1.5");
        assert_eq!(format_scale(1e-7), "0.0000001");
        assert_eq!(format_scale(2e21), "2000000000000000000000.0");
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        assert_eq!(Options::new().with_scale(0.0).resolve().scale(), DEFAULT_SCALE);
        assert_eq!(Options::new().with_scale(-2.0).resolve().scale(), DEFAULT_SCALE);
        assert_eq!(Options::new().with_scale(f64::NAN).resolve().scale(), DEFAULT_SCALE);
        assert_eq!(Options::new().with_scale(0.5).resolve().scale(), 0.5);
    }

    #[test]
    fn test_line_ending() {
        assert_eq!(Options::new().resolve().line_ending(), "\n");
        assert_eq!(
            Options::new().with_newline(true).resolve().line_ending(),
            "\\\\\n"
        );
    }
}
