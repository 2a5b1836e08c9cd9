//! Configuration types for svgtex.
//!
//! All types implement [`serde::Deserialize`] so front ends can load them from
//! a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining renderer settings and default options.
//! - [`RendererConfig`] - Locations of the external tools and their timeout.
//!
//! # Example
//!
//! ```
//! # use svgtex::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.renderer().timeout().as_secs(), 60);
//! assert_eq!(config.defaults().fontsize(), None);
//! ```

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Deserializer, de};

use crate::options::Options;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// External tool settings.
    #[serde(default)]
    renderer: RendererConfig,

    /// Options used when neither the caller nor the document sets them.
    #[serde(default)]
    defaults: Options,
}

impl AppConfig {
    /// Creates a new [`AppConfig`].
    ///
    /// # Arguments
    ///
    /// * `renderer` - External tool settings.
    /// * `defaults` - Fallback render options.
    pub fn new(renderer: RendererConfig, defaults: Options) -> Self {
        Self { renderer, defaults }
    }

    pub fn renderer(&self) -> &RendererConfig {
        &self.renderer
    }

    pub fn defaults(&self) -> &Options {
        &self.defaults
    }
}

/// Where to find `pdflatex` and `pdf2svg`, how long they may run, and where
/// they work.
///
/// Unset tool paths are looked up in `tex_bin_dir` when one is set (or on
/// macOS, in the default TeX distribution directory), and on `PATH`
/// otherwise. Each render works in a fresh directory inside `work_dir`, or
/// inside the system temporary directory when it is unset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    latex: Option<PathBuf>,
    pdf2svg: Option<PathBuf>,
    tex_bin_dir: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    #[serde(rename = "timeout_secs", deserialize_with = "deserialize_timeout")]
    timeout: Duration,
}

/// Reads a whole number of seconds; zero would fail every tool at once.
fn deserialize_timeout<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    match u64::deserialize(deserializer)? {
        0 => Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(0),
            &"a timeout of at least one second",
        )),
        secs => Ok(Duration::from_secs(secs)),
    }
}

impl RendererConfig {
    /// Returns the configured `pdflatex` path, if any.
    pub fn latex(&self) -> Option<&PathBuf> {
        self.latex.as_ref()
    }

    /// Returns the configured `pdf2svg` path, if any.
    pub fn pdf2svg(&self) -> Option<&PathBuf> {
        self.pdf2svg.as_ref()
    }

    /// Returns the directory holding the TeX binaries, if configured.
    pub fn tex_bin_dir(&self) -> Option<&PathBuf> {
        self.tex_bin_dir.as_ref()
    }

    /// Returns the directory that holds the per-render working directories,
    /// if configured.
    pub fn work_dir(&self) -> Option<&PathBuf> {
        self.work_dir.as_ref()
    }

    /// Returns the time each external command may run before it is killed.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn with_latex(mut self, path: impl Into<PathBuf>) -> Self {
        self.latex = Some(path.into());
        self
    }

    pub fn with_pdf2svg(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdf2svg = Some(path.into());
        self
    }

    pub fn with_tex_bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tex_bin_dir = Some(dir.into());
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            latex: None,
            pdf2svg: None,
            tex_bin_dir: None,
            work_dir: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [renderer]
            latex = "/opt/tex/bin/pdflatex"
            timeout_secs = 5

            [defaults]
            fontsize = 12
            math = true
            packages = "amsmath"
            "#,
        )
        .expect("valid config");

        assert_eq!(
            config.renderer().latex(),
            Some(&PathBuf::from("/opt/tex/bin/pdflatex"))
        );
        assert_eq!(config.renderer().pdf2svg(), None);
        assert_eq!(config.renderer().timeout(), Duration::from_secs(5));
        assert_eq!(config.defaults().fontsize(), Some(12));
        assert_eq!(config.defaults().math(), Some(true));
        assert_eq!(config.defaults().packages(), Some("amsmath"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("valid config");
        assert_eq!(config.renderer().timeout(), Duration::from_secs(60));
        assert_eq!(config.defaults(), &Options::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[renderer]\ntimeout_secs = 0\n");
        let err = result.expect_err("zero timeout");
        assert!(err.to_string().contains("at least one second"));
    }

    #[test]
    fn test_sub_second_timeout_kept() {
        let config = RendererConfig::default().with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[defaults]\nfont = 3\n");
        assert!(result.is_err());
    }
}
