//! Typesetting of text content into SVG artifacts.
//!
//! [`ExternalRenderer`] is the seam between the document merge logic and the
//! typesetting toolchain. [`LatexRenderer`] implements it with `pdflatex` and
//! `pdf2svg`; tests substitute an in-memory implementation.

mod latex;
mod process;

pub use latex::{LatexRenderer, Platform};
pub use process::CancelHandle;

use std::{
    io,
    path::{Path, PathBuf},
    process::ExitStatus,
    time::Duration,
};

use thiserror::Error;

use svgtex_core::document::{Element, XmlError};

/// One piece of content to typeset, with the settings that shape it.
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    content: &'a str,
    preamble: Option<&'a Path>,
    packages: &'a [String],
    fontsize: u32,
    scale: f64,
}

impl<'a> RenderJob<'a> {
    /// Creates a job for `content` with no preamble or packages, at 10pt and scale 1.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            preamble: None,
            packages: &[],
            fontsize: crate::options::DEFAULT_FONTSIZE,
            scale: crate::options::DEFAULT_SCALE,
        }
    }

    pub fn with_preamble(mut self, preamble: Option<&'a Path>) -> Self {
        self.preamble = preamble;
        self
    }

    pub fn with_packages(mut self, packages: &'a [String]) -> Self {
        self.packages = packages;
        self
    }

    pub fn with_fontsize(mut self, fontsize: u32) -> Self {
        self.fontsize = fontsize;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// The LaTeX source placed in the document body.
    pub fn content(&self) -> &'a str {
        self.content
    }

    pub fn preamble(&self) -> Option<&'a Path> {
        self.preamble
    }

    pub fn packages(&self) -> &'a [String] {
        self.packages
    }

    pub fn fontsize(&self) -> u32 {
        self.fontsize
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Turns text content into a vector artifact.
pub trait ExternalRenderer {
    /// Typesets `job` and returns the artifact as a `g` element.
    ///
    /// The artifact positions its glyphs with `x`/`y` attributes in points.
    fn render(&self, job: &RenderJob<'_>) -> Result<Element, RenderError>;
}

impl<R: ExternalRenderer + ?Sized> ExternalRenderer for Box<R> {
    fn render(&self, job: &RenderJob<'_>) -> Result<Element, RenderError> {
        (**self).render(job)
    }
}

/// A failure of the typesetting toolchain.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot read preamble `{}`: {source}", path.display())]
    Preamble {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` failed ({status})")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        output: String,
    },

    #[error("`{command}` did not produce `{}`", path.display())]
    MissingOutput {
        command: String,
        path: PathBuf,
        output: String,
    },

    #[error("`{command}` did not finish within {}s", timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("`{command}` was cancelled")]
    Cancelled { command: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unreadable converter output: {0}")]
    InvalidOutput(#[from] XmlError),
}

impl RenderError {
    /// Returns the combined stdout and stderr of the failed tool, if captured.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { output, .. } | Self::MissingOutput { output, .. } => {
                Some(output.as_str())
            }
            _ => None,
        }
    }
}
