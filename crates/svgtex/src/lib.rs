//! svgtex - Render LaTeX text annotations inside SVG documents.
//!
//! Every `text` element of a document is typeset with LaTeX, converted to
//! vector paths and merged into a dedicated render layer, anchored where the
//! text sits. Re-running on the same document replaces earlier renderings in
//! place and keeps the transforms and styles users gave them.

pub mod config;
pub mod layer;
pub mod options;
pub mod placement;
pub mod references;
pub mod renderer;
pub mod units;

mod error;
mod orchestrator;

pub use svgtex_core::document;

pub use error::SvgTexError;
pub use orchestrator::{RenderOrchestrator, RunSummary};

use log::{debug, info};

use svgtex_core::document::Document;

use config::AppConfig;
use options::Options;
use renderer::{CancelHandle, ExternalRenderer, LatexRenderer};

/// Entry point for rendering and cleaning SVG documents.
///
/// # Examples
///
/// ```rust,no_run
/// use svgtex::{SvgTex, config::AppConfig, options::Options};
///
/// let source = std::fs::read_to_string("drawing.svg").expect("Failed to read");
///
/// let svgtex = SvgTex::new(AppConfig::default());
/// let (rendered, summary) = svgtex
///     .render(&source, &Options::new().with_math(true))
///     .expect("Failed to render");
///
/// println!("{} text elements rendered", summary.rendered());
/// std::fs::write("drawing.svg", rendered).expect("Failed to write");
/// ```
pub struct SvgTex {
    config: AppConfig,
    renderer: Box<dyn ExternalRenderer>,
    cancel: CancelHandle,
}

impl SvgTex {
    /// Create an instance typesetting with `pdflatex` and `pdf2svg` as
    /// configured in `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Renderer settings and default options
    pub fn new(config: AppConfig) -> Self {
        Self::with_cancel_handle(config, CancelHandle::new())
    }

    /// Create an instance typesetting with `pdflatex` and `pdf2svg` that
    /// stops once `cancel` is cancelled, for example from a signal handler.
    pub fn with_cancel_handle(config: AppConfig, cancel: CancelHandle) -> Self {
        let renderer = LatexRenderer::new(config.renderer()).with_cancel_handle(cancel.clone());
        Self {
            config,
            renderer: Box::new(renderer),
            cancel,
        }
    }

    /// Create an instance typesetting with a custom renderer.
    ///
    /// The renderer settings of `config` are ignored; its default options
    /// still apply.
    pub fn with_renderer(config: AppConfig, renderer: impl ExternalRenderer + 'static) -> Self {
        Self {
            config,
            renderer: Box::new(renderer),
            cancel: CancelHandle::new(),
        }
    }

    /// Returns the handle that cancels renders of this instance.
    ///
    /// Cancelling kills a running `pdflatex` or `pdf2svg`, removes its
    /// working directory, and fails the current and every later render.
    /// Custom renderers are stopped between text elements.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Render every text element of a parsed document, in place.
    ///
    /// # Errors
    ///
    /// Returns `SvgTexError` when the document lacks a usable `width`, or a
    /// text element cannot be placed or typeset.
    pub fn render_document(
        &self,
        document: &mut Document,
        options: &Options,
    ) -> Result<RunSummary, SvgTexError> {
        RenderOrchestrator::new(self.renderer.as_ref(), self.config.defaults())
            .with_cancel_handle(&self.cancel)
            .run(document, options)
    }

    /// Render every text element of an SVG source and return the new source.
    ///
    /// # Arguments
    ///
    /// * `source` - SVG document text
    /// * `options` - Explicit render options; unset fields fall back to the
    ///   values remembered in the document, then to the configured defaults
    ///
    /// # Errors
    ///
    /// Returns `SvgTexError` for unreadable XML and for every failure of
    /// [`SvgTex::render_document`].
    pub fn render(
        &self,
        source: &str,
        options: &Options,
    ) -> Result<(String, RunSummary), SvgTexError> {
        info!("Parsing document");
        let mut document = Document::parse(source)?;
        debug!(root = document.root().name(); "Document parsed");

        let summary = self.render_document(&mut document, options)?;
        Ok((document.to_xml()?, summary))
    }

    /// Remove every rendering from an SVG source and return the new source
    /// with the number of removed renderings.
    ///
    /// The render layer and the parameters it remembers are kept.
    ///
    /// # Errors
    ///
    /// Returns `SvgTexError` for unreadable XML.
    pub fn clean(&self, source: &str) -> Result<(String, usize), SvgTexError> {
        let mut document = Document::parse(source)?;
        let removed = layer::clear_artifacts(&mut document);
        Ok((document.to_xml()?, removed))
    }
}

impl Default for SvgTex {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
