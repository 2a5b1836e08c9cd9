//! Rendering every text element of a document into the render layer.

use log::{debug, info, trace, warn};

use svgtex_core::document::{Document, Element};

use crate::{
    error::SvgTexError,
    layer::{self, LAYER_ID},
    options::{Options, RenderSettings},
    placement::{self, Placement, PlacementError, SourceFrame},
    references,
    renderer::{CancelHandle, ExternalRenderer, RenderError, RenderJob},
    units,
};

/// Counts of what a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    rendered: usize,
    skipped: usize,
    unanchored: usize,
}

impl RunSummary {
    /// Text elements rendered into the layer.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Text elements left out: too deep, empty, or without an id.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Rendered artifacts that had no positioned element to anchor them.
    pub fn unanchored(&self) -> usize {
        self.unanchored
    }
}

/// A text element ready to be typeset.
#[derive(Debug)]
struct TextJob {
    id: String,
    content: String,
    frame: SourceFrame,
}

/// Drives one render run over a document.
pub struct RenderOrchestrator<'a> {
    renderer: &'a dyn ExternalRenderer,
    defaults: &'a Options,
    cancel: Option<&'a CancelHandle>,
}

impl<'a> RenderOrchestrator<'a> {
    /// Creates an orchestrator typesetting with `renderer`.
    ///
    /// `defaults` fill options that neither the caller nor the document sets.
    pub fn new(renderer: &'a dyn ExternalRenderer, defaults: &'a Options) -> Self {
        Self {
            renderer,
            defaults,
            cancel: None,
        }
    }

    /// Stops the run before the next text element once `cancel` is cancelled.
    pub fn with_cancel_handle(mut self, cancel: &'a CancelHandle) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Renders every text element of `document` into its render layer.
    ///
    /// Explicit `options` win over the parameters remembered in the
    /// document, which win over the configured defaults. The settings used
    /// are remembered in the layer afterwards.
    ///
    /// # Errors
    ///
    /// A malformed root `width`/`viewBox` fails the run before anything is
    /// rendered. A text element that cannot be placed or typeset fails the
    /// run with its id attached; artifacts inserted before it stay in the
    /// document. Cancellation fails the run the same way, naming the first
    /// element that was not rendered.
    pub fn run(&self, document: &mut Document, options: &Options) -> Result<RunSummary, SvgTexError> {
        let unit_factor = units::unit_factor(document.root())?;

        let remembered = layer::load_parameters(layer::find_or_create_layer(document)?);
        let settings = options.or(&remembered).or(self.defaults).resolve();
        info!(
            fontsize = settings.fontsize(),
            scale = settings.scale(),
            depth = settings.depth(),
            math = settings.math(),
            newline = settings.newline();
            "Rendering text elements"
        );

        let (jobs, skipped) = collect_jobs(document.root(), &settings)?;
        let mut summary = RunSummary {
            skipped,
            ..RunSummary::default()
        };

        let render_layer = layer::find_or_create_layer(document)?;
        for job in jobs {
            if self.cancel.is_some_and(CancelHandle::is_cancelled) {
                warn!(element = job.id.as_str(); "Render run cancelled");
                return Err(SvgTexError::Render {
                    element: job.id,
                    source: RenderError::Cancelled {
                        command: "render".to_string(),
                    },
                });
            }
            if self.render_one(render_layer, &job, &settings, unit_factor)? {
                summary.unanchored += 1;
            }
            summary.rendered += 1;
        }

        layer::store_parameters(render_layer, &settings);
        info!(
            rendered = summary.rendered,
            skipped = summary.skipped,
            unanchored = summary.unanchored;
            "Render run finished"
        );
        Ok(summary)
    }

    /// Typesets, places and inserts one text element. Returns `true` when the
    /// artifact could not be anchored.
    fn render_one(
        &self,
        render_layer: &mut Element,
        job: &TextJob,
        settings: &RenderSettings,
        unit_factor: f64,
    ) -> Result<bool, SvgTexError> {
        debug!(element = job.id.as_str(); "Rendering text element");
        trace!(element = job.id.as_str(), content = job.content.as_str(); "Text content");

        let render_job = RenderJob::new(&job.content)
            .with_preamble(settings.preamble())
            .with_packages(settings.packages())
            .with_fontsize(settings.fontsize())
            .with_scale(settings.scale());
        let mut artifact = self
            .renderer
            .render(&render_job)
            .map_err(|source| SvgTexError::Render {
                element: job.id.clone(),
                source,
            })?;

        let placement = placement::place(&mut artifact, &job.frame, unit_factor)
            .map_err(|err| placement_error(&job.id, err))?;
        let unanchored = placement == Placement::Unanchored;
        if unanchored {
            warn!(element = job.id.as_str(); "Rendered text has no positioned elements, inserting it unplaced");
        }

        let artifact_id = references::artifact_id(&job.id);
        references::prefix_references(&mut artifact, &artifact_id);
        if layer::upsert(render_layer, artifact, &artifact_id) {
            debug!(element = job.id.as_str(); "Replaced previous rendering");
        }

        Ok(unanchored)
    }
}

fn placement_error(element: &str, err: PlacementError) -> SvgTexError {
    SvgTexError::Placement {
        element: element.to_string(),
        attribute: err.attribute().to_string(),
        err: err.into_parse_error(),
    }
}

/// Collects the text elements to render in document order, outside the
/// render layer. Returns them with the number of skipped elements.
fn collect_jobs(
    root: &Element,
    settings: &RenderSettings,
) -> Result<(Vec<TextJob>, usize), SvgTexError> {
    let mut jobs = Vec::new();
    let mut skipped = 0;
    let mut failure = None;

    root.visit_with_ancestors(
        &mut |element| element.id() != Some(LAYER_ID),
        &mut |element, ancestors| {
            if failure.is_some() || !element.is("text") {
                return;
            }
            match prepare(element, ancestors, settings) {
                Ok(Some(job)) => jobs.push(job),
                Ok(None) => skipped += 1,
                Err(err) => failure = Some(err),
            }
        },
    );

    match failure {
        Some(err) => Err(err),
        None => Ok((jobs, skipped)),
    }
}

fn prepare(
    text: &Element,
    ancestors: &[&Element],
    settings: &RenderSettings,
) -> Result<Option<TextJob>, SvgTexError> {
    // The document root is not counted.
    let depth = ancestors.len().saturating_sub(1);
    if settings.depth() > 0 && depth > settings.depth() as usize {
        trace!(element:? = text.id(), depth; "Skipping text element below the depth limit");
        return Ok(None);
    }

    let Some(mut content) = text_content(text, settings.line_ending()) else {
        debug!(element:? = text.id(); "Skipping empty text element");
        return Ok(None);
    };

    let Some(id) = text.id() else {
        warn!("Skipping text element without an id: its rendering could not be updated later");
        return Ok(None);
    };

    if settings.math() && !content.starts_with('$') {
        content = format!("${content}$");
    }

    let frame = SourceFrame::from_text(text, ancestors).map_err(|err| placement_error(id, err))?;

    Ok(Some(TextJob {
        id: id.to_string(),
        content,
        frame,
    }))
}

/// Joins the runs of a text element: its own leading text, then the leading
/// text of each direct `tspan`, each followed by `line_ending`.
///
/// Returns `None` when no run has any text.
fn text_content(text: &Element, line_ending: &str) -> Option<String> {
    let mut content = String::new();
    let mut has_text = false;

    if let Some(own) = text.leading_text().filter(|own| !own.trim().is_empty()) {
        content.push_str(&own);
        content.push_str(line_ending);
        has_text = true;
    }
    for tspan in text.child_elements().filter(|child| child.is("tspan")) {
        if let Some(run) = tspan.leading_text().filter(|run| !run.is_empty()) {
            content.push_str(&run);
            has_text = true;
        }
        content.push_str(line_ending);
    }

    has_text.then_some(content)
}
