//! Integration tests for rendering documents with an in-memory renderer.

use std::{cell::RefCell, rc::Rc};

use float_cmp::approx_eq;
use svgtex::{
    RenderOrchestrator, SvgTex, SvgTexError,
    config::{AppConfig, RendererConfig},
    document::{Document, Element},
    layer::LAYER_ID,
    options::Options,
    renderer::{CancelHandle, ExternalRenderer, RenderError, RenderJob},
};
use svgtex_core::geometry::Point;
use svgtex_parser::parse_transform_matrix;

/// What the fake renderer was asked to typeset.
#[derive(Debug, Clone, PartialEq)]
struct Call {
    content: String,
    fontsize: u32,
}

/// Renders every job as two glyphs at fixed positions, like `pdf2svg`
/// output for a short line.
#[derive(Default, Clone)]
struct FakeRenderer {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl FakeRenderer {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl ExternalRenderer for FakeRenderer {
    fn render(&self, job: &RenderJob<'_>) -> Result<Element, RenderError> {
        self.calls.borrow_mut().push(Call {
            content: job.content().to_string(),
            fontsize: job.fontsize(),
        });

        Ok(Element::new("g")
            .with_child(
                Element::new("defs").with_child(
                    Element::new("symbol")
                        .with_attribute("id", "glyph0-1")
                        .with_child(Element::new("path").with_attribute("d", "M 0 0 L 1 1")),
                ),
            )
            .with_child(
                Element::new("g")
                    .with_attribute("style", "fill:rgb(0%,0%,0%);")
                    .with_child(glyph(133.76, 130.8))
                    .with_child(glyph(140.2, 130.8)),
            ))
    }
}

fn glyph(x: f64, y: f64) -> Element {
    Element::new("use")
        .with_attribute("xlink:href", "#glyph0-1")
        .with_attribute("x", x.to_string())
        .with_attribute("y", y.to_string())
}

struct FailingRenderer;

impl ExternalRenderer for FailingRenderer {
    fn render(&self, _job: &RenderJob<'_>) -> Result<Element, RenderError> {
        Err(RenderError::Cancelled {
            command: "pdflatex tmp.tex".to_string(),
        })
    }
}

/// Cancels the shared handle while typesetting, like Ctrl-C mid-run.
struct CancellingRenderer {
    inner: FakeRenderer,
    cancel: CancelHandle,
}

impl ExternalRenderer for CancellingRenderer {
    fn render(&self, job: &RenderJob<'_>) -> Result<Element, RenderError> {
        self.cancel.cancel();
        self.inner.render(job)
    }
}

const DRAWING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!-- Created with Inkscape (http://www.inkscape.org/) -->
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
  <g id="layer1">
    <text id="t1" x="10" y="20"><tspan>A</tspan><tspan>B</tspan></text>
  </g>
</svg>
"#;

fn svgtex(renderer: &FakeRenderer) -> SvgTex {
    SvgTex::with_renderer(AppConfig::default(), renderer.clone())
}

fn artifact<'a>(document: &'a Document, id: &str) -> &'a Element {
    let layer = document.root().find_by_id(LAYER_ID).expect("render layer");
    layer.find_by_id(id).expect("artifact in layer")
}

#[test]
fn test_renders_text_at_its_position() {
    let renderer = FakeRenderer::default();
    let (output, summary) = svgtex(&renderer)
        .render(DRAWING, &Options::new())
        .expect("Failed to render");

    assert_eq!(summary.rendered(), 1);
    assert_eq!(summary.skipped(), 0);
    assert_eq!(summary.unanchored(), 0);
    assert_eq!(
        renderer.calls(),
        [Call {
            content: "A\nB\n".to_string(),
            fontsize: 10
        }]
    );

    let document = Document::parse(&output).expect("valid output");
    let artifact = artifact(&document, "lx-t1");
    let transform = parse_transform_matrix(artifact.attribute("transform").expect("placed"))
        .expect("valid transform");

    // Width 100 without viewBox: one point is 1.25 user units.
    let anchor = transform.apply(Point::new(0.0, 0.0));
    assert!(approx_eq!(f64, anchor.x(), 10.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, anchor.y(), 20.0, epsilon = 1e-6));
    let next = transform.apply(Point::new(1.0, 0.0));
    assert!(approx_eq!(f64, next.x(), 11.25, epsilon = 1e-6));

    assert!(artifact.find_by_id("lx-t1-glyph0-1").is_some());
    let glyph = artifact.iter().find(|e| e.is("use")).expect("glyph");
    assert_eq!(glyph.attribute("xlink:href"), Some("#lx-t1-glyph0-1"));
    assert_eq!(glyph.attribute("x"), Some("0"));
    assert_eq!(glyph.attribute("y"), Some("0"));

    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"));
    assert!(output.contains("<!-- Created with Inkscape (http://www.inkscape.org/) -->"));
}

#[test]
fn test_rerun_is_byte_stable() {
    let renderer = FakeRenderer::default();
    let svgtex = svgtex(&renderer);

    let (first, _) = svgtex.render(DRAWING, &Options::new()).expect("first run");
    let (second, summary) = svgtex.render(&first, &Options::new()).expect("second run");

    assert_eq!(first, second);
    assert_eq!(summary.rendered(), 1);

    let document = Document::parse(&second).expect("valid output");
    let count = document.root().iter().filter(|e| e.id() == Some("lx-t1")).count();
    assert_eq!(count, 1);
}

#[test]
fn test_rerun_preserves_manual_edits() {
    let renderer = FakeRenderer::default();
    let svgtex = svgtex(&renderer);
    let (first, _) = svgtex.render(DRAWING, &Options::new()).expect("first run");

    let mut document = Document::parse(&first).expect("valid output");
    let edited = document
        .root_mut()
        .find_by_id_mut("lx-t1")
        .expect("artifact");
    edited.set_attribute("transform", "matrix(2,0,0,2,50,60)");
    edited.set_attribute("style", "fill:#ff0000");

    let changed = document.to_xml().expect("serializable").replace(">A<", ">C<");
    let (second, _) = svgtex.render(&changed, &Options::new()).expect("second run");

    let document = Document::parse(&second).expect("valid output");
    let artifact = artifact(&document, "lx-t1");
    assert_eq!(artifact.attribute("transform"), Some("matrix(2,0,0,2,50,60)"));
    assert_eq!(artifact.attribute("style"), Some("fill:#ff0000"));
    let inner = artifact
        .child_elements()
        .find(|e| e.is("g"))
        .expect("inner group");
    assert_eq!(inner.attribute("style"), None);
    assert_eq!(renderer.calls()[1].content, "C\nB\n");
}

#[test]
fn test_parameters_are_remembered() {
    let renderer = FakeRenderer::default();
    let svgtex = svgtex(&renderer);

    let explicit = Options::new().with_math(true).with_fontsize(12);
    let (first, _) = svgtex.render(DRAWING, &explicit).expect("first run");
    svgtex.render(&first, &Options::new()).expect("second run");

    let calls = renderer.calls();
    assert_eq!(calls[0], calls[1]);
    assert_eq!(calls[1].content, "$A\nB\n$");
    assert_eq!(calls[1].fontsize, 12);

    let document = Document::parse(&first).expect("valid output");
    let layer = document.root().find_by_id(LAYER_ID).expect("layer");
    assert_eq!(layer.attribute("rendltx:math"), Some("True"));
    assert_eq!(layer.attribute("rendltx:fontsize"), Some("12"));
}

#[test]
fn test_option_precedence() {
    let renderer = FakeRenderer::default();
    let config = AppConfig::new(RendererConfig::default(), Options::new().with_fontsize(14));
    let svgtex = SvgTex::with_renderer(config, renderer.clone());

    // Configured default applies to a fresh document.
    let (first, _) = svgtex.render(DRAWING, &Options::new()).expect("run");
    // The document now remembers 14; an explicit option still wins.
    svgtex
        .render(&first, &Options::new().with_fontsize(11))
        .expect("run");

    let fontsizes: Vec<_> = renderer.calls().iter().map(|c| c.fontsize).collect();
    assert_eq!(fontsizes, [14, 11]);
}

#[test]
fn test_depth_limit_and_skips() {
    let source = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100">
  <text id="top"><tspan>top</tspan></text>
  <g><g><text id="deep"><tspan>deep</tspan></text></g></g>
  <text><tspan>no id</tspan></text>
  <text id="empty"><tspan/></text>
</svg>"#;
    let renderer = FakeRenderer::default();

    let (output, summary) = svgtex(&renderer)
        .render(source, &Options::new().with_depth(1))
        .expect("Failed to render");

    assert_eq!(summary.rendered(), 1);
    assert_eq!(summary.skipped(), 3);
    let document = Document::parse(&output).expect("valid output");
    assert!(document.root().find_by_id("lx-top").is_some());
    assert!(document.root().find_by_id("lx-deep").is_none());
}

#[test]
fn test_group_transform_and_view_box() {
    let source = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100px" viewBox="0 0 200 200">
  <g transform="translate(30,0)">
    <text id="t" x="5" y="5" transform="scale(2)"><tspan>x</tspan></text>
  </g>
</svg>"#;
    let mut document = Document::parse(source).expect("valid document");
    let renderer = FakeRenderer::default();
    let defaults = Options::new();

    RenderOrchestrator::new(&renderer, &defaults)
        .run(&mut document, &Options::new())
        .expect("Failed to render");

    let transform = parse_transform_matrix(
        artifact(&document, "lx-t")
            .attribute("transform")
            .expect("placed"),
    )
    .expect("valid transform");

    // Anchor: (5,5) scaled by 2, then shifted by 30.
    let anchor = transform.apply(Point::new(0.0, 0.0));
    assert!(approx_eq!(f64, anchor.x(), 40.0, epsilon = 1e-6));
    assert!(approx_eq!(f64, anchor.y(), 10.0, epsilon = 1e-6));
    // One point is 2.5 user units, doubled by the text's own scale.
    let next = transform.apply(Point::new(1.0, 0.0));
    assert!(approx_eq!(f64, next.x() - anchor.x(), 5.0, epsilon = 1e-6));
}

#[test]
fn test_render_failure_names_element() {
    let svgtex = SvgTex::with_renderer(AppConfig::default(), FailingRenderer);
    let err = svgtex
        .render(DRAWING, &Options::new())
        .expect_err("render fails");

    match err {
        SvgTexError::Render { element, source } => {
            assert_eq!(element, "t1");
            assert!(matches!(source, RenderError::Cancelled { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_width_is_structural() {
    let renderer = FakeRenderer::default();
    let err = svgtex(&renderer)
        .render(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#, &Options::new())
        .expect_err("no width");

    assert!(matches!(err, SvgTexError::Structural { .. }));
    assert!(renderer.calls().is_empty());
}

#[test]
fn test_bad_transform_reports_source() {
    let source = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10">
  <g transform="skewX(30)"><text id="t"><tspan>A</tspan></text></g>
</svg>"#;
    let renderer = FakeRenderer::default();
    let err = svgtex(&renderer)
        .render(source, &Options::new())
        .expect_err("skew is rejected");

    let parse_error = err.parse_error().expect("carries diagnostics");
    assert_eq!(parse_error.src(), "skewX(30)");
    assert!(matches!(err, SvgTexError::Placement { ref element, .. } if element == "t"));
}

#[test]
fn test_clean_removes_renderings() {
    let renderer = FakeRenderer::default();
    let svgtex = svgtex(&renderer);
    let (rendered, _) = svgtex.render(DRAWING, &Options::new()).expect("render");

    let (cleaned, removed) = svgtex.clean(&rendered).expect("clean");

    assert_eq!(removed, 1);
    let document = Document::parse(&cleaned).expect("valid output");
    let layer = document.root().find_by_id(LAYER_ID).expect("layer kept");
    assert_eq!(layer.child_elements().count(), 0);
    assert!(document.root().find_by_id("t1").is_some());
}

#[test]
fn test_cancelled_before_render() {
    let renderer = FakeRenderer::default();
    let svgtex = svgtex(&renderer);
    svgtex.cancel_handle().cancel();

    let err = svgtex
        .render(DRAWING, &Options::new())
        .expect_err("render is cancelled");

    assert!(matches!(
        err,
        SvgTexError::Render { ref element, source: RenderError::Cancelled { .. } } if element == "t1"
    ));
    assert!(renderer.calls().is_empty());
}

#[test]
fn test_cancel_stops_remaining_elements() {
    let source = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100">
  <text id="first" x="1" y="1"><tspan>A</tspan></text>
  <text id="second" x="2" y="2"><tspan>B</tspan></text>
</svg>"#;
    let cancel = CancelHandle::new();
    let renderer = CancellingRenderer {
        inner: FakeRenderer::default(),
        cancel: cancel.clone(),
    };
    let defaults = Options::new();
    let mut document = Document::parse(source).expect("valid input");

    let err = RenderOrchestrator::new(&renderer, &defaults)
        .with_cancel_handle(&cancel)
        .run(&mut document, &Options::new())
        .expect_err("second element is cancelled");

    assert!(matches!(err, SvgTexError::Render { ref element, .. } if element == "second"));
    assert_eq!(renderer.inner.calls().len(), 1);
}
