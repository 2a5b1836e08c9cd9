//! The render layer: the one group holding every rendered artifact.
//!
//! The layer is created on first use and persists in the document. Besides
//! the artifacts it carries, in `rendltx:*` attributes, the settings of the
//! last run, so re-running on a document reproduces its renderings.

use std::path::PathBuf;

use log::{debug, info};

use svgtex_core::{
    document::{Document, Element},
    namespace::Namespace,
};

use crate::{
    error::SvgTexError,
    options::{Options, RenderSettings, format_scale},
};

/// Id of the render layer.
pub const LAYER_ID: &str = "ltx-render-layer";

/// Inkscape label of the render layer.
pub const LAYER_LABEL: &str = "Rendered Latex";

/// Returns the render layer, creating it as the last child of the root if
/// the document has none.
///
/// The `inkscape`, `xlink` and `rendltx` namespaces are declared on the root
/// element whenever it does not declare them yet, including for documents
/// that already carry a layer.
///
/// # Errors
///
/// Returns a `Structural` error if the layer cannot be found after it was
/// inserted.
pub fn find_or_create_layer(document: &mut Document) -> Result<&mut Element, SvgTexError> {
    let root = document.root_mut();
    declare_namespaces(root);
    if root.find_by_id(LAYER_ID).is_none() {
        info!(id = LAYER_ID; "Creating render layer");
        root.append(
            Element::new("g")
                .with_attribute(Namespace::Inkscape.qualify("label"), LAYER_LABEL)
                .with_attribute(Namespace::Inkscape.qualify("groupmode"), "layer")
                .with_attribute("id", LAYER_ID),
        );
    }
    root.find_by_id_mut(LAYER_ID)
        .ok_or_else(|| SvgTexError::Structural {
            attribute: "id".to_string(),
            reason: format!("`{LAYER_ID}` is not reachable from the root element"),
            err: None,
        })
}

fn declare_namespaces(root: &mut Element) {
    for namespace in [Namespace::Inkscape, Namespace::Xlink, Namespace::Params] {
        let declaration = namespace.declaration();
        if !root.has_attribute(&declaration) {
            root.set_attribute(declaration, namespace.uri());
        }
    }
}

/// Inserts `artifact` into `layer` under `artifact_id`, replacing any
/// previous rendering with that id.
///
/// Every element of the layer subtree with that id is removed (the layer
/// itself never is). When one existed, its `transform` is carried over
/// verbatim, and its `style` is moved onto the new artifact root and removed
/// from the artifact's inner groups.
///
/// Returns `true` when an existing rendering was replaced.
pub fn upsert(layer: &mut Element, mut artifact: Element, artifact_id: &str) -> bool {
    let removed = layer.remove_descendants_by_id(artifact_id);

    if let Some(previous) = removed.first() {
        if let Some(transform) = previous.attribute("transform") {
            artifact.set_attribute("transform", transform);
        }
        if let Some(style) = previous.attribute("style") {
            apply_style(&mut artifact, style);
        }
    }
    if removed.len() > 1 {
        debug!(id = artifact_id, count = removed.len(); "Removed duplicate renderings");
    }

    artifact.set_id(artifact_id);
    layer.append(artifact);
    !removed.is_empty()
}

fn apply_style(artifact: &mut Element, style: &str) {
    for child in artifact.child_elements_mut() {
        child.visit_mut(&mut |element| {
            if element.is("g") {
                element.remove_attribute("style");
            }
        });
    }
    artifact.set_attribute("style", style);
}

fn param(name: &str) -> String {
    Namespace::Params.qualify(name)
}

/// Reads the settings remembered by the last run.
///
/// Missing or unreadable attributes leave the field unset. An empty
/// preamble counts as none.
pub fn load_parameters(layer: &Element) -> Options {
    let read = |name: &str| layer.attribute(&param(name));
    let mut options = Options::new();

    if let Some(preamble) = read("preamble").filter(|path| !path.is_empty()) {
        options = options.with_preamble(PathBuf::from(preamble));
    }
    if let Some(scale) = read("scale").and_then(parse_float) {
        options = options.with_scale(scale);
    }
    if let Some(depth) = read("depth").and_then(parse_count) {
        options = options.with_depth(depth);
    }
    if let Some(fontsize) = read("fontsize").and_then(parse_count) {
        options = options.with_fontsize(fontsize);
    }
    if let Some(newline) = read("newline") {
        options = options.with_newline(parse_flag(newline));
    }
    if let Some(math) = read("math") {
        options = options.with_math(parse_flag(math));
    }

    debug!(options:?; "Loaded remembered parameters");
    options
}

/// Remembers `settings` on the layer for the next run.
///
/// Package lists are not remembered.
pub fn store_parameters(layer: &mut Element, settings: &RenderSettings) {
    let preamble = settings
        .preamble()
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_default();

    layer.set_attribute(param("preamble"), preamble);
    layer.set_attribute(param("scale"), format_scale(settings.scale()));
    layer.set_attribute(param("depth"), settings.depth().to_string());
    layer.set_attribute(param("fontsize"), settings.fontsize().to_string());
    layer.set_attribute(param("newline"), format_flag(settings.newline()));
    layer.set_attribute(param("math"), format_flag(settings.math()));
}

/// Removes every artifact from the render layer, keeping the layer and its
/// remembered parameters.
///
/// Returns the number of removed artifacts; a document without a layer is
/// left untouched.
pub fn clear_artifacts(document: &mut Document) -> usize {
    let Some(layer) = document.root_mut().find_by_id_mut(LAYER_ID) else {
        return 0;
    };
    let removed = layer
        .take_children()
        .into_iter()
        .filter(|node| node.as_element().is_some())
        .count();
    info!(removed; "Cleared render layer");
    removed
}

fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_count(value: &str) -> Option<u32> {
    let value = parse_float(value)?.round();
    (0.0..=f64::from(u32::MAX))
        .contains(&value)
        .then_some(value as u32)
}

fn parse_flag(value: &str) -> bool {
    matches!(value, "True" | "true")
}

fn format_flag(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}
