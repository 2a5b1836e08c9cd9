//! Conversion from typeset points to document user units.
//!
//! LaTeX output converted to SVG is measured in points. The document's user
//! unit is fixed by the root `width` and, when present, the root `viewBox`.

use log::debug;

use svgtex_core::document::Element;
use svgtex_parser::{
    Diagnostic, ErrorCode, ParseError, Span, ViewBox, parse_absolute_dimension, parse_view_box,
};

use crate::error::SvgTexError;

/// Size of one point in pixels at 90 dpi.
const POINT_IN_PX: f64 = 1.25;

/// Computes how many document user units one typeset point spans.
///
/// `width` is the nominal document width (`210mm`, `800`, ...). With a
/// `viewBox`, user units are viewBox units stretched over that width;
/// without one, they are the width's own unit.
///
/// # Errors
///
/// Returns a [`ParseError`] when `width` is malformed, uses a font-relative
/// unit, or is zero while a viewBox is given.
///
/// # Examples
///
/// ```
/// # use float_cmp::approx_eq;
/// # use svgtex::units::resolve;
/// # use svgtex_parser::ViewBox;
/// assert!(approx_eq!(f64, resolve("10pt", None).unwrap(), 1.0));
///
/// let vb = ViewBox::new(200.0);
/// assert!(approx_eq!(f64, resolve("100px", Some(&vb)).unwrap(), 2.5));
/// ```
pub fn resolve(width: &str, view_box: Option<&ViewBox>) -> Result<f64, ParseError> {
    let (dimension, unit_px) = parse_absolute_dimension(width)?;

    let Some(view_box) = view_box else {
        return Ok(POINT_IN_PX / unit_px);
    };

    let nominal = dimension.value() * unit_px;
    if nominal == 0.0 {
        return Err(ParseError::single(
            Diagnostic::error("document width is zero")
                .with_code(ErrorCode::E203)
                .with_label(Span::new(0..width.len()), ErrorCode::E203.description())
                .with_help("set a non-zero `width` on the root element"),
            width,
        ));
    }

    Ok(POINT_IN_PX * view_box.width() / nominal)
}

/// Reads `width` and `viewBox` from the document root and resolves the unit factor.
///
/// # Errors
///
/// Returns [`SvgTexError::Structural`] when `width` is missing, or either
/// attribute is malformed.
pub fn unit_factor(root: &Element) -> Result<f64, SvgTexError> {
    let width = root
        .attribute("width")
        .ok_or_else(|| SvgTexError::missing_attribute("width"))?;
    let view_box = root
        .attribute("viewBox")
        .map(parse_view_box)
        .transpose()
        .map_err(|err| SvgTexError::malformed_attribute("viewBox", err))?;

    let factor = resolve(width, view_box.as_ref())
        .map_err(|err| SvgTexError::malformed_attribute("width", err))?;
    debug!(width, factor; "Resolved unit factor");
    Ok(factor)
}
