//! Anchoring rendered artifacts at their source text.
//!
//! An artifact returned by the renderer positions its glyphs with `x`/`y`
//! attributes in typeset points, starting at some arbitrary offset. [`place`]
//! moves the top-left-most positioned element to the origin and gives the
//! artifact root one `transform` that scales points into user units and
//! reproduces every transform that applied to the source text.

use std::fmt;

use svgtex_core::{
    document::Element,
    geometry::{Point, Transform},
};
use svgtex_parser::{ParseError, parse_coordinate, parse_transform_matrix};

/// An `x`, `y` or `transform` value that could not be parsed during placement.
#[derive(Debug, Clone)]
pub struct PlacementError {
    attribute: &'static str,
    err: ParseError,
}

impl PlacementError {
    fn new(attribute: &'static str, err: ParseError) -> Self {
        Self { attribute, err }
    }

    pub fn attribute(&self) -> &'static str {
        self.attribute
    }

    pub fn into_parse_error(self) -> ParseError {
        self.err
    }
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid `{}`: {}", self.attribute, self.err)
    }
}

impl std::error::Error for PlacementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}

/// Where a source text element sits in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceFrame {
    origin: Point,
    transform: Transform,
}

impl SourceFrame {
    pub fn new(origin: Point, transform: Transform) -> Self {
        Self { origin, transform }
    }

    /// Reads the frame of a `text` element.
    ///
    /// `ancestors` is ordered from the outermost element (the document root)
    /// to the direct parent. The origin is the element's `x`/`y`, or the
    /// origin when either is missing. The transform is the element's own
    /// `transform` followed by every ancestor `transform` from the nearest
    /// to the outermost.
    pub fn from_text(text: &Element, ancestors: &[&Element]) -> Result<Self, PlacementError> {
        let origin = match (text.attribute("x"), text.attribute("y")) {
            (Some(x), Some(y)) => Point::new(
                parse_coordinate(x).map_err(|err| PlacementError::new("x", err))?,
                parse_coordinate(y).map_err(|err| PlacementError::new("y", err))?,
            ),
            _ => Point::default(),
        };

        let mut transform = element_transform(text)?;
        for ancestor in ancestors.iter().rev() {
            transform = transform.compose(&element_transform(ancestor)?);
        }

        Ok(Self { origin, transform })
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

fn element_transform(element: &Element) -> Result<Transform, PlacementError> {
    element
        .attribute("transform")
        .map_or(Ok(Transform::identity()), parse_transform_matrix)
        .map_err(|err| PlacementError::new("transform", err))
}

/// The outcome of placing an artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// The artifact was normalized around `anchor` and given `transform`.
    Anchored { anchor: Point, transform: Transform },
    /// No element of the artifact carries both `x` and `y`; it was left untouched.
    Unanchored,
}

/// Anchors `artifact` at `frame`, scaling typeset points by `unit_factor`.
///
/// Every element carrying both `x` and `y` (the root included) is shifted so
/// that the lexicographically smallest position becomes `(0, 0)`. The root's
/// `transform` is then set to `scale(unit_factor)`, followed by a translation
/// to the frame origin, followed by the frame transform.
///
/// # Errors
///
/// Returns a [`PlacementError`] when a positioned element of the artifact
/// has a non-numeric `x` or `y`.
pub fn place(
    artifact: &mut Element,
    frame: &SourceFrame,
    unit_factor: f64,
) -> Result<Placement, PlacementError> {
    let positions = artifact
        .iter()
        .filter_map(|element| Some((element.attribute("x")?, element.attribute("y")?)))
        .map(|(x, y)| {
            Ok(Point::new(
                parse_coordinate(x).map_err(|err| PlacementError::new("x", err))?,
                parse_coordinate(y).map_err(|err| PlacementError::new("y", err))?,
            ))
        })
        .collect::<Result<Vec<_>, PlacementError>>()?;

    let Some(anchor) = positions
        .iter()
        .copied()
        .min_by(|a, b| a.lexicographic_cmp(b))
    else {
        return Ok(Placement::Unanchored);
    };

    let mut shifted = positions.into_iter().map(|p| p.sub_point(anchor));
    artifact.visit_mut(&mut |element| {
        if !(element.has_attribute("x") && element.has_attribute("y")) {
            return;
        }
        if let Some(p) = shifted.next() {
            element.set_attribute("x", p.x().to_string());
            element.set_attribute("y", p.y().to_string());
        }
    });

    let transform = Transform::identity()
        .scale_by(unit_factor)
        .translate_by(frame.origin.x(), frame.origin.y())
        .compose(&frame.transform);
    artifact.set_attribute("transform", transform.to_string());

    Ok(Placement::Anchored { anchor, transform })
}
