//! Transform functions as they appear in SVG `transform` attributes.
//!
//! [`TransformOp`] is the tagged output of the transform grammar in
//! `svgtex-parser`. Converting it to a matrix is done by
//! [`Transform::from_op`](crate::geometry::Transform::from_op).

use std::fmt;

/// A single transform function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    /// `translate(x[, y])`; `y` defaults to zero.
    Translate { x: f64, y: f64 },
    /// `matrix(a, b, c, d, e, f)`, stored in argument order.
    Matrix([f64; 6]),
    /// `rotate(angle[, cx, cy])` with the angle in degrees.
    Rotate {
        angle: f64,
        center: Option<(f64, f64)>,
    },
    /// `scale(sx[, sy])`; `sy` defaults to `sx`.
    Scale { sx: f64, sy: f64 },
}

impl TransformOp {
    /// Returns the SVG function name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Translate { .. } => "translate",
            Self::Matrix(_) => "matrix",
            Self::Rotate { .. } => "rotate",
            Self::Scale { .. } => "scale",
        }
    }

    /// Returns the explicit arguments, in source order.
    pub fn arguments(&self) -> Vec<f64> {
        match *self {
            Self::Translate { x, y } => vec![x, y],
            Self::Matrix(values) => values.to_vec(),
            Self::Rotate {
                angle,
                center: None,
            } => vec![angle],
            Self::Rotate {
                angle,
                center: Some((cx, cy)),
            } => vec![angle, cx, cy],
            Self::Scale { sx, sy } => vec![sx, sy],
        }
    }
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        for (index, value) in self.arguments().iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}
