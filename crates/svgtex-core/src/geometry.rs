//! Geometric primitives for placing rendered artwork in a document.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in document user space
//! - [`Transform`] - A 2D affine map stored as a 3×3 homogeneous matrix
//!
//! # Coordinate System
//!
//! svgtex uses the SVG coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! # Matrix Layout
//!
//! A [`Transform`] is the matrix
//!
//! ```text
//!   | m00 m01 m02 |
//!   | m10 m11 m12 |
//!   |  0   0   1  |
//! ```
//!
//! Only the six free entries are stored, so the bottom row can never drift
//! away from `[0, 0, 1]`.

use std::fmt;

use crate::transform::TransformOp;

/// A 2D point in document user space.
///
/// # Examples
///
/// ```
/// # use svgtex_core::geometry::Point;
/// let anchor = Point::new(10.0, 20.0);
/// let offset = Point::new(2.5, -5.0);
///
/// let moved = anchor.sub_point(offset);
/// assert_eq!(moved.x(), 7.5);
/// assert_eq!(moved.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Orders points lexicographically: by x first, then by y.
    ///
    /// NaN coordinates compare using IEEE total ordering so the result is
    /// always defined.
    pub fn lexicographic_cmp(&self, other: &Point) -> std::cmp::Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A 2D affine transform.
///
/// Composition follows the "newer on the left" convention used when walking
/// from an element outwards through its ancestors: [`Transform::compose`]
/// returns `new · self`.
///
/// # Examples
///
/// ```
/// # use svgtex_core::geometry::{Point, Transform};
/// let placement = Transform::identity()
///     .scale_by(2.0)
///     .translate_by(10.0, 20.0);
///
/// let mapped = placement.apply(Point::new(1.0, 1.0));
/// assert_eq!(mapped, Point::new(12.0, 22.0));
/// assert_eq!(
///     placement.to_string(),
///     "matrix(2.000000,0.000000,0.000000,2.000000,10.000000,20.000000)"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m00: f64,
    m01: f64,
    m02: f64,
    m10: f64,
    m11: f64,
    m12: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Returns the identity transform
    pub fn identity() -> Self {
        Self {
            m00: 1.0,
            m01: 0.0,
            m02: 0.0,
            m10: 0.0,
            m11: 1.0,
            m12: 0.0,
        }
    }

    /// Builds a transform from the SVG `matrix(a,b,c,d,e,f)` argument order.
    pub fn from_svg_matrix([a, b, c, d, e, f]: [f64; 6]) -> Self {
        Self {
            m00: a,
            m10: b,
            m01: c,
            m11: d,
            m02: e,
            m12: f,
        }
    }

    /// Returns a pure translation
    pub fn translation(x: f64, y: f64) -> Self {
        Self {
            m02: x,
            m12: y,
            ..Self::identity()
        }
    }

    /// Returns a pure (possibly non-uniform) scale
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            m00: sx,
            m11: sy,
            ..Self::identity()
        }
    }

    /// Returns a rotation by `degrees`.
    ///
    /// The off-diagonal entries are laid out as `m10 = sin(-a)` and
    /// `m01 = sin(a)`.
    pub fn rotation(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self {
            m00: radians.cos(),
            m10: (-radians).sin(),
            m01: radians.sin(),
            m11: radians.cos(),
            ..Self::identity()
        }
    }

    /// Returns the matrix for a single transform function
    pub fn from_op(op: &TransformOp) -> Self {
        match *op {
            TransformOp::Translate { x, y } => Self::translation(x, y),
            TransformOp::Matrix(values) => Self::from_svg_matrix(values),
            TransformOp::Scale { sx, sy } => Self::scaling(sx, sy),
            TransformOp::Rotate {
                angle,
                center: None,
            } => Self::rotation(angle),
            TransformOp::Rotate {
                angle,
                center: Some((cx, cy)),
            } => Self::translation(cx, cy)
                .multiply(&Self::rotation(angle))
                .multiply(&Self::translation(-cx, -cy)),
        }
    }

    /// Returns the matrix of a transform list.
    ///
    /// The list `A B` acts as the product `A·B`: the last function applies
    /// to points first. An empty list is the identity.
    pub fn from_ops(ops: &[TransformOp]) -> Self {
        ops.iter()
            .rev()
            .fold(Self::identity(), |acc, op| acc.compose(&Self::from_op(op)))
    }

    /// Returns the matrix product `self · other`.
    pub fn multiply(&self, other: &Transform) -> Self {
        Self {
            m00: self.m00 * other.m00 + self.m01 * other.m10,
            m01: self.m00 * other.m01 + self.m01 * other.m11,
            m02: self.m00 * other.m02 + self.m01 * other.m12 + self.m02,
            m10: self.m10 * other.m00 + self.m11 * other.m10,
            m11: self.m10 * other.m01 + self.m11 * other.m11,
            m12: self.m10 * other.m02 + self.m11 * other.m12 + self.m12,
        }
    }

    /// Composes a newer transform onto this one, returning `new · self`.
    pub fn compose(&self, new: &Transform) -> Self {
        new.multiply(self)
    }

    /// Shorthand for composing a uniform scale.
    pub fn scale_by(&self, factor: f64) -> Self {
        self.compose(&Self::scaling(factor, factor))
    }

    /// Shorthand for composing a translation.
    pub fn translate_by(&self, x: f64, y: f64) -> Self {
        self.compose(&Self::translation(x, y))
    }

    /// Maps a point through this transform
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.m00 * point.x() + self.m01 * point.y() + self.m02,
            self.m10 * point.x() + self.m11 * point.y() + self.m12,
        )
    }

    /// Returns the six free entries in SVG `matrix(a,b,c,d,e,f)` order:
    /// `(m00, m10, m01, m11, m02, m12)`.
    pub fn to_svg_matrix(&self) -> [f64; 6] {
        [self.m00, self.m10, self.m01, self.m11, self.m02, self.m12]
    }

    /// Returns true if this is exactly the identity
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl fmt::Display for Transform {
    /// Serializes as an SVG `matrix(...)` with six fixed decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.to_svg_matrix();
        write!(f, "matrix({a:.6},{b:.6},{c:.6},{d:.6},{e:.6},{g:.6})")
    }
}
