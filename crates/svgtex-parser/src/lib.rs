//! # svgtex Parser
//!
//! Grammars for the SVG attribute values svgtex has to understand:
//!
//! - `transform` lists ([`parse_transform_list`], [`parse_transform_matrix`])
//! - dimensions such as the root `width` ([`parse_dimension`],
//!   [`parse_absolute_dimension`])
//! - `viewBox` values ([`parse_view_box`])
//! - element coordinates ([`parse_coordinate`])
//!
//! Every failure is a [`ParseError`] carrying coded diagnostics with byte
//! spans into the attribute value.
//!
//! ## Usage
//!
//! ```
//! # use svgtex_core::geometry::Point;
//! # use svgtex_parser::{parse_transform_matrix, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let m = parse_transform_matrix("translate(5, 5) scale(2)")?;
//!     assert_eq!(m.apply(Point::new(1.0, 1.0)), Point::new(7.0, 7.0));
//!     Ok(())
//! }
//! ```

pub mod error;
mod grammar;
mod length;
mod span;
mod transform;

pub use error::{Diagnostic, ErrorCode, ParseError};
pub use length::{
    Dimension, ViewBox, parse_absolute_dimension, parse_coordinate, parse_dimension,
    parse_view_box,
};
pub use span::Span;
pub use transform::{parse_transform, parse_transform_list, parse_transform_matrix};
