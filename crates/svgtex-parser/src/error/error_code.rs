//! Error codes for svgtex diagnostics.
//!
//! Error codes are organized by the value being parsed:
//! - `E1xx` - Transform list errors
//! - `E2xx` - Dimension and viewBox errors
//! - `E3xx` - Coordinate errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Transform Errors (E1xx)
    // =========================================================================
    /// Unexpected input.
    ///
    /// Text was found where a transform function or the end of the list was
    /// expected.
    E100,

    /// Unclosed argument list.
    ///
    /// A transform function's `(` has no matching `)`, or the list contains
    /// something that is not a number.
    E101,

    /// Unknown or unsupported transform function.
    ///
    /// Only `translate`, `matrix`, `rotate` and `scale` are understood.
    /// `skewX` and `skewY` are valid SVG but are rejected.
    E102,

    /// Wrong number of arguments.
    ///
    /// `translate` and `scale` take one or two arguments, `rotate` one or
    /// three, and `matrix` exactly six.
    E103,

    /// Invalid number.
    ///
    /// An argument is not a finite number (`inf`, `NaN`, or an overflowing
    /// literal).
    E104,

    // =========================================================================
    // Dimension Errors (E2xx)
    // =========================================================================
    /// Malformed dimension.
    ///
    /// A length such as the root `width` is not a number followed by an
    /// optional unit.
    E200,

    /// Unsupported unit.
    ///
    /// `em` and `ex` depend on the font and have no absolute size.
    E201,

    /// Malformed viewBox.
    ///
    /// A viewBox must be four numbers separated by whitespace or commas.
    E202,

    /// Zero width.
    ///
    /// The nominal document width is zero, so the viewBox scale is undefined.
    E203,

    // =========================================================================
    // Coordinate Errors (E3xx)
    // =========================================================================
    /// Invalid coordinate.
    ///
    /// An `x` or `y` attribute is not a plain number (optionally in `px`).
    E300,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E300 => "E300",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "unexpected input",
            ErrorCode::E101 => "unclosed argument list",
            ErrorCode::E102 => "unknown transform",
            ErrorCode::E103 => "wrong number of arguments",
            ErrorCode::E104 => "invalid number",
            ErrorCode::E200 => "malformed dimension",
            ErrorCode::E201 => "unsupported unit",
            ErrorCode::E202 => "malformed viewBox",
            ErrorCode::E203 => "zero width",
            ErrorCode::E300 => "invalid coordinate",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
