//! Error types for svgtex operations.
//!
//! [`SvgTexError`] wraps every failure a run can end with. Attribute values
//! that fail to parse keep their [`ParseError`], so front ends can render the
//! diagnostics against the offending value.

use std::io;

use thiserror::Error;

use svgtex_core::document::XmlError;
use svgtex_parser::ParseError;

use crate::renderer::RenderError;

/// The main error type for svgtex operations.
///
/// # Diagnostic Variants
///
/// `Structural` (when caused by a malformed value) and `Placement` carry a
/// [`ParseError`] whose source is the attribute value and whose labels point
/// into it.
#[derive(Debug, Error)]
pub enum SvgTexError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// A required attribute of the document is missing or malformed.
    #[error("Invalid document: `{attribute}` {reason}")]
    Structural {
        attribute: String,
        reason: String,
        err: Option<ParseError>,
    },

    /// An `x`, `y` or `transform` value needed to place an element is malformed.
    #[error("Cannot place `{element}`: invalid `{attribute}`: {err}")]
    Placement {
        element: String,
        attribute: String,
        err: ParseError,
    },

    #[error("Rendering `{element}` failed: {source}")]
    Render {
        element: String,
        #[source]
        source: RenderError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SvgTexError {
    /// Create a `Structural` error for a missing attribute.
    pub fn missing_attribute(attribute: impl Into<String>) -> Self {
        Self::Structural {
            attribute: attribute.into(),
            reason: "is missing on the root element".to_string(),
            err: None,
        }
    }

    /// Create a `Structural` error for an attribute whose value failed to parse.
    pub fn malformed_attribute(attribute: impl Into<String>, err: ParseError) -> Self {
        Self::Structural {
            attribute: attribute.into(),
            reason: format!("is malformed: {err}"),
            err: Some(err),
        }
    }

    /// Returns the attribute-value parse error behind this error, if any.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Structural { err, .. } => err.as_ref(),
            Self::Placement { err, .. } => Some(err),
            _ => None,
        }
    }
}
