//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single error with an optional error code,
//! labeled spans into the attribute value and help text.

use std::fmt;

use crate::{
    error::{error_code::ErrorCode, label::Label},
    span::Span,
};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E103]: `matrix` takes 6 arguments, found 4
///   |
/// 1 | matrix(1,0,0,1)
///   | ^^^^^^^^^^^^^^^ wrong number of arguments
///   |
///   = help: write all six entries: `matrix(a, b, c, d, e, f)`
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use svgtex_parser::error::{Diagnostic, ErrorCode};
    /// # use svgtex_parser::Span;
    ///
    /// let diag = Diagnostic::error("unknown transform `skewX`")
    ///     .with_code(ErrorCode::E102)
    ///     .with_label(Span::new(0..5), "not supported")
    ///     .with_help("use `matrix(...)` instead");
    /// assert_eq!(diag.to_string(), "error[E102]: unknown transform `skewX`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "error")?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::error("test error");

        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("`rotate` takes 1 or 3 arguments, found 2")
            .with_code(ErrorCode::E103)
            .with_label(Span::new(7..12), "wrong number of arguments")
            .with_secondary_label(Span::new(0..6), "in this function")
            .with_help("write `rotate(angle)` or `rotate(angle, cx, cy)`");

        assert_eq!(diag.code(), Some(ErrorCode::E103));
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(!diag.labels()[1].is_primary());
        assert_eq!(
            diag.help(),
            Some("write `rotate(angle)` or `rotate(angle, cx, cy)`")
        );
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        assert_eq!(
            Diagnostic::error("bad value").to_string(),
            "error: bad value"
        );
    }
}
