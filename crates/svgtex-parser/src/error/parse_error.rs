//! The ParseError type wrapping diagnostics for one attribute value.

use std::fmt;

use crate::error::Diagnostic;

/// Error type for the attribute grammars.
///
/// Wraps one or more diagnostics and the text they were produced from.
#[derive(Debug, Clone)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
    src: String,
}

impl ParseError {
    /// Create a new parse error from diagnostics and the parsed text.
    pub fn new(diagnostics: Vec<Diagnostic>, src: impl Into<String>) -> Self {
        Self {
            diagnostics,
            src: src.into(),
        }
    }

    /// Create a parse error holding a single diagnostic.
    pub fn single(diagnostic: Diagnostic, src: impl Into<String>) -> Self {
        Self::new(vec![diagnostic], src)
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the text the diagnostics' spans point into.
    pub fn src(&self) -> &str {
        &self.src
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
