//! Collector for accumulating diagnostics while validating a value.

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics so every problem in a value is reported at once.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection: `Err` with every diagnostic if any was emitted.
    pub fn finish(self, source: &str) -> Result<(), ParseError> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(self.diagnostics, source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_collector_empty_is_ok() {
        assert!(DiagnosticCollector::new().finish("scale(2)").is_ok());
    }

    #[test]
    fn test_collector_keeps_all_diagnostics() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::error("first")
                .with_code(ErrorCode::E102)
                .with_label(Span::new(0..3), "here"),
        );
        collector.emit(Diagnostic::error("second").with_code(ErrorCode::E103));

        let err = collector.finish("foo() bar()").expect_err("errors were emitted");
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.src(), "foo() bar()");
    }
}
