//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A labeled span in an attribute value.
///
/// - **Primary labels** mark the offending part of the value.
/// - **Secondary labels** point at related context, such as the function
///   whose arguments are wrong.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let primary = Label::primary(Span::new(10..20), "error here");
        assert_eq!(primary.span().start(), 10);
        assert_eq!(primary.message(), "error here");
        assert!(primary.is_primary());

        let secondary = Label::secondary(Span::new(0..6), "in this function");
        assert!(!secondary.is_primary());
    }
}
