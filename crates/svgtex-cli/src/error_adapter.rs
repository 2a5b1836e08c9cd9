//! Error adapter for converting SvgTexError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Attribute Diagnostics
//!
//! Errors caused by a malformed attribute value carry a
//! [`ParseError`](svgtex_parser::ParseError). They are reported as the error
//! itself, naming the element and attribute, followed by one report per
//! diagnostic with the attribute value as source snippet.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use svgtex::{SvgTexError, renderer::RenderError};
use svgtex_parser::Diagnostic;

/// Number of trailing tool output lines shown with a failed render.
const TOOL_OUTPUT_LINES: usize = 20;

/// Adapter for a single attribute diagnostic.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// The attribute value the diagnostic points into
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for a whole [`SvgTexError`].
pub struct ErrorAdapter<'a>(pub &'a SvgTexError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SvgTexError::Io(_) => "svgtex::io",
            SvgTexError::Xml(_) => "svgtex::xml",
            SvgTexError::Structural { .. } => "svgtex::structural",
            SvgTexError::Placement { .. } => "svgtex::placement",
            SvgTexError::Render { .. } => "svgtex::render",
            SvgTexError::Config(_) => "svgtex::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            SvgTexError::Render { source, .. } => render_help(source),
            SvgTexError::Structural { attribute, .. } if attribute == "width" => Some(Box::new(
                "the root element needs a `width` such as `210mm` to convert typeset points",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

fn render_help<'a>(err: &'a RenderError) -> Option<Box<dyn fmt::Display + 'a>> {
    match err {
        RenderError::Spawn { program, .. } => Some(Box::new(format!(
            "is `{program}` installed? Set its path in the [renderer] section of the configuration"
        ))),
        RenderError::Timeout { .. } => {
            Some(Box::new("raise `timeout_secs` in the [renderer] section of the configuration"))
        }
        _ => {
            let output = err.output()?;
            let lines: Vec<_> = output.lines().collect();
            let tail = lines[lines.len().saturating_sub(TOOL_OUTPUT_LINES)..].join("\n");
            Some(Box::new(format!("tool output:\n{tail}")))
        }
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert an svgtex [`Span`](svgtex_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: svgtex_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`SvgTexError`] into a list of reportable errors.
///
/// The error itself comes first. When it was caused by a malformed attribute
/// value, one [`Reportable::Diagnostic`] per diagnostic follows.
pub fn to_reportables(err: &SvgTexError) -> Vec<Reportable<'_>> {
    let mut reportables = vec![Reportable::Error(ErrorAdapter(err))];
    if let Some(parse_err) = err.parse_error() {
        reportables.extend(
            parse_err
                .diagnostics()
                .iter()
                .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, parse_err.src()))),
        );
    }
    reportables
}

#[cfg(test)]
mod tests {
    use svgtex_parser::{ErrorCode, ParseError, Span, parse_transform_list};

    use super::*;

    #[test]
    fn test_placement_error_reports_diagnostics() {
        let parse_err = parse_transform_list("rotate(1,2)").expect_err("wrong arity");
        let err = SvgTexError::Placement {
            element: "text12".to_string(),
            attribute: "transform".to_string(),
            err: parse_err,
        };

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert!(reportables[0].to_string().contains("text12"));
        assert_eq!(
            reportables[0].code().map(|c| c.to_string()).as_deref(),
            Some("svgtex::placement")
        );

        match &reportables[1] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.code().map(|c| c.to_string()).as_deref(), Some("E103"));
                assert!(d.source_code().is_some());
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E200)
                .with_label(Span::new(0..2), "first"),
            Diagnostic::error("second error")
                .with_code(ErrorCode::E202)
                .with_label(Span::new(3..5), "second")
                .with_help("help for second"),
        ];
        let err = SvgTexError::malformed_attribute("viewBox", ParseError::new(diags, "0 0 x y"));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[1].to_string(), "first error");
        assert_eq!(reportables[2].to_string(), "second error");
    }

    #[test]
    fn test_render_error_shows_tool_output() {
        let output = (1..=30).map(|n| format!("line {n}\n")).collect::<String>();
        let err = SvgTexError::Render {
            element: "t1".to_string(),
            source: RenderError::MissingOutput {
                command: "pdflatex tmp.tex".to_string(),
                path: "tmp.pdf".into(),
                output,
            },
        };

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        let help = reportables[0].help().expect("help").to_string();
        assert!(help.contains("line 30"));
        assert!(help.contains("line 11"));
        assert!(!help.contains("line 10\n"));
    }

    #[test]
    fn test_missing_width_help() {
        let err = SvgTexError::missing_attribute("width");
        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert!(reportables[0].help().is_some());
    }

    #[test]
    fn test_all_labels_returned() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary label")
            .with_secondary_label(Span::new(6..9), "secondary label");

        let adapter = DiagnosticAdapter::new(&diag, "scale(1 2 3)");

        let labels: Vec<_> = adapter.labels().expect("labels").collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary label"));
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }
}
