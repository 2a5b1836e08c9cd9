//! Lexical building blocks shared by the attribute grammars.

use std::ops::Range;

use winnow::{
    Parser as _,
    ascii::{float, multispace0},
    combinator::opt,
    error::{ContextError, ErrMode, ModalResult},
    stream::LocatingSlice,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

pub(crate) type Input<'a> = LocatingSlice<&'a str>;
pub(crate) type PResult<O> = ModalResult<O, ContextError<Expected>>;

/// Diagnostic information attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Expected {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
}

/// Parse a number literal together with its byte range.
pub(crate) fn number(input: &mut Input<'_>) -> PResult<(f64, Range<usize>)> {
    float.with_span().parse_next(input)
}

/// Skip optional whitespace.
pub(crate) fn wsp(input: &mut Input<'_>) -> PResult<()> {
    multispace0.void().parse_next(input)
}

/// Parse the SVG `comma-wsp` separator. It may be empty: `10-5` is two
/// numbers.
pub(crate) fn comma_wsp(input: &mut Input<'_>) -> PResult<()> {
    (wsp, opt(','), wsp).void().parse_next(input)
}

/// Convert a grammar failure at `position` into a diagnostic.
///
/// Uses the innermost `Expected` context when one is attached and
/// `fallback` otherwise.
pub(crate) fn failure_diagnostic(
    err: ErrMode<ContextError<Expected>>,
    source: &str,
    position: usize,
    fallback: Expected,
) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };
    let Expected {
        code,
        message,
        help,
    } = context_error.context().next().cloned().unwrap_or(fallback);

    let label = if position >= source.len() {
        "unexpected end of value"
    } else {
        code.description()
    };
    let mut diag = Diagnostic::error(message)
        .with_code(code)
        .with_label(point_span(source, position), label);
    if let Some(help) = help {
        diag = diag.with_help(help);
    }
    diag
}

/// A span covering the character at `position`, or an empty span at the end
/// of the value.
pub(crate) fn point_span(source: &str, position: usize) -> Span {
    let end = source
        .get(position..)
        .and_then(|rest| rest.chars().next())
        .map_or(position, |c| position + c.len_utf8());
    Span::new(position..end)
}
