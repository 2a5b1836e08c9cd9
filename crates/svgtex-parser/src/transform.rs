//! Grammar for SVG `transform` attribute values.
//!
//! ```text
//! transform-list  ::= wsp* (transform (comma-wsp transform)*)? wsp*
//! transform       ::= name wsp* "(" wsp* arguments? wsp* ")"
//! arguments       ::= number (comma-wsp number)*
//! ```
//!
//! The grammar accepts any function name and argument count; a second pass
//! checks them against the supported functions so every problem in a value
//! is reported together.

use std::ops::Range;

use log::trace;
use svgtex_core::{geometry::Transform, transform::TransformOp};
use winnow::{
    Parser as _,
    combinator::{cut_err, eof, opt, preceded, repeat},
    stream::Location,
    token::take_while,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    grammar::{Expected, Input, PResult, comma_wsp, failure_diagnostic, number, wsp},
    span::Span,
};

/// A function call as written, before its name and arity are checked.
#[derive(Debug)]
struct Call<'a> {
    name: &'a str,
    name_span: Range<usize>,
    args: Vec<(f64, Range<usize>)>,
    args_span: Range<usize>,
}

fn arguments(input: &mut Input<'_>) -> PResult<Vec<(f64, Range<usize>)>> {
    let Some(first) = opt(number).parse_next(input)? else {
        return Ok(Vec::new());
    };
    let rest: Vec<(f64, Range<usize>)> =
        repeat(0.., preceded(comma_wsp, number)).parse_next(input)?;

    let mut args = Vec::with_capacity(rest.len() + 1);
    args.push(first);
    args.extend(rest);
    Ok(args)
}

fn function_name<'a>(input: &mut Input<'a>) -> PResult<(&'a str, Range<usize>)> {
    take_while(1.., |c: char| c.is_ascii_alphabetic())
        .with_span()
        .parse_next(input)
}

fn open_paren(input: &mut Input<'_>) -> PResult<()> {
    cut_err((wsp, '('))
        .void()
        .context(Expected {
            code: ErrorCode::E100,
            message: "expected `(` after transform name",
            help: Some("transform functions are written like `translate(10, 20)`"),
        })
        .parse_next(input)
}

fn close_paren(input: &mut Input<'_>) -> PResult<()> {
    cut_err((wsp, ')'))
        .void()
        .context(Expected {
            code: ErrorCode::E101,
            message: "expected a number or `)`",
            help: Some("arguments are numbers separated by commas or whitespace"),
        })
        .parse_next(input)
}

fn end_of_list(input: &mut Input<'_>) -> PResult<()> {
    (wsp, eof)
        .void()
        .context(Expected {
            code: ErrorCode::E100,
            message: "unexpected input in transform list",
            help: Some("separate transform functions with whitespace or commas"),
        })
        .parse_next(input)
}

fn call<'a>(input: &mut Input<'a>) -> PResult<Call<'a>> {
    let (name, name_span) = function_name.parse_next(input)?;
    open_paren.parse_next(input)?;

    wsp.parse_next(input)?;
    let args_start = input.current_token_start();
    let args = arguments.parse_next(input)?;
    let args_end = input.current_token_start();
    close_paren.parse_next(input)?;

    Ok(Call {
        name,
        name_span,
        args,
        args_span: args_start..args_end,
    })
}

fn transform_list<'a>(input: &mut Input<'a>) -> PResult<Vec<Call<'a>>> {
    wsp.parse_next(input)?;

    let mut calls = Vec::new();
    if let Some(first) = opt(call).parse_next(input)? {
        calls.push(first);
        let rest: Vec<Call<'a>> = repeat(0.., preceded(comma_wsp, call)).parse_next(input)?;
        calls.extend(rest);
    }

    end_of_list.parse_next(input)?;
    Ok(calls)
}

/// Check one call against the supported transform functions.
fn validate(call: &Call<'_>) -> Result<TransformOp, Diagnostic> {
    let name_span = Span::new(call.name_span.clone());
    let args_span = Span::new(call.args_span.clone());

    if let Some((_, range)) = call.args.iter().find(|(value, _)| !value.is_finite()) {
        return Err(Diagnostic::error("transform arguments must be finite numbers")
            .with_code(ErrorCode::E104)
            .with_label(Span::new(range.clone()), ErrorCode::E104.description())
            .with_secondary_label(name_span, format!("in `{}`", call.name)));
    }

    let values: Vec<f64> = call.args.iter().map(|(value, _)| *value).collect();
    let op = match (call.name, values.as_slice()) {
        ("translate", &[x]) => TransformOp::Translate { x, y: 0.0 },
        ("translate", &[x, y]) => TransformOp::Translate { x, y },
        ("matrix", &[a, b, c, d, e, f]) => TransformOp::Matrix([a, b, c, d, e, f]),
        ("rotate", &[angle]) => TransformOp::Rotate {
            angle,
            center: None,
        },
        ("rotate", &[angle, cx, cy]) => TransformOp::Rotate {
            angle,
            center: Some((cx, cy)),
        },
        ("scale", &[sx]) => TransformOp::Scale { sx, sy: sx },
        ("scale", &[sx, sy]) => TransformOp::Scale { sx, sy },
        ("translate" | "scale", _) => {
            return Err(arity(call, name_span, args_span, "1 or 2"));
        }
        ("rotate", _) => return Err(arity(call, name_span, args_span, "1 or 3")),
        ("matrix", _) => return Err(arity(call, name_span, args_span, "6")),
        ("skewX" | "skewY", _) => {
            return Err(
                Diagnostic::error(format!("unsupported transform `{}`", call.name))
                    .with_code(ErrorCode::E102)
                    .with_label(name_span, ErrorCode::E102.description())
                    .with_help(
                        "only translate, matrix, rotate and scale are supported; \
                         express the skew as a `matrix(...)`",
                    ),
            );
        }
        (name, _) => {
            return Err(Diagnostic::error(format!("unknown transform `{name}`"))
                .with_code(ErrorCode::E102)
                .with_label(name_span, ErrorCode::E102.description())
                .with_help("expected one of `translate`, `matrix`, `rotate` or `scale`"));
        }
    };
    Ok(op)
}

fn arity(call: &Call<'_>, name_span: Span, args_span: Span, expected: &str) -> Diagnostic {
    Diagnostic::error(format!(
        "`{}` takes {expected} arguments, found {}",
        call.name,
        call.args.len()
    ))
    .with_code(ErrorCode::E103)
    .with_label(args_span, ErrorCode::E103.description())
    .with_secondary_label(name_span, "in this function")
}

/// Parse a `transform` attribute value into its functions, in source order.
///
/// An empty or whitespace-only value is an empty list.
///
/// # Examples
///
/// ```
/// # use svgtex_core::transform::TransformOp;
/// # use svgtex_parser::parse_transform_list;
/// let ops = parse_transform_list("translate(10) scale(2, 3)").unwrap();
/// assert_eq!(
///     ops,
///     vec![
///         TransformOp::Translate { x: 10.0, y: 0.0 },
///         TransformOp::Scale { sx: 2.0, sy: 3.0 },
///     ]
/// );
///
/// assert!(parse_transform_list("skewX(30)").is_err());
/// ```
pub fn parse_transform_list(source: &str) -> Result<Vec<TransformOp>, ParseError> {
    let mut input = Input::new(source);
    let calls = transform_list(&mut input).map_err(|err| {
        let position = input.current_token_start();
        ParseError::single(
            failure_diagnostic(
                err,
                source,
                position,
                Expected {
                    code: ErrorCode::E104,
                    message: "invalid number",
                    help: Some("numbers look like `12`, `-0.5` or `1e3`"),
                },
            ),
            source,
        )
    })?;

    let mut collector = DiagnosticCollector::new();
    let mut ops = Vec::with_capacity(calls.len());
    for call in &calls {
        match validate(call) {
            Ok(op) => ops.push(op),
            Err(diagnostic) => collector.emit(diagnostic),
        }
    }
    collector.finish(source)?;

    trace!(transform = source, count = ops.len(); "Parsed transform list");
    Ok(ops)
}

/// Parse a single transform function such as `rotate(45)`.
///
/// Lists with more than one function are rejected.
pub fn parse_transform(source: &str) -> Result<TransformOp, ParseError> {
    let ops = parse_transform_list(source)?;
    match ops.as_slice() {
        [op] => Ok(*op),
        _ => Err(ParseError::single(
            Diagnostic::error(format!(
                "expected exactly one transform function, found {}",
                ops.len()
            ))
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..source.len()), ErrorCode::E100.description()),
            source,
        )),
    }
}

/// Parse a `transform` attribute value straight into its matrix.
///
/// # Examples
///
/// ```
/// # use svgtex_core::geometry::Point;
/// # use svgtex_parser::parse_transform_matrix;
/// let m = parse_transform_matrix("translate(10, 20)").unwrap();
/// assert_eq!(m.apply(Point::new(1.0, 1.0)), Point::new(11.0, 21.0));
/// ```
pub fn parse_transform_matrix(source: &str) -> Result<Transform, ParseError> {
    parse_transform_list(source).map(|ops| Transform::from_ops(&ops))
}
