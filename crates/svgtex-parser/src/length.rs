//! Grammars for lengths: the root `width`, the `viewBox` and element
//! coordinates.

use std::ops::Range;

use svgtex_core::units::LengthUnit;
use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, cut_err, eof, opt, preceded},
    stream::Location,
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    grammar::{Expected, Input, PResult, comma_wsp, failure_diagnostic, number, wsp},
    span::Span,
};

/// A length with its unit, such as `210mm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    value: f64,
    unit: LengthUnit,
}

impl Dimension {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Returns the numeric part
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the unit; a bare number is in pixels.
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }
}

/// The `viewBox` of a document, `min-x min-y width height`, reduced to the
/// width that relates user units to the document `width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    width: f64,
}

impl ViewBox {
    pub fn new(width: f64) -> Self {
        Self { width }
    }

    pub fn width(&self) -> f64 {
        self.width
    }
}

/// Unsigned decimal as written in a dimension: digits, then optionally a
/// fraction.
fn unsigned_decimal(input: &mut Input<'_>) -> PResult<(f64, Range<usize>)> {
    (digit1, opt(('.', opt(digit1))))
        .take()
        .try_map(str::parse::<f64>)
        .with_span()
        .parse_next(input)
}

fn unit_suffix(input: &mut Input<'_>) -> PResult<(LengthUnit, Range<usize>)> {
    alt((
        "em".value(LengthUnit::Em),
        "ex".value(LengthUnit::Ex),
        "px".value(LengthUnit::Px),
        "pt".value(LengthUnit::Pt),
        "pc".value(LengthUnit::Pc),
        "cm".value(LengthUnit::Cm),
        "mm".value(LengthUnit::Mm),
        "in".value(LengthUnit::In),
    ))
    .with_span()
    .parse_next(input)
}

fn dimension(input: &mut Input<'_>) -> PResult<(Dimension, Option<Range<usize>>)> {
    let (value, _) = unsigned_decimal
        .context(Expected {
            code: ErrorCode::E200,
            message: "expected a number at the start of the dimension",
            help: Some("dimensions look like `210mm`, `800` or `11in`"),
        })
        .parse_next(input)?;
    wsp.parse_next(input)?;
    let unit = opt(unit_suffix).parse_next(input)?;
    end_of_value(
        input,
        Expected {
            code: ErrorCode::E200,
            message: "unknown unit in dimension",
            help: Some("supported units are px, pt, pc, mm, cm and in"),
        },
    )?;

    let (unit, unit_span) = match unit {
        Some((unit, span)) => (unit, Some(span)),
        None => (LengthUnit::Px, None),
    };
    Ok((Dimension::new(value, unit), unit_span))
}

fn view_box(input: &mut Input<'_>) -> PResult<ViewBox> {
    let expected = Expected {
        code: ErrorCode::E202,
        message: "expected four numbers in viewBox",
        help: Some("a viewBox is `min-x min-y width height`, e.g. `0 0 210 297`"),
    };

    wsp.parse_next(input)?;
    // min-x, min-y
    number.context(expected.clone()).parse_next(input)?;
    cut_err(separated_number)
        .context(expected.clone())
        .parse_next(input)?;
    let width = cut_err(separated_number)
        .context(expected.clone())
        .parse_next(input)?;
    // height
    cut_err(separated_number)
        .context(expected.clone())
        .parse_next(input)?;
    end_of_value(input, expected)?;

    Ok(ViewBox::new(width))
}

fn separated_number(input: &mut Input<'_>) -> PResult<f64> {
    preceded(comma_wsp, number)
        .map(|(value, _)| value)
        .parse_next(input)
}

fn coordinate(input: &mut Input<'_>) -> PResult<(f64, Range<usize>)> {
    let expected = Expected {
        code: ErrorCode::E300,
        message: "expected a number",
        help: Some("coordinates are plain numbers, optionally followed by `px`"),
    };

    wsp.parse_next(input)?;
    let value = (number, opt("px"))
        .map(|(value, _)| value)
        .context(expected.clone())
        .parse_next(input)?;
    end_of_value(input, expected)?;
    Ok(value)
}

fn end_of_value(input: &mut Input<'_>, expected: Expected) -> PResult<()> {
    (wsp, eof).void().context(expected).parse_next(input)
}

fn run<'a, O>(
    source: &'a str,
    mut parser: impl FnMut(&mut Input<'a>) -> PResult<O>,
    fallback: Expected,
) -> Result<O, ParseError> {
    let mut input = Input::new(source);
    parser(&mut input).map_err(|err| {
        let position = input.current_token_start();
        ParseError::single(failure_diagnostic(err, source, position, fallback), source)
    })
}

/// Parse a dimension such as the root `width`: `<number><ws>*<unit>?`.
///
/// The unit is one of `em`, `ex`, `px`, `pt`, `pc`, `cm`, `mm`, `in`; no
/// unit means pixels. `em` and `ex` parse here but are rejected by
/// [`Dimension`] consumers that need an absolute size.
///
/// # Examples
///
/// ```
/// # use svgtex_core::units::LengthUnit;
/// # use svgtex_parser::parse_dimension;
/// let width = parse_dimension("210mm").unwrap();
/// assert_eq!(width.value(), 210.0);
/// assert_eq!(width.unit(), LengthUnit::Mm);
///
/// assert_eq!(parse_dimension("800").unwrap().unit(), LengthUnit::Px);
/// assert!(parse_dimension("10km").is_err());
/// ```
pub fn parse_dimension(source: &str) -> Result<Dimension, ParseError> {
    run(
        source,
        dimension,
        Expected {
            code: ErrorCode::E200,
            message: "malformed dimension",
            help: Some("dimensions look like `210mm`, `800` or `11in`"),
        },
    )
    .map(|(dimension, _)| dimension)
}

/// Parse a dimension and resolve the size of its unit in pixels.
///
/// Font-relative units have no absolute size and are an
/// [`ErrorCode::E201`] error pointing at the unit.
pub fn parse_absolute_dimension(source: &str) -> Result<(Dimension, f64), ParseError> {
    let (dimension, unit_span) = run(
        source,
        dimension,
        Expected {
            code: ErrorCode::E200,
            message: "malformed dimension",
            help: Some("dimensions look like `210mm`, `800` or `11in`"),
        },
    )?;

    match dimension.unit().px_per_unit() {
        Some(px) => Ok((dimension, px)),
        None => {
            let span = unit_span.map_or_else(|| Span::new(0..source.len()), Span::new);
            Err(ParseError::single(
                Diagnostic::error(format!(
                    "unsupported unit `{}`: it has no absolute size",
                    dimension.unit()
                ))
                .with_code(ErrorCode::E201)
                .with_label(span, ErrorCode::E201.description())
                .with_help("give the document width in px, pt, pc, mm, cm or in"),
                source,
            ))
        }
    }
}

/// Parse a `viewBox`: four numbers separated by whitespace and/or commas.
///
/// # Examples
///
/// ```
/// # use svgtex_parser::parse_view_box;
/// let vb = parse_view_box("0 0 210 297").unwrap();
/// assert_eq!(vb.width(), 210.0);
/// assert_eq!(parse_view_box("0,0,210,297").unwrap(), vb);
/// assert!(parse_view_box("0 0 210").is_err());
/// ```
pub fn parse_view_box(source: &str) -> Result<ViewBox, ParseError> {
    run(
        source,
        view_box,
        Expected {
            code: ErrorCode::E202,
            message: "malformed viewBox",
            help: Some("a viewBox is `min-x min-y width height`, e.g. `0 0 210 297`"),
        },
    )
}

/// Parse an `x` or `y` attribute: a number with an optional `px` suffix.
///
/// # Examples
///
/// ```
/// # use svgtex_parser::parse_coordinate;
/// assert_eq!(parse_coordinate("12.5").unwrap(), 12.5);
/// assert_eq!(parse_coordinate("-3px").unwrap(), -3.0);
/// assert!(parse_coordinate("1 2").is_err());
/// ```
pub fn parse_coordinate(source: &str) -> Result<f64, ParseError> {
    let (value, range) = run(
        source,
        coordinate,
        Expected {
            code: ErrorCode::E300,
            message: "invalid coordinate",
            help: Some("coordinates are plain numbers, optionally followed by `px`"),
        },
    )?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::single(
            Diagnostic::error("coordinate is not a finite number")
                .with_code(ErrorCode::E300)
                .with_label(Span::new(range), ErrorCode::E300.description()),
            source,
        ))
    }
}
