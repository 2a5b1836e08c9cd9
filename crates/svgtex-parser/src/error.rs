//! Diagnostic error model for attribute grammars.
//!
//! Every grammar reports failures as a [`ParseError`] holding one or more
//! [`Diagnostic`]s together with the attribute text they point into, so a
//! front end can render a labelled snippet of the offending value.

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
