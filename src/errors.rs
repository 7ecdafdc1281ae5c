//! Error types for the parser and the coercion layer

use std::fmt::{Display, Formatter};

use crate::coords::Coords;

/// Global result type used throughout the parser stages
pub type ParserResult<T> = Result<T, ParserError>;

/// Result type used by the checked coercion accessors on [crate::Value]
pub type CoercionResult<T> = Result<T, CoercionError>;

/// A global enumeration of parser error details
#[derive(Debug, Clone, PartialEq)]
pub enum ParserErrorDetails {
    /// The input ended where the grammar still required something
    EndOfInput,
    /// The underlying character source failed
    StreamFailure,
    /// The supplied file could not be opened for parsing
    InvalidFile,
    /// A character which doesn't start any production
    UnexpectedCharacter(char),
    /// A specific character was required, something else was found
    ExpectedCharacter { expected: char, found: char },
    /// A comma directly before a closing `]` or `}`
    TrailingComma,
    /// A bare token which is none of `null`, `true`, `false` or `undefined`
    InvalidToken(String),
    /// An invalid escape sequence within a string
    InvalidEscape(String),
    /// A `\uXXXX` sequence which doesn't denote a valid code point
    InvalidUnicodeEscape(String),
    /// The input ended inside a quoted string
    UnterminatedString,
    /// A numeric literal which doesn't match the grammar
    InvalidNumber(String),
    /// Malformed base64 within a blob literal
    InvalidBlob(String),
}

impl Display for ParserErrorDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfInput => write!(f, "premature end of input"),
            Self::StreamFailure => write!(f, "failure in the underlying input stream"),
            Self::InvalidFile => write!(f, "could not open the supplied file"),
            Self::UnexpectedCharacter(c) => write!(f, "unexpected character '{}'", c),
            Self::ExpectedCharacter { expected, found } => {
                write!(f, "expected '{}', found '{}'", expected, found)
            }
            Self::TrailingComma => write!(f, "trailing comma"),
            Self::InvalidToken(t) => write!(f, "invalid token \"{}\"", t),
            Self::InvalidEscape(s) => write!(f, "invalid escape sequence \"{}\"", s),
            Self::InvalidUnicodeEscape(s) => write!(f, "invalid unicode escape \"{}\"", s),
            Self::UnterminatedString => write!(f, "string not closed before end of input"),
            Self::InvalidNumber(s) => write!(f, "invalid numeric literal \"{}\"", s),
            Self::InvalidBlob(s) => write!(f, "invalid blob literal: {}", s),
        }
    }
}

/// The general parser error structure.  All sub-parser failures are surfaced
/// to the caller in this shape, with the coordinates of the offending input
/// attached at the top-level parse boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    /// The detail code for the error
    pub details: ParserErrorDetails,
    /// Parser coordinates, if they have been recorded yet
    pub coords: Option<Coords>,
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.coords {
            Some(coords) => write!(f, "syntax error: {} at {}", self.details, coords),
            None => write!(f, "syntax error: {}", self.details),
        }
    }
}

impl std::error::Error for ParserError {}

impl ParserError {
    /// Attach coordinates to an error which doesn't carry any yet
    pub(crate) fn with_coords(self, coords: Coords) -> Self {
        ParserError {
            details: self.details,
            coords: self.coords.or(Some(coords)),
        }
    }
}

/// Macro for producing a [ParserError] wrapped in [Err], with optional coordinates
#[macro_export]
macro_rules! parser_error {
    ($details: expr) => {
        Err($crate::errors::ParserError {
            details: $details,
            coords: None,
        })
    };
    ($details: expr, $coords: expr) => {
        Err($crate::errors::ParserError {
            details: $details,
            coords: Some($coords),
        })
    };
}

/// Errors raised by the checked coercion accessors.  These are contract
/// violations at the call site and are never retried or recovered internally.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// The wrong structural accessor was used for the value's variant
    TypeMismatch {
        /// The variant the accessor requires
        expected: &'static str,
        /// The variant actually present
        found: &'static str,
    },
    /// A numeric value doesn't fit the requested width or sign
    OutOfRange {
        /// Textual form of the offending value
        value: String,
        /// Name of the target type
        target: &'static str,
    },
}

impl Display for CoercionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Self::OutOfRange { value, target } => {
                write!(f, "value {} out of range for {}", value, target)
            }
        }
    }
}

impl std::error::Error for CoercionError {}
