//! # jsonx
//!
//! A JSON document model, parser and writer with two non-standard
//! extensions:
//!
//! - *blob literals*: raw binary carried inline as unpadded base64 between
//!   `=` delimiters, e.g. `=Zm9vYmFy=`
//! - *end-of-line comments*: everything from `#` to the end of the line is
//!   skipped when the parser is put into [ScannerMode::HashComments]
//!
//! Parsed documents land in a [Value] tree which distinguishes signed,
//! unsigned and floating point numbers, preserves object key insertion
//! order, and carries an explicit [Value::Undefined] variant for absent
//! entries.  The writer in [writer] is the semantic inverse of the parser
//! for every value the parser can produce.
//!
//! ## Basic usage
//!
//! ```rust
//! use jsonx::{parse_str, to_string, Value};
//!
//! let doc = parse_str(r#"{"name": "widget", "count": 4, "icon": =Zm9v=}"#).unwrap();
//! assert_eq!(doc.get("count").and_then(|v| v.as_u64().ok()), Some(4));
//! assert_eq!(doc.get("icon").and_then(|v| v.as_blob().ok()), Some(&b"foo"[..]));
//! assert_eq!(to_string(&doc), r#"{"name":"widget","count":4,"icon":=Zm9v=}"#);
//! ```
//!
//! ## Comments
//!
//! ```rust
//! use jsonx::{Parser, ScannerMode};
//!
//! let parser = Parser::default().with_mode(ScannerMode::HashComments);
//! let doc = parser.parse_str("[1, 2, # trailing noise\n 3]").unwrap();
//! assert_eq!(doc.size(), 3);
//! ```

mod b64;
pub mod coords;
mod decoders;
pub mod errors;
pub mod parser;
mod scanner;
pub mod value;
pub mod writer;

pub use crate::coords::Coords;
pub use crate::decoders::Encoding;
pub use crate::errors::{
    CoercionError, CoercionResult, ParserError, ParserErrorDetails, ParserResult,
};
pub use crate::parser::Parser;
pub use crate::scanner::ScannerMode;
pub use crate::value::Value;
pub use crate::writer::to_string;

/// Parse a complete document from a string using the default (strict,
/// UTF-8) parser configuration
pub fn parse_str(input: &str) -> ParserResult<Value> {
    Parser::default().parse_str(input)
}
