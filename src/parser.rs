//! The recursive-descent parser.  Consumes characters from a [Scanner] and
//! builds a [Value] tree; contains the explicit state machines for numeric
//! and string literals, and the byte-oriented decoder for blob literals.
//!
//! All sub-parser failures are surfaced through the top-level entry points as
//! a single error annotated with the line and column of the offending input.
//! No partial tree is ever returned, and there is no error recovery.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::b64;
use crate::decoders::{DecoderSelector, Encoding};
use crate::errors::{ParserErrorDetails, ParserResult};
use crate::parser_error;
use crate::scanner::{Scanner, ScannerMode};
use crate::value::Value;

/// States for the string parsing state machine
#[derive(Debug, Copy, Clone, PartialEq)]
enum StringState {
    Normal,
    Escape,
    UnicodeHex(u8),
}

/// States for the number parsing state machine
#[derive(Debug, Copy, Clone, PartialEq)]
enum NumberState {
    Start,
    AfterSign,
    AfterInitialZero,
    AfterFirstDigit,
    AfterPeriod,
    AfterDecDigit,
    AfterExponent,
    AfterExponentSign,
    AfterExponentDigit,
}

/// Main JSON parser struct
pub struct Parser {
    decoders: DecoderSelector,
    encoding: Encoding,
    mode: ScannerMode,
}

impl Default for Parser {
    /// The default parser reads UTF-8 and runs in strict mode (no comments)
    fn default() -> Self {
        Self {
            decoders: Default::default(),
            encoding: Default::default(),
            mode: Default::default(),
        }
    }
}

impl Parser {
    /// Select a specific input [Encoding] for the byte-oriented entry points
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Select a specific [ScannerMode], e.g. to enable `#` end-of-line
    /// comments
    pub fn with_mode(mut self, mode: ScannerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Parse the contents of a file
    pub fn parse_file<PathLike: AsRef<Path>>(&self, path: PathLike) -> ParserResult<Value> {
        match File::open(&path) {
            Ok(f) => {
                let mut reader = BufReader::new(f);
                let mut chars = self.decoders.new_decoder(&mut reader, self.encoding);
                self.parse(&mut chars)
            }
            Err(_) => parser_error!(ParserErrorDetails::InvalidFile),
        }
    }

    /// Parse a byte slice, decoding it with the configured [Encoding]
    pub fn parse_bytes(&self, bytes: &[u8]) -> ParserResult<Value> {
        let mut reader = BufReader::new(bytes);
        let mut chars = self.decoders.new_decoder(&mut reader, self.encoding);
        self.parse(&mut chars)
    }

    /// Parse a string slice
    pub fn parse_str(&self, str: &str) -> ParserResult<Value> {
        self.parse(&mut str.chars())
    }

    /// Parse a document from a stream of characters.  An empty document is
    /// not an error and yields [Value::Undefined]; any trailing input after
    /// one complete value is left unconsumed.
    pub fn parse(&self, chars: &mut impl Iterator<Item = char>) -> ParserResult<Value> {
        let mut scanner = Scanner::new(chars).with_mode(self.mode);
        scanner.skip_insignificant();
        if scanner.current().is_none() {
            return Ok(Value::Undefined);
        }
        self.parse_value(&mut scanner)
            .map_err(|err| err.with_coords(scanner.coords()))
    }

    /// Dispatch on the first significant character of a value production
    fn parse_value(&self, scanner: &mut Scanner) -> ParserResult<Value> {
        scanner.skip_insignificant();
        match scanner.current() {
            None => parser_error!(ParserErrorDetails::EndOfInput, scanner.coords()),
            Some('{') => self.parse_object(scanner),
            Some('[') => self.parse_array(scanner),
            Some('"') => Ok(Value::String(self.parse_string_raw(scanner)?)),
            Some('=') => self.parse_blob(scanner),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(scanner),
            Some(_) => self.parse_bare_token(scanner),
        }
    }

    /// An object is a brace-delimited list of comma separated `"key": value`
    /// pairs.  Duplicate keys replace earlier entries (last-write-wins).
    fn parse_object(&self, scanner: &mut Scanner) -> ParserResult<Value> {
        scanner.advance();
        scanner.skip_insignificant();
        let mut object = Value::object();
        if scanner.current() == Some('}') {
            scanner.advance();
            return Ok(object);
        }
        loop {
            scanner.skip_insignificant();
            match scanner.current() {
                None => return parser_error!(ParserErrorDetails::EndOfInput, scanner.coords()),
                Some('}') => {
                    return parser_error!(ParserErrorDetails::TrailingComma, scanner.coords())
                }
                Some('"') => (),
                Some(found) => {
                    return parser_error!(
                        ParserErrorDetails::ExpectedCharacter {
                            expected: '"',
                            found
                        },
                        scanner.coords()
                    )
                }
            }
            let key = self.parse_string_raw(scanner)?;
            scanner.skip_insignificant();
            match scanner.current() {
                Some(':') => scanner.advance(),
                None => return parser_error!(ParserErrorDetails::EndOfInput, scanner.coords()),
                Some(found) => {
                    return parser_error!(
                        ParserErrorDetails::ExpectedCharacter {
                            expected: ':',
                            found
                        },
                        scanner.coords()
                    )
                }
            }
            let value = self.parse_value(scanner)?;
            object.insert(key, value);
            scanner.skip_insignificant();
            match scanner.current() {
                Some(',') => scanner.advance(),
                Some('}') => {
                    scanner.advance();
                    return Ok(object);
                }
                None => return parser_error!(ParserErrorDetails::EndOfInput, scanner.coords()),
                Some(found) => {
                    return parser_error!(
                        ParserErrorDetails::ExpectedCharacter {
                            expected: ',',
                            found
                        },
                        scanner.coords()
                    )
                }
            }
        }
    }

    /// An array is a bracket-delimited list of comma separated values
    fn parse_array(&self, scanner: &mut Scanner) -> ParserResult<Value> {
        scanner.advance();
        scanner.skip_insignificant();
        let mut items: Vec<Value> = vec![];
        if scanner.current() == Some(']') {
            scanner.advance();
            return Ok(Value::Array(items));
        }
        loop {
            scanner.skip_insignificant();
            if scanner.current() == Some(']') {
                return parser_error!(ParserErrorDetails::TrailingComma, scanner.coords());
            }
            items.push(self.parse_value(scanner)?);
            scanner.skip_insignificant();
            match scanner.current() {
                Some(',') => scanner.advance(),
                Some(']') => {
                    scanner.advance();
                    return Ok(Value::Array(items));
                }
                None => return parser_error!(ParserErrorDetails::EndOfInput, scanner.coords()),
                Some(found) => {
                    return parser_error!(
                        ParserErrorDetails::ExpectedCharacter {
                            expected: ',',
                            found
                        },
                        scanner.coords()
                    )
                }
            }
        }
    }

    /// Read a quoted string in raw form.  This state machine is shared
    /// between string values and object keys.
    ///
    /// A `\uXXXX` escape must denote a Unicode scalar value on its own;
    /// UTF-16 surrogate halves are not combined into pairs and fail with
    /// [ParserErrorDetails::InvalidUnicodeEscape].  Characters outside the
    /// BMP pass through unescaped instead.
    fn parse_string_raw(&self, scanner: &mut Scanner) -> ParserResult<String> {
        match scanner.current() {
            Some('"') => scanner.advance(),
            None => return parser_error!(ParserErrorDetails::EndOfInput, scanner.coords()),
            Some(found) => {
                return parser_error!(
                    ParserErrorDetails::ExpectedCharacter {
                        expected: '"',
                        found
                    },
                    scanner.coords()
                )
            }
        }
        let mut buffer = String::new();
        let mut state = StringState::Normal;
        let mut unit: u32 = 0;
        let mut hex = String::new();
        loop {
            let c = match scanner.current() {
                Some(c) => c,
                None => {
                    return parser_error!(ParserErrorDetails::UnterminatedString, scanner.coords())
                }
            };
            match state {
                StringState::Normal => match c {
                    '"' => {
                        scanner.advance();
                        return Ok(buffer);
                    }
                    '\\' => state = StringState::Escape,
                    _ => buffer.push(c),
                },
                StringState::Escape => {
                    state = StringState::Normal;
                    match c {
                        '"' => buffer.push('"'),
                        '\\' => buffer.push('\\'),
                        '/' => buffer.push('/'),
                        'b' => buffer.push('\u{0008}'),
                        'f' => buffer.push('\u{000c}'),
                        'n' => buffer.push('\n'),
                        'r' => buffer.push('\r'),
                        't' => buffer.push('\t'),
                        'u' => {
                            unit = 0;
                            hex.clear();
                            state = StringState::UnicodeHex(0);
                        }
                        _ => {
                            return parser_error!(
                                ParserErrorDetails::InvalidEscape(format!("\\{}", c)),
                                scanner.coords()
                            )
                        }
                    }
                }
                StringState::UnicodeHex(index) => {
                    let digit = match c.to_digit(16) {
                        Some(d) => d,
                        None => {
                            return parser_error!(
                                ParserErrorDetails::InvalidUnicodeEscape(format!(
                                    "\\u{}{}",
                                    hex, c
                                )),
                                scanner.coords()
                            )
                        }
                    };
                    hex.push(c);
                    unit = (unit << 4) | digit;
                    if index == 3 {
                        match char::from_u32(unit) {
                            Some(decoded) => buffer.push(decoded),
                            None => {
                                return parser_error!(
                                    ParserErrorDetails::InvalidUnicodeEscape(format!(
                                        "\\u{}",
                                        hex
                                    )),
                                    scanner.coords()
                                )
                            }
                        }
                        state = StringState::Normal;
                    } else {
                        state = StringState::UnicodeHex(index + 1);
                    }
                }
            }
            scanner.advance();
        }
    }

    /// Read a numeric literal.  Integral literals parse to the narrowest of
    /// `u64` (non-negative) or `i64` (negative); anything with a fraction or
    /// exponent, or overflowing 64 bits, parses to `f64`.
    fn parse_number(&self, scanner: &mut Scanner) -> ParserResult<Value> {
        let mut buffer = String::new();
        let mut state = NumberState::Start;
        let mut negative = false;
        let mut decimal = false;
        loop {
            let c = scanner.current();
            match state {
                NumberState::Start => match c {
                    Some('-') => {
                        buffer.push('-');
                        negative = true;
                        state = NumberState::AfterSign;
                        scanner.advance();
                    }
                    Some('0') => {
                        buffer.push('0');
                        state = NumberState::AfterInitialZero;
                        scanner.advance();
                    }
                    Some(d @ '1'..='9') => {
                        buffer.push(d);
                        state = NumberState::AfterFirstDigit;
                        scanner.advance();
                    }
                    _ => return self.invalid_number(scanner, buffer),
                },
                NumberState::AfterSign => match c {
                    Some('0') => {
                        buffer.push('0');
                        state = NumberState::AfterInitialZero;
                        scanner.advance();
                    }
                    Some(d @ '1'..='9') => {
                        buffer.push(d);
                        state = NumberState::AfterFirstDigit;
                        scanner.advance();
                    }
                    _ => return self.invalid_number(scanner, buffer),
                },
                NumberState::AfterInitialZero => match c {
                    Some('0'..='9') => {
                        // a leading zero followed by further digits
                        return self.invalid_number(scanner, buffer);
                    }
                    Some('.') => {
                        buffer.push('.');
                        decimal = true;
                        state = NumberState::AfterPeriod;
                        scanner.advance();
                    }
                    Some('e') | Some('E') => {
                        buffer.push('e');
                        decimal = true;
                        state = NumberState::AfterExponent;
                        scanner.advance();
                    }
                    _ => break,
                },
                NumberState::AfterFirstDigit => match c {
                    Some(d @ '0'..='9') => {
                        buffer.push(d);
                        scanner.advance();
                    }
                    Some('.') => {
                        buffer.push('.');
                        decimal = true;
                        state = NumberState::AfterPeriod;
                        scanner.advance();
                    }
                    Some('e') | Some('E') => {
                        buffer.push('e');
                        decimal = true;
                        state = NumberState::AfterExponent;
                        scanner.advance();
                    }
                    _ => break,
                },
                NumberState::AfterPeriod => match c {
                    Some(d @ '0'..='9') => {
                        buffer.push(d);
                        state = NumberState::AfterDecDigit;
                        scanner.advance();
                    }
                    _ => return self.invalid_number(scanner, buffer),
                },
                NumberState::AfterDecDigit => match c {
                    Some(d @ '0'..='9') => {
                        buffer.push(d);
                        scanner.advance();
                    }
                    Some('e') | Some('E') => {
                        buffer.push('e');
                        state = NumberState::AfterExponent;
                        scanner.advance();
                    }
                    _ => break,
                },
                NumberState::AfterExponent => match c {
                    Some(s @ '+') | Some(s @ '-') => {
                        buffer.push(s);
                        state = NumberState::AfterExponentSign;
                        scanner.advance();
                    }
                    Some(d @ '0'..='9') => {
                        buffer.push(d);
                        state = NumberState::AfterExponentDigit;
                        scanner.advance();
                    }
                    _ => return self.invalid_number(scanner, buffer),
                },
                NumberState::AfterExponentSign => match c {
                    Some(d @ '0'..='9') => {
                        buffer.push(d);
                        state = NumberState::AfterExponentDigit;
                        scanner.advance();
                    }
                    _ => return self.invalid_number(scanner, buffer),
                },
                NumberState::AfterExponentDigit => match c {
                    Some(d @ '0'..='9') => {
                        buffer.push(d);
                        scanner.advance();
                    }
                    _ => break,
                },
            }
        }

        if !decimal {
            if negative {
                if let Ok(v) = lexical::parse::<i64, _>(buffer.as_bytes()) {
                    return Ok(Value::SignedInt(v));
                }
            } else if let Ok(v) = lexical::parse::<u64, _>(buffer.as_bytes()) {
                return Ok(Value::UnsignedInt(v));
            }
        }
        match fast_float::parse(buffer.as_bytes()) {
            Ok(v) => Ok(Value::Double(v)),
            Err(_) => self.invalid_number(scanner, buffer),
        }
    }

    fn invalid_number(&self, scanner: &Scanner, mut fragment: String) -> ParserResult<Value> {
        if let Some(c) = scanner.current() {
            if !c.is_whitespace() {
                fragment.push(c);
            }
        }
        parser_error!(
            ParserErrorDetails::InvalidNumber(fragment),
            scanner.coords()
        )
    }

    /// Read a blob literal: base64 between an opening and a closing `=`.
    /// Any trailing `=` padding beyond the closing delimiter is consumed and
    /// discarded.
    fn parse_blob(&self, scanner: &mut Scanner) -> ParserResult<Value> {
        scanner.advance();
        let mut decoder = b64::Decoder::default();
        loop {
            match scanner.current() {
                None => {
                    return parser_error!(
                        ParserErrorDetails::InvalidBlob("blob not closed".to_string()),
                        scanner.coords()
                    )
                }
                Some('=') => {
                    scanner.advance();
                    while scanner.current() == Some('=') {
                        scanner.advance();
                    }
                    return match decoder.finish() {
                        Some(bytes) => Ok(Value::Blob(bytes)),
                        None => parser_error!(
                            ParserErrorDetails::InvalidBlob(
                                "truncated base64 group".to_string()
                            ),
                            scanner.coords()
                        ),
                    };
                }
                Some(c) => {
                    if !decoder.push(c) {
                        return parser_error!(
                            ParserErrorDetails::InvalidBlob(format!(
                                "invalid base64 character '{}'",
                                c
                            )),
                            scanner.coords()
                        );
                    }
                    scanner.advance();
                }
            }
        }
    }

    /// Read a bare (unquoted) token and match it against the literal
    /// keywords.  Numeric-looking input never reaches this production since
    /// `-` and digits dispatch straight into the number state machine.
    fn parse_bare_token(&self, scanner: &mut Scanner) -> ParserResult<Value> {
        let start = scanner.coords();
        let mut token = String::new();
        while let Some(c) = scanner.current() {
            if c.is_whitespace() || c == ',' || c == ']' || c == '}' {
                break;
            }
            token.push(c);
            scanner.advance();
        }
        match token.as_str() {
            "null" => Ok(Value::Null),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "undefined" => Ok(Value::Undefined),
            _ => parser_error!(ParserErrorDetails::InvalidToken(token), start),
        }
    }
}
