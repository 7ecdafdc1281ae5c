//! The serializer.  Converts a [Value] tree into canonical JSON text, and is
//! the semantic inverse of the parser for every value the parser can
//! produce.
//!
//! String escaping and blob encoding each have exactly one implementation
//! here, shared between object keys, string values and every nesting level.
//!
//! Policy for [Value::Undefined] (not valid JSON interchange, documented):
//! object entries with an undefined value are skipped entirely, undefined
//! array elements are emitted as `null`, and an undefined value at the top
//! level is written as the literal `undefined`.

use std::fmt::{Display, Formatter};

use crate::b64;
use crate::value::Value;

/// Serialize a [Value] tree to canonical JSON text.  This is a total
/// function: no value fails to serialize.
pub fn to_string(value: &Value) -> String {
    let mut buffer = String::new();
    write_value(&mut buffer, value);
    buffer
}

fn write_value(buffer: &mut String, value: &Value) {
    match value {
        Value::Undefined => buffer.push_str("undefined"),
        Value::Null => buffer.push_str("null"),
        Value::Bool(v) => buffer.push_str(if *v { "true" } else { "false" }),
        Value::SignedInt(v) => buffer.push_str(&v.to_string()),
        Value::UnsignedInt(v) => buffer.push_str(&v.to_string()),
        Value::Double(v) => write_double(buffer, *v),
        Value::String(s) => write_escaped(buffer, s),
        Value::Blob(bytes) => {
            buffer.push('=');
            buffer.push_str(&b64::encode(bytes));
            buffer.push('=');
        }
        Value::Array(items) => {
            buffer.push('[');
            let mut first = true;
            for item in items {
                if first {
                    first = false;
                } else {
                    buffer.push(',');
                }
                if item.is_defined() {
                    write_value(buffer, item);
                } else {
                    buffer.push_str("null");
                }
            }
            buffer.push(']');
        }
        Value::Object(entries) => {
            buffer.push('{');
            let mut first = true;
            for (key, child) in entries {
                if !child.is_defined() {
                    continue;
                }
                if first {
                    first = false;
                } else {
                    buffer.push(',');
                }
                write_escaped(buffer, key);
                buffer.push(':');
                write_value(buffer, child);
            }
            buffer.push('}');
        }
    }
}

/// Write a double using the shortest decimal representation that recovers
/// the exact same 64-bit value on re-parse.  A `.0` suffix keeps integral
/// doubles from re-parsing as integers; infinities are written as literals
/// which overflow back to the same double, and NaN (which the parser can
/// never produce) degrades to `null`.
fn write_double(buffer: &mut String, v: f64) {
    if v.is_nan() {
        buffer.push_str("null");
        return;
    }
    if v.is_infinite() {
        buffer.push_str(if v > 0.0 { "1e999" } else { "-1e999" });
        return;
    }
    let formatted = v.to_string();
    buffer.push_str(&formatted);
    if !formatted.contains(['.', 'e', 'E']) {
        buffer.push_str(".0");
    }
}

/// The single canonical string escaping routine.  The short escapes cover
/// `" \ / \b \f \n \r \t`; all other control characters below 0x20 are
/// written as `\u00XX`; everything else passes through unescaped.
fn write_escaped(buffer: &mut String, s: &str) {
    buffer.push('"');
    for c in s.chars() {
        match c {
            '"' => buffer.push_str("\\\""),
            '\\' => buffer.push_str("\\\\"),
            '/' => buffer.push_str("\\/"),
            '\u{0008}' => buffer.push_str("\\b"),
            '\u{000c}' => buffer.push_str("\\f"),
            '\n' => buffer.push_str("\\n"),
            '\r' => buffer.push_str("\\r"),
            '\t' => buffer.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                buffer.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => buffer.push(c),
        }
    }
    buffer.push('"');
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use crate::value::Value;
    use crate::writer::to_string;

    #[test]
    fn should_write_literals() {
        assert_eq!(to_string(&Value::Null), "null");
        assert_eq!(to_string(&Value::Bool(true)), "true");
        assert_eq!(to_string(&Value::Bool(false)), "false");
        assert_eq!(to_string(&Value::Undefined), "undefined");
    }

    #[test]
    fn should_write_integers() {
        assert_eq!(to_string(&Value::UnsignedInt(0)), "0");
        assert_eq!(to_string(&Value::SignedInt(-42)), "-42");
        assert_eq!(
            to_string(&Value::UnsignedInt(u64::MAX)),
            "18446744073709551615"
        );
    }

    #[test]
    fn should_write_doubles_that_reparse_as_doubles() {
        assert_eq!(to_string(&Value::Double(3.5)), "3.5");
        assert_eq!(to_string(&Value::Double(1.0)), "1.0");
        assert_eq!(to_string(&Value::Double(-0.0)), "-0.0");
        assert_eq!(to_string(&Value::Double(f64::INFINITY)), "1e999");
        assert_eq!(to_string(&Value::Double(f64::NEG_INFINITY)), "-1e999");
        assert_eq!(to_string(&Value::Double(f64::NAN)), "null");
    }

    #[test]
    fn should_escape_strings() {
        assert_eq!(to_string(&Value::from("plain")), r#""plain""#);
        assert_eq!(
            to_string(&Value::from("a\"b\\c/d")),
            r#""a\"b\\c\/d""#
        );
        assert_eq!(
            to_string(&Value::from("\u{8}\u{c}\n\r\t")),
            r#""\b\f\n\r\t""#
        );
        assert_eq!(
            to_string(&Value::from("\u{1}\u{1f}")),
            "\"\\u0001\\u001f\""
        );
        assert_eq!(to_string(&Value::from("héllo")), r#""héllo""#);
    }

    #[test]
    fn should_write_blobs() {
        assert_eq!(to_string(&Value::blob(vec![])), "==");
        assert_eq!(to_string(&Value::blob(*b"foobar")), "=Zm9vYmFy=");
    }

    #[test]
    fn should_write_arrays_with_undefined_as_null() {
        let arr = Value::Array(vec![
            Value::UnsignedInt(1),
            Value::Undefined,
            Value::Bool(false),
        ]);
        assert_eq!(to_string(&arr), "[1,null,false]");
        assert_eq!(to_string(&Value::array()), "[]");
    }

    #[test]
    fn should_skip_undefined_object_entries() {
        let mut obj = Value::object();
        obj.insert("a", 1u64);
        obj.insert("gone", Value::Undefined);
        obj.insert("b", Value::Null);
        assert_eq!(to_string(&obj), r#"{"a":1,"b":null}"#);
    }

    #[test]
    fn should_preserve_insertion_order() {
        let mut obj = Value::object();
        obj.insert("z", 1u64);
        obj.insert("a", 2u64);
        obj.insert("m", 3u64);
        assert_eq!(to_string(&obj), r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn should_escape_object_keys() {
        let mut obj = Value::object();
        obj.insert("a\"b", 1u64);
        assert_eq!(to_string(&obj), r#"{"a\"b":1}"#);
    }
}
