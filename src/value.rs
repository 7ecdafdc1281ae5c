//! The document model: a closed tagged union representing every JSON value,
//! plus the two non-standard members of the family - [Value::Blob] for raw
//! byte arrays and [Value::Undefined] as the distinct "entry absent" marker.
//!
//! Children of arrays and objects are exclusively owned by their parent, so
//! the tree is acyclic by construction and dropping a value recursively
//! releases the whole subtree.

use crate::errors::{CoercionError, CoercionResult};

/// Boundary constants used when range-checking rounded doubles
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// A single JSON (plus extensions) value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Marker for "not present"; serializes to a non-JSON literal
    Undefined,
    /// Canonical null value
    Null,
    /// Canonical boolean value
    Bool(bool),
    /// 64-bit signed integer
    SignedInt(i64),
    /// 64-bit unsigned integer
    UnsignedInt(u64),
    /// 64-bit floating point value
    Double(f64),
    /// Owned text
    String(String),
    /// Owned raw bytes (non-standard extension)
    Blob(Vec<u8>),
    /// Ordered sequence of child values
    Array(Vec<Value>),
    /// Ordered sequence of key/value pairs; insertion order is preserved and
    /// keys are kept unique through last-write-wins insertion
    Object(Vec<(String, Value)>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl Value {
    /// Create a new, empty array value
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Create a new, empty object value
    pub fn object() -> Self {
        Value::Object(Vec::new())
    }

    /// Create a blob value from anything convertible into bytes
    pub fn blob(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Blob(bytes.into())
    }

    /// The name of the active variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::SignedInt(_) => "signed integer",
            Value::UnsignedInt(_) => "unsigned integer",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Blob(_) => "blob",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// True for everything except [Value::Undefined]
    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Value::SignedInt(_))
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, Value::UnsignedInt(_))
    }

    /// True for either of the integer variants
    pub fn is_integer(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    /// True for any of the numeric variants
    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_double()
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_blob(&self) -> bool {
        matches!(self, Value::Blob(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// The element count of the value.  This is the explicit "size as a
    /// number" fallback: [Value::Undefined] counts 0, containers report their
    /// length (object entries with undefined values are not counted), strings
    /// their character count, blobs their byte count, and every scalar 1.
    pub fn size(&self) -> usize {
        match self {
            Value::Undefined => 0,
            Value::String(s) => s.chars().count(),
            Value::Blob(b) => b.len(),
            Value::Array(items) => items.len(),
            Value::Object(entries) => entries.iter().filter(|(_, v)| v.is_defined()).count(),
            _ => 1,
        }
    }
}

/// Checked coercion accessors.  Reads never mutate the receiver; a wrong
/// structural accessor fails with [CoercionError::TypeMismatch] and a
/// narrowing conversion that doesn't fit fails with
/// [CoercionError::OutOfRange].
impl Value {
    /// Coerce to a boolean: undefined and null are false, numerics are
    /// false exactly when zero (doubles are rounded first)
    pub fn as_bool(&self) -> CoercionResult<bool> {
        match self {
            Value::Undefined | Value::Null => Ok(false),
            Value::Bool(b) => Ok(*b),
            Value::SignedInt(v) => Ok(*v != 0),
            Value::UnsignedInt(v) => Ok(*v != 0),
            Value::Double(v) => Ok(v.round() != 0.0),
            _ => Err(self.mismatch("boolean")),
        }
    }

    /// Coerce to an unsigned 64-bit integer.  Doubles are rounded to the
    /// nearest integer, ties away from zero, before the range check.
    pub fn as_u64(&self) -> CoercionResult<u64> {
        match self {
            Value::Bool(b) => Ok(u64::from(*b)),
            Value::SignedInt(v) => {
                if *v >= 0 {
                    Ok(*v as u64)
                } else {
                    Err(self.out_of_range("u64"))
                }
            }
            Value::UnsignedInt(v) => Ok(*v),
            Value::Double(v) => {
                let d = v.round();
                if d >= 0.0 && d < TWO_POW_64 {
                    Ok(d as u64)
                } else {
                    Err(self.out_of_range("u64"))
                }
            }
            _ => Err(self.mismatch("number")),
        }
    }

    /// Coerce to a signed 64-bit integer, rounding doubles as [Value::as_u64]
    pub fn as_i64(&self) -> CoercionResult<i64> {
        match self {
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::SignedInt(v) => Ok(*v),
            Value::UnsignedInt(v) => {
                if *v <= i64::MAX as u64 {
                    Ok(*v as i64)
                } else {
                    Err(self.out_of_range("i64"))
                }
            }
            Value::Double(v) => {
                let d = v.round();
                if d >= -TWO_POW_63 && d < TWO_POW_63 {
                    Ok(d as i64)
                } else {
                    Err(self.out_of_range("i64"))
                }
            }
            _ => Err(self.mismatch("number")),
        }
    }

    pub fn as_u32(&self) -> CoercionResult<u32> {
        let v = self.as_u64()?;
        u32::try_from(v).map_err(|_| self.out_of_range("u32"))
    }

    pub fn as_u16(&self) -> CoercionResult<u16> {
        let v = self.as_u64()?;
        u16::try_from(v).map_err(|_| self.out_of_range("u16"))
    }

    pub fn as_u8(&self) -> CoercionResult<u8> {
        let v = self.as_u64()?;
        u8::try_from(v).map_err(|_| self.out_of_range("u8"))
    }

    pub fn as_i32(&self) -> CoercionResult<i32> {
        let v = self.as_i64()?;
        i32::try_from(v).map_err(|_| self.out_of_range("i32"))
    }

    pub fn as_i16(&self) -> CoercionResult<i16> {
        let v = self.as_i64()?;
        i16::try_from(v).map_err(|_| self.out_of_range("i16"))
    }

    pub fn as_i8(&self) -> CoercionResult<i8> {
        let v = self.as_i64()?;
        i8::try_from(v).map_err(|_| self.out_of_range("i8"))
    }

    /// Coerce to a double; bools convert to 0.0/1.0
    pub fn as_f64(&self) -> CoercionResult<f64> {
        match self {
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::SignedInt(v) => Ok(*v as f64),
            Value::UnsignedInt(v) => Ok(*v as f64),
            Value::Double(v) => Ok(*v),
            _ => Err(self.mismatch("number")),
        }
    }

    /// Borrow the string payload
    pub fn as_str(&self) -> CoercionResult<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.mismatch("string")),
        }
    }

    /// Borrow the blob payload
    pub fn as_blob(&self) -> CoercionResult<&[u8]> {
        match self {
            Value::Blob(b) => Ok(b),
            _ => Err(self.mismatch("blob")),
        }
    }

    /// Borrow the array elements
    pub fn as_array(&self) -> CoercionResult<&[Value]> {
        match self {
            Value::Array(items) => Ok(items),
            _ => Err(self.mismatch("array")),
        }
    }

    /// Borrow the object entries, in insertion order
    pub fn as_object(&self) -> CoercionResult<&[(String, Value)]> {
        match self {
            Value::Object(entries) => Ok(entries),
            _ => Err(self.mismatch("object")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> CoercionError {
        CoercionError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }

    fn out_of_range(&self, target: &'static str) -> CoercionError {
        let value = match self {
            Value::SignedInt(v) => v.to_string(),
            Value::UnsignedInt(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            _ => self.type_name().to_string(),
        };
        CoercionError::OutOfRange { value, target }
    }
}

/// Array and object mutation.  These are the only operations which re-type a
/// receiver, and they only ever do so on a write.
impl Value {
    /// Append a value.  A non-array receiver is discarded and replaced by a
    /// fresh single-element array first.
    pub fn push(&mut self, value: impl Into<Value>) {
        if let Value::Array(items) = self {
            items.push(value.into());
            return;
        }
        *self = Value::Array(vec![value.into()]);
    }

    /// Get the element at `index`, if there is one
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Get a mutable reference to the element at `index`, extending the
    /// array with [Value::Undefined] placeholders up to and including
    /// `index`.  A non-array receiver is discarded and replaced by a fresh
    /// array first.
    pub fn at_mut(&mut self, index: usize) -> &mut Value {
        if !self.is_array() {
            *self = Value::array();
        }
        match self {
            Value::Array(items) => {
                while items.len() <= index {
                    items.push(Value::Undefined);
                }
                &mut items[index]
            }
            _ => unreachable!(),
        }
    }

    /// Insert a key/value pair with last-write-wins semantics: an existing
    /// entry with the same key is replaced in place, keeping its position.
    /// A non-object receiver is discarded and replaced by a fresh object.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if let Value::Object(entries) = self {
            if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
                entry.1 = value;
            } else {
                entries.push((key, value));
            }
            return;
        }
        *self = Value::Object(vec![(key, value)]);
    }

    /// Look up an object entry by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Look up an object entry by key, mutably
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Object(entries) => entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Remove an object entry by key, returning the removed value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        match self {
            Value::Object(entries) => {
                let index = entries.iter().position(|(k, _)| k == key)?;
                Some(entries.remove(index).1)
            }
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::SignedInt(i64::from(v))
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::SignedInt(i64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::SignedInt(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::SignedInt(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::UnsignedInt(u64::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::UnsignedInt(u64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UnsignedInt(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UnsignedInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Double(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Vec<(String, Value)>> for Value {
    fn from(v: Vec<(String, Value)>) -> Self {
        Value::Object(v)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::CoercionError;
    use crate::Value;

    #[test]
    fn should_report_variant_predicates() {
        assert!(Value::Null.is_null());
        assert!(Value::SignedInt(-1).is_integer());
        assert!(Value::UnsignedInt(1).is_number());
        assert!(Value::Double(0.5).is_number());
        assert!(!Value::Undefined.is_defined());
        assert!(Value::blob(vec![1, 2, 3]).is_blob());
    }

    #[test]
    fn should_coerce_booleans_and_numerics() {
        assert!(!Value::Null.as_bool().unwrap());
        assert!(Value::SignedInt(-3).as_bool().unwrap());
        assert!(!Value::Double(0.2).as_bool().unwrap());
        assert_eq!(Value::Bool(true).as_u64().unwrap(), 1);
        assert_eq!(Value::Bool(false).as_i64().unwrap(), 0);
        assert_eq!(Value::Bool(true).as_f64().unwrap(), 1.0);
    }

    #[test]
    fn should_round_doubles_ties_away_from_zero() {
        assert_eq!(Value::Double(2.5).as_u64().unwrap(), 3);
        assert_eq!(Value::Double(2.4).as_u64().unwrap(), 2);
        assert_eq!(Value::Double(-2.5).as_i64().unwrap(), -3);
        assert_eq!(Value::Double(-0.4).as_u64().unwrap(), 0);
    }

    #[test]
    fn should_range_check_narrowing_conversions() {
        assert_eq!(Value::UnsignedInt(65535).as_u16().unwrap(), u16::MAX);
        assert!(matches!(
            Value::UnsignedInt(65536).as_u16(),
            Err(CoercionError::OutOfRange { .. })
        ));
        assert!(matches!(
            Value::SignedInt(-1).as_u64(),
            Err(CoercionError::OutOfRange { .. })
        ));
        assert!(matches!(
            Value::SignedInt(128).as_i8(),
            Err(CoercionError::OutOfRange { .. })
        ));
        assert!(matches!(
            Value::Double(-1.0).as_u32(),
            Err(CoercionError::OutOfRange { .. })
        ));
        assert_eq!(Value::SignedInt(127).as_i8().unwrap(), 127);
    }

    #[test]
    fn should_carry_the_textual_form_in_range_errors() {
        match Value::UnsignedInt(300).as_u8() {
            Err(CoercionError::OutOfRange { value, target }) => {
                assert_eq!(value, "300");
                assert_eq!(target, "u8");
            }
            other => panic!("expected a range error, got {:?}", other),
        }
    }

    #[test]
    fn should_reject_wrong_structural_accessors() {
        assert!(matches!(
            Value::from("text").as_object(),
            Err(CoercionError::TypeMismatch { .. })
        ));
        assert!(matches!(
            Value::array().as_i64(),
            Err(CoercionError::TypeMismatch { .. })
        ));
        assert!(matches!(
            Value::Null.as_u64(),
            Err(CoercionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn should_insert_with_last_write_wins() {
        let mut obj = Value::object();
        obj.insert("a", 1u64);
        obj.insert("b", 2u64);
        obj.insert("a", 3u64);
        let entries = obj.as_object().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[0].1, Value::UnsignedInt(3));
        assert_eq!(obj.get("a"), Some(&Value::UnsignedInt(3)));
    }

    #[test]
    fn should_pad_arrays_with_undefined() {
        let mut arr = Value::array();
        *arr.at_mut(3) = Value::Bool(true);
        assert_eq!(arr.size(), 4);
        assert_eq!(arr.get_index(0), Some(&Value::Undefined));
        assert_eq!(arr.get_index(3), Some(&Value::Bool(true)));
    }

    #[test]
    fn should_retype_on_write_operations() {
        let mut v = Value::Null;
        v.push(1u64);
        assert!(v.is_array());
        let mut v = Value::from("text");
        v.insert("key", Value::Null);
        assert!(v.is_object());
    }

    #[test]
    fn should_compute_sizes_per_variant() {
        assert_eq!(Value::Undefined.size(), 0);
        assert_eq!(Value::Null.size(), 1);
        assert_eq!(Value::from("abc").size(), 3);
        assert_eq!(Value::blob(vec![0u8; 5]).size(), 5);
        let mut obj = Value::object();
        obj.insert("a", 1u64);
        obj.insert("b", Value::Undefined);
        assert_eq!(obj.size(), 1);
    }

    #[test]
    fn should_remove_object_entries() {
        let mut obj = Value::object();
        obj.insert("a", 1u64);
        obj.insert("b", 2u64);
        assert_eq!(obj.remove("a"), Some(Value::UnsignedInt(1)));
        assert_eq!(obj.remove("a"), None);
        assert_eq!(obj.size(), 1);
    }
}
