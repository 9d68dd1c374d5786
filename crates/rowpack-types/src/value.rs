//! Runtime value types for table cells.
//!
//! `ValueType` is the declared type tag of a column, `Value` is an owned cell
//! value, and `ValueView` is the borrowed, type-erased handle produced by the
//! cell read path. Conversion between types happens on demand through the
//! `to_*` accessors and `convert_to`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Primitive type tags a column can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// Boolean value, stored as one byte.
    Bool,
    /// 8-bit signed integer.
    Int8,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit signed integer.
    Int16,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit signed integer.
    Int32,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// UUID (128-bit identifier).
    Uuid,
    /// Timestamp (microseconds since Unix epoch).
    Timestamp,
    /// UTF-8 string stored inline with a fixed maximum byte size.
    String,
    /// Binary data stored inline with a fixed maximum byte size.
    Binary,
    /// Unbounded UTF-8 string stored in the reference store.
    Text,
    /// Unbounded binary data stored in the reference store.
    Blob,
}

impl ValueType {
    /// Intrinsic byte width for fixed-width tags, `None` for sized and
    /// reference types.
    pub fn fixed_size(&self) -> Option<u32> {
        match self {
            ValueType::Bool | ValueType::Int8 | ValueType::UInt8 => Some(1),
            ValueType::Int16 | ValueType::UInt16 => Some(2),
            ValueType::Int32 | ValueType::UInt32 | ValueType::Float32 => Some(4),
            ValueType::Int64
            | ValueType::UInt64
            | ValueType::Float64
            | ValueType::Timestamp => Some(8),
            ValueType::Uuid => Some(16),
            ValueType::String | ValueType::Binary | ValueType::Text | ValueType::Blob => None,
        }
    }

    /// Check if payloads of this type live in the reference store.
    pub fn is_reference(&self) -> bool {
        matches!(self, ValueType::Text | ValueType::Blob)
    }

    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueType::Int8
                | ValueType::UInt8
                | ValueType::Int16
                | ValueType::UInt16
                | ValueType::Int32
                | ValueType::UInt32
                | ValueType::Int64
                | ValueType::UInt64
                | ValueType::Float32
                | ValueType::Float64
        )
    }

    /// Check if this type is a string-like type.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            ValueType::String | ValueType::Text | ValueType::Binary | ValueType::Blob
        )
    }

    /// Canonical lowercase name, the same spelling `parse` accepts.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int8 => "int8",
            ValueType::UInt8 => "uint8",
            ValueType::Int16 => "int16",
            ValueType::UInt16 => "uint16",
            ValueType::Int32 => "int32",
            ValueType::UInt32 => "uint32",
            ValueType::Int64 => "int64",
            ValueType::UInt64 => "uint64",
            ValueType::Float32 => "float32",
            ValueType::Float64 => "float64",
            ValueType::Uuid => "uuid",
            ValueType::Timestamp => "timestamp",
            ValueType::String => "string",
            ValueType::Binary => "binary",
            ValueType::Text => "text",
            ValueType::Blob => "blob",
        }
    }

    /// Parse a type tag from its canonical name. `double` is accepted as an
    /// alias for `float64`.
    pub fn parse(name: &str) -> Option<ValueType> {
        match name {
            "bool" => Some(ValueType::Bool),
            "int8" => Some(ValueType::Int8),
            "uint8" => Some(ValueType::UInt8),
            "int16" => Some(ValueType::Int16),
            "uint16" => Some(ValueType::UInt16),
            "int32" => Some(ValueType::Int32),
            "uint32" => Some(ValueType::UInt32),
            "int64" => Some(ValueType::Int64),
            "uint64" => Some(ValueType::UInt64),
            "float32" => Some(ValueType::Float32),
            "float64" | "double" => Some(ValueType::Float64),
            "uuid" => Some(ValueType::Uuid),
            "timestamp" => Some(ValueType::Timestamp),
            "string" => Some(ValueType::String),
            "binary" => Some(ValueType::Binary),
            "text" => Some(ValueType::Text),
            "blob" => Some(ValueType::Blob),
            _ => None,
        }
    }
}

/// An owned runtime cell value.
///
/// Reference columns (`Text`/`Blob`) carry their payload as `String`/`Binary`
/// values; the engine decides where the bytes live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 8-bit signed integer.
    Int8(i8),
    /// 8-bit unsigned integer.
    UInt8(u8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 16-bit unsigned integer.
    UInt16(u16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 32-bit unsigned integer.
    UInt32(u32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit unsigned integer.
    UInt64(u64),
    /// 32-bit floating point.
    Float32(f32),
    /// 64-bit floating point.
    Float64(f64),
    /// UUID as 16 bytes.
    Uuid([u8; 16]),
    /// Timestamp as microseconds since Unix epoch.
    Timestamp(i64),
    /// UTF-8 string.
    String(String),
    /// Binary data.
    Binary(Vec<u8>),
}

impl Value {
    /// The type tag of this value, `None` for `Null`.
    pub fn type_of(&self) -> Option<ValueType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ValueType::Bool),
            Value::Int8(_) => Some(ValueType::Int8),
            Value::UInt8(_) => Some(ValueType::UInt8),
            Value::Int16(_) => Some(ValueType::Int16),
            Value::UInt16(_) => Some(ValueType::UInt16),
            Value::Int32(_) => Some(ValueType::Int32),
            Value::UInt32(_) => Some(ValueType::UInt32),
            Value::Int64(_) => Some(ValueType::Int64),
            Value::UInt64(_) => Some(ValueType::UInt64),
            Value::Float32(_) => Some(ValueType::Float32),
            Value::Float64(_) => Some(ValueType::Float64),
            Value::Uuid(_) => Some(ValueType::Uuid),
            Value::Timestamp(_) => Some(ValueType::Timestamp),
            Value::String(_) => Some(ValueType::String),
            Value::Binary(_) => Some(ValueType::Binary),
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow this value as a view.
    pub fn as_view(&self) -> ValueView<'_> {
        match self {
            Value::Null => ValueView::Null,
            Value::Bool(v) => ValueView::Bool(*v),
            Value::Int8(v) => ValueView::Int8(*v),
            Value::UInt8(v) => ValueView::UInt8(*v),
            Value::Int16(v) => ValueView::Int16(*v),
            Value::UInt16(v) => ValueView::UInt16(*v),
            Value::Int32(v) => ValueView::Int32(*v),
            Value::UInt32(v) => ValueView::UInt32(*v),
            Value::Int64(v) => ValueView::Int64(*v),
            Value::UInt64(v) => ValueView::UInt64(*v),
            Value::Float32(v) => ValueView::Float32(*v),
            Value::Float64(v) => ValueView::Float64(*v),
            Value::Uuid(v) => ValueView::Uuid(*v),
            Value::Timestamp(v) => ValueView::Timestamp(*v),
            Value::String(v) => ValueView::Str(v),
            Value::Binary(v) => ValueView::Bytes(v),
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32. Narrower signed integers widen.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int8(v) => Some(*v as i32),
            Value::Int16(v) => Some(*v as i32),
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64. Any signed integer widens.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(v) => Some(*v as i64),
            Value::Int16(v) => Some(*v as i64),
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            Value::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64. Any unsigned integer widens.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt8(v) => Some(*v as u64),
            Value::UInt16(v) => Some(*v as u64),
            Value::UInt32(v) => Some(*v as u64),
            Value::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64. `Float32` widens.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as bytes reference.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as UUID.
    pub fn as_uuid(&self) -> Option<&[u8; 16]> {
        match self {
            Value::Uuid(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to i64, accepting any numeric or boolean value and parsing
    /// strings. Floats truncate.
    pub fn to_i64(&self) -> Option<i64> {
        self.as_view().to_i64()
    }

    /// Convert to u64, accepting any non-negative numeric value and parsing
    /// strings.
    pub fn to_u64(&self) -> Option<u64> {
        self.as_view().to_u64()
    }

    /// Convert to f64, accepting any numeric or boolean value and parsing
    /// strings.
    pub fn to_f64(&self) -> Option<f64> {
        self.as_view().to_f64()
    }

    /// Render as text. Every non-binary value has a text form.
    pub fn to_text(&self) -> Option<String> {
        self.as_view().to_text()
    }

    /// Convert this value to the given type tag, or `None` when no sensible
    /// conversion exists. Converting `Null` yields `Null`.
    pub fn convert_to(&self, value_type: ValueType) -> Option<Value> {
        if self.is_null() {
            return Some(Value::Null);
        }
        match value_type {
            ValueType::Bool => match self {
                Value::Bool(v) => Some(Value::Bool(*v)),
                _ => self.to_i64().map(|v| Value::Bool(v != 0)),
            },
            ValueType::Int8 => self.to_i64().map(|v| Value::Int8(v as i8)),
            ValueType::UInt8 => self.to_u64().map(|v| Value::UInt8(v as u8)),
            ValueType::Int16 => self.to_i64().map(|v| Value::Int16(v as i16)),
            ValueType::UInt16 => self.to_u64().map(|v| Value::UInt16(v as u16)),
            ValueType::Int32 => self.to_i64().map(|v| Value::Int32(v as i32)),
            ValueType::UInt32 => self.to_u64().map(|v| Value::UInt32(v as u32)),
            ValueType::Int64 => self.to_i64().map(Value::Int64),
            ValueType::UInt64 => self.to_u64().map(Value::UInt64),
            ValueType::Float32 => self.to_f64().map(|v| Value::Float32(v as f32)),
            ValueType::Float64 => self.to_f64().map(Value::Float64),
            ValueType::Timestamp => self.to_i64().map(Value::Timestamp),
            ValueType::Uuid => match self {
                Value::Uuid(v) => Some(Value::Uuid(*v)),
                _ => None,
            },
            ValueType::String | ValueType::Text => self.to_text().map(Value::String),
            ValueType::Binary | ValueType::Blob => match self {
                Value::Binary(v) => Some(Value::Binary(v.clone())),
                Value::String(v) => Some(Value::Binary(v.clone().into_bytes())),
                _ => None,
            },
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
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

/// A borrowed, type-erased handle to a cell value.
///
/// Produced by the cell read path; string and binary payloads borrow from the
/// table's buffers, everything else is an inline copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueView<'a> {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 8-bit signed integer.
    Int8(i8),
    /// 8-bit unsigned integer.
    UInt8(u8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 16-bit unsigned integer.
    UInt16(u16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 32-bit unsigned integer.
    UInt32(u32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit unsigned integer.
    UInt64(u64),
    /// 32-bit floating point.
    Float32(f32),
    /// 64-bit floating point.
    Float64(f64),
    /// UUID as 16 bytes.
    Uuid([u8; 16]),
    /// Timestamp as microseconds since Unix epoch.
    Timestamp(i64),
    /// Borrowed UTF-8 string.
    Str(&'a str),
    /// Borrowed binary data.
    Bytes(&'a [u8]),
}

impl<'a> ValueView<'a> {
    /// The type tag of this view, `None` for `Null`.
    pub fn type_of(&self) -> Option<ValueType> {
        match self {
            ValueView::Null => None,
            ValueView::Bool(_) => Some(ValueType::Bool),
            ValueView::Int8(_) => Some(ValueType::Int8),
            ValueView::UInt8(_) => Some(ValueType::UInt8),
            ValueView::Int16(_) => Some(ValueType::Int16),
            ValueView::UInt16(_) => Some(ValueType::UInt16),
            ValueView::Int32(_) => Some(ValueType::Int32),
            ValueView::UInt32(_) => Some(ValueType::UInt32),
            ValueView::Int64(_) => Some(ValueType::Int64),
            ValueView::UInt64(_) => Some(ValueType::UInt64),
            ValueView::Float32(_) => Some(ValueType::Float32),
            ValueView::Float64(_) => Some(ValueType::Float64),
            ValueView::Uuid(_) => Some(ValueType::Uuid),
            ValueView::Timestamp(_) => Some(ValueType::Timestamp),
            ValueView::Str(_) => Some(ValueType::String),
            ValueView::Bytes(_) => Some(ValueType::Binary),
        }
    }

    /// Check if this view is null.
    pub fn is_null(&self) -> bool {
        matches!(self, ValueView::Null)
    }

    /// Copy into an owned value.
    pub fn to_value(&self) -> Value {
        match self {
            ValueView::Null => Value::Null,
            ValueView::Bool(v) => Value::Bool(*v),
            ValueView::Int8(v) => Value::Int8(*v),
            ValueView::UInt8(v) => Value::UInt8(*v),
            ValueView::Int16(v) => Value::Int16(*v),
            ValueView::UInt16(v) => Value::UInt16(*v),
            ValueView::Int32(v) => Value::Int32(*v),
            ValueView::UInt32(v) => Value::UInt32(*v),
            ValueView::Int64(v) => Value::Int64(*v),
            ValueView::UInt64(v) => Value::UInt64(*v),
            ValueView::Float32(v) => Value::Float32(*v),
            ValueView::Float64(v) => Value::Float64(*v),
            ValueView::Uuid(v) => Value::Uuid(*v),
            ValueView::Timestamp(v) => Value::Timestamp(*v),
            ValueView::Str(v) => Value::String((*v).to_string()),
            ValueView::Bytes(v) => Value::Binary((*v).to_vec()),
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ValueView::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64. Any signed integer widens.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ValueView::Int8(v) => Some(*v as i64),
            ValueView::Int16(v) => Some(*v as i64),
            ValueView::Int32(v) => Some(*v as i64),
            ValueView::Int64(v) => Some(*v),
            ValueView::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64. Any unsigned integer widens.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ValueView::UInt8(v) => Some(*v as u64),
            ValueView::UInt16(v) => Some(*v as u64),
            ValueView::UInt32(v) => Some(*v as u64),
            ValueView::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64. `Float32` widens.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ValueView::Float32(v) => Some(*v as f64),
            ValueView::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            ValueView::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as bytes reference.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            ValueView::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to i64, accepting any numeric or boolean value and parsing
    /// strings. Floats truncate.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            ValueView::Bool(v) => Some(*v as i64),
            ValueView::Int8(v) => Some(*v as i64),
            ValueView::UInt8(v) => Some(*v as i64),
            ValueView::Int16(v) => Some(*v as i64),
            ValueView::UInt16(v) => Some(*v as i64),
            ValueView::Int32(v) => Some(*v as i64),
            ValueView::UInt32(v) => Some(*v as i64),
            ValueView::Int64(v) => Some(*v),
            ValueView::UInt64(v) => i64::try_from(*v).ok(),
            ValueView::Float32(v) => Some(*v as i64),
            ValueView::Float64(v) => Some(*v as i64),
            ValueView::Timestamp(v) => Some(*v),
            ValueView::Str(v) => v.trim().parse().ok(),
            _ => None,
        }
    }

    /// Convert to u64, accepting any non-negative numeric value and parsing
    /// strings.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            ValueView::Bool(v) => Some(*v as u64),
            ValueView::UInt8(v) => Some(*v as u64),
            ValueView::UInt16(v) => Some(*v as u64),
            ValueView::UInt32(v) => Some(*v as u64),
            ValueView::UInt64(v) => Some(*v),
            ValueView::Str(v) => v.trim().parse().ok(),
            _ => self.to_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }

    /// Convert to f64, accepting any numeric or boolean value and parsing
    /// strings.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            ValueView::Float32(v) => Some(*v as f64),
            ValueView::Float64(v) => Some(*v),
            ValueView::Str(v) => v.trim().parse().ok(),
            _ => self.to_i64().map(|v| v as f64),
        }
    }

    /// Render as text. Every non-binary value has a text form; binary data
    /// yields `None`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            ValueView::Null => Some(String::new()),
            ValueView::Bool(v) => Some(if *v { "true".into() } else { "false".into() }),
            ValueView::Int8(v) => Some(v.to_string()),
            ValueView::UInt8(v) => Some(v.to_string()),
            ValueView::Int16(v) => Some(v.to_string()),
            ValueView::UInt16(v) => Some(v.to_string()),
            ValueView::Int32(v) => Some(v.to_string()),
            ValueView::UInt32(v) => Some(v.to_string()),
            ValueView::Int64(v) => Some(v.to_string()),
            ValueView::UInt64(v) => Some(v.to_string()),
            ValueView::Float32(v) => Some(v.to_string()),
            ValueView::Float64(v) => Some(v.to_string()),
            ValueView::Uuid(v) => {
                let mut out = String::with_capacity(32);
                for byte in v {
                    out.push_str(&format!("{:02x}", byte));
                }
                Some(out)
            }
            ValueView::Timestamp(v) => Some(v.to_string()),
            ValueView::Str(v) => Some((*v).to_string()),
            ValueView::Bytes(_) => None,
        }
    }
}

impl<'a> PartialEq<Value> for ValueView<'a> {
    fn eq(&self, other: &Value) -> bool {
        *self == other.as_view()
    }
}

/// Compare two views for ordering.
///
/// Null orders before everything, same-type values compare directly, and
/// mixed numeric types fall back to f64 comparison. Incomparable pairs
/// (e.g. string vs integer) yield `None`.
pub fn compare_views(a: &ValueView<'_>, b: &ValueView<'_>) -> Option<Ordering> {
    match (a, b) {
        (ValueView::Null, ValueView::Null) => Some(Ordering::Equal),
        (ValueView::Null, _) => Some(Ordering::Less),
        (_, ValueView::Null) => Some(Ordering::Greater),
        (ValueView::Bool(x), ValueView::Bool(y)) => Some(x.cmp(y)),
        (ValueView::Int64(x), ValueView::Int64(y)) => Some(x.cmp(y)),
        (ValueView::UInt64(x), ValueView::UInt64(y)) => Some(x.cmp(y)),
        (ValueView::Float64(x), ValueView::Float64(y)) => x.partial_cmp(y),
        (ValueView::Timestamp(x), ValueView::Timestamp(y)) => Some(x.cmp(y)),
        (ValueView::Uuid(x), ValueView::Uuid(y)) => Some(x.cmp(y)),
        (ValueView::Str(x), ValueView::Str(y)) => Some(x.cmp(y)),
        (ValueView::Bytes(x), ValueView::Bytes(y)) => Some(x.cmp(y)),
        (x, y) => {
            // Mixed numeric widths compare through f64.
            match (x.to_f64(), y.to_f64()) {
                (Some(fx), Some(fy)) => fx.partial_cmp(&fy),
                _ => None,
            }
        }
    }
}

/// Compare two owned values for ordering. See [`compare_views`].
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    compare_views(&a.as_view(), &b.as_view())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(ValueType::Bool.fixed_size(), Some(1));
        assert_eq!(ValueType::Int32.fixed_size(), Some(4));
        assert_eq!(ValueType::UInt64.fixed_size(), Some(8));
        assert_eq!(ValueType::Uuid.fixed_size(), Some(16));
        assert_eq!(ValueType::String.fixed_size(), None);
        assert_eq!(ValueType::Text.fixed_size(), None);
        assert!(ValueType::Text.is_reference());
        assert!(!ValueType::String.is_reference());
    }

    #[test]
    fn test_type_name_roundtrip() {
        for vt in [
            ValueType::Bool,
            ValueType::Int8,
            ValueType::UInt16,
            ValueType::Int64,
            ValueType::Float64,
            ValueType::String,
            ValueType::Blob,
        ] {
            assert_eq!(ValueType::parse(vt.name()), Some(vt));
        }
        assert_eq!(ValueType::parse("double"), Some(ValueType::Float64));
        assert_eq!(ValueType::parse("varchar"), None);
    }

    #[test]
    fn test_accessor_widening() {
        assert_eq!(Value::Int16(7).as_i64(), Some(7));
        assert_eq!(Value::Int16(7).as_u64(), None);
        assert_eq!(Value::UInt8(7).as_u64(), Some(7));
        assert_eq!(Value::Float32(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::String("x".into()).as_i64(), None);
    }

    #[test]
    fn test_convert_on_demand() {
        assert_eq!(Value::String("42".into()).to_i64(), Some(42));
        assert_eq!(Value::Bool(true).to_i64(), Some(1));
        assert_eq!(Value::Float64(2.9).to_i64(), Some(2));
        assert_eq!(Value::Int32(-1).to_u64(), None);
        assert_eq!(Value::Int32(5).to_text().as_deref(), Some("5"));
    }

    #[test]
    fn test_convert_to() {
        assert_eq!(
            Value::Int32(300).convert_to(ValueType::Int64),
            Some(Value::Int64(300))
        );
        assert_eq!(
            Value::String("2.5".into()).convert_to(ValueType::Float64),
            Some(Value::Float64(2.5))
        );
        assert_eq!(
            Value::Int32(1).convert_to(ValueType::String),
            Some(Value::String("1".into()))
        );
        assert_eq!(Value::Null.convert_to(ValueType::Int32), Some(Value::Null));
        assert_eq!(Value::String("x".into()).convert_to(ValueType::Uuid), None);
    }

    #[test]
    fn test_compare_values() {
        use std::cmp::Ordering;

        assert_eq!(
            compare_values(&Value::Int32(1), &Value::Int64(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_values(&Value::Null, &Value::Int32(0)),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_values(&Value::String("b".into()), &Value::String("a".into())),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_values(&Value::String("b".into()), &Value::Uuid([0; 16])),
            None
        );
    }

    #[test]
    fn test_view_equals_value() {
        let value = Value::String("abc".into());
        let view = ValueView::Str("abc");
        assert!(view == value);
        assert_eq!(view.to_value(), value);
    }
}
