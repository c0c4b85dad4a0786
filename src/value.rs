//! Conversion of raw tokens into typed values.
use std::fmt;

use crate::error::ParseError;
use crate::types::{FloatRepr, IntRepr, TypeDescriptor, ValueRepr};

/// A typed value held in a [`Record`][crate::Record] slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// No value: an optional field without a declared default.
    #[default]
    Null,
    Int(i128),
    Float(f64),
    Bool(bool),
    String(String),
    /// The matched symbol name of an enum field.
    Enum(String),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check that this value can live in a field of the given type.
    pub(crate) fn check_fits(&self, desc: &TypeDescriptor) -> Result<(), String> {
        match (self, desc.repr()) {
            (Self::Null, _) => Ok(()),
            (Self::Int(v), ValueRepr::Int(int)) => {
                if int.contains(*v) {
                    Ok(())
                } else {
                    Err(format!("{v} is out of range {}..={}", int.min(), int.max()))
                }
            }
            (Self::Float(_), ValueRepr::Float(_))
            | (Self::Bool(_), ValueRepr::Bool)
            | (Self::String(_), ValueRepr::String) => Ok(()),
            (Self::Enum(s), ValueRepr::Enum(symbols)) => {
                if symbols.iter().any(|sym| sym == s) {
                    Ok(())
                } else {
                    Err(format!("`{s}` is not one of: {}", symbols.join(", ")))
                }
            }
            (v, _) => Err(format!("{v:?} is not a {} value", desc.kind())),
        }
    }

    /// Format as written for a field of type `desc`: an `f32` field shows its
    /// own shortest notation rather than the widened `f64`.
    #[allow(clippy::cast_possible_truncation, reason = "the value came from an f32")]
    pub(crate) fn display_as(&self, desc: &TypeDescriptor) -> String {
        match (self, desc.float_repr()) {
            (Self::Float(v), Some(FloatRepr::F32)) => (*v as f32).to_string(),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(s) | Self::Enum(s) => f.write_str(s),
        }
    }
}

/// Coerce a raw token into a value for a field of the given type.
///
/// Bool fields are normally handled by the parser's lookahead rule; coercing
/// one here applies the same literal rule as [`parse_bool_literal`].
pub fn coerce(desc: &TypeDescriptor, raw: &str) -> Result<Value, ParseError> {
    match desc.repr() {
        ValueRepr::Int(int) => parse_int(raw, *int)
            .map(Value::Int)
            .ok_or_else(|| ParseError::InvalidIntegerLiteral(raw.into())),
        ValueRepr::Float(FloatRepr::F32) => raw
            .parse::<f32>()
            .map(Value::from)
            .map_err(|_| ParseError::InvalidFloatLiteral(raw.into())),
        ValueRepr::Float(FloatRepr::F64) => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ParseError::InvalidFloatLiteral(raw.into())),
        ValueRepr::Bool => Ok(Value::Bool(parse_bool_literal(raw))),
        ValueRepr::String => Ok(Value::String(raw.into())),
        ValueRepr::Enum(symbols) => {
            if symbols.iter().any(|sym| sym == raw) {
                Ok(Value::Enum(raw.into()))
            } else {
                Err(ParseError::InvalidEnumValue { input: raw.into(), valid: symbols.to_vec() })
            }
        }
    }
}

/// Explicit boolean literal following a flag: only `true` and `1` are truthy.
#[must_use]
pub fn parse_bool_literal(raw: &str) -> bool {
    raw == "true" || raw == "1"
}

/// Parse an integer literal with optional sign, `0x`/`0o`/`0b` radix prefix
/// and `_` digit separators, then range-check it against `int`.
fn parse_int(raw: &str, int: IntRepr) -> Option<i128> {
    let (negative, rest) = match raw.as_bytes().first()? {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };
    let (radix, body) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        Some("0o" | "0O") => (8, &rest[2..]),
        Some("0b" | "0B") => (2, &rest[2..]),
        _ => (10, rest),
    };
    if body.is_empty() || body.starts_with('_') || body.ends_with('_') {
        return None;
    }
    let digits = body.chars().filter(|&c| c != '_').collect::<String>();
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i128::from_str_radix(&digits, radix).ok()?;
    let v = if negative { -magnitude } else { magnitude };
    int.contains(v).then_some(v)
}

/// Closed symbol sets parsable from option values.
///
/// Implement this via `derive(ValueEnum)`.
pub trait ValueEnum: Sized + 'static {
    /// Valid symbol names in declaration order.
    const SYMBOLS: &'static [&'static str];

    fn parse_value(s: &str) -> Option<Self>;

    fn as_symbol(&self) -> &'static str;
}

/// Extraction of a typed field out of a record [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_int_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Int(v as i128)
                }
            }
        )*
    };
}

impl_int_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation, reason = "f32 fields accept rounding")]
    fn from_value(value: Value) -> Option<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            v => T::from_value(v).map(Some),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
