//! Classification of declared field types into `(BaseKind, Requiredness)`.
use std::fmt;

use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseKind {
    Int,
    Float,
    Bool,
    String,
    Enum,
}

impl BaseKind {
    /// Name shown in the `[type: ...]` tag of help output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "integer",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requiredness {
    Required,
    Optional,
}

/// Width and signedness of an integer field, used for range checking.
///
/// Widths outside `1..=64` can be constructed but are rejected when the
/// schema is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntRepr {
    signed: bool,
    bits: u8,
}

impl IntRepr {
    pub const MAX_BITS: u8 = 64;

    #[must_use]
    pub const fn signed(bits: u8) -> Self {
        Self { signed: true, bits }
    }

    #[must_use]
    pub const fn unsigned(bits: u8) -> Self {
        Self { signed: false, bits }
    }

    #[must_use]
    pub const fn is_signed(self) -> bool {
        self.signed
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.bits >= 1 && self.bits <= Self::MAX_BITS
    }

    /// Clamped into `1..=64` so range math never overflows.
    const fn width(self) -> u8 {
        if self.bits == 0 {
            1
        } else if self.bits > Self::MAX_BITS {
            Self::MAX_BITS
        } else {
            self.bits
        }
    }

    #[must_use]
    pub const fn min(self) -> i128 {
        if self.signed { -(1i128 << (self.width() - 1)) } else { 0 }
    }

    #[must_use]
    pub const fn max(self) -> i128 {
        let bits = self.width();
        if self.signed { (1i128 << (bits - 1)) - 1 } else { (1i128 << bits) - 1 }
    }

    #[must_use]
    pub const fn contains(self, v: i128) -> bool {
        self.min() <= v && v <= self.max()
    }
}

impl fmt::Display for IntRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.signed { 'i' } else { 'u' }, self.bits)
    }
}

/// Width of a float field. Values are held as `f64` either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatRepr {
    F32,
    F64,
}

/// The declared shape of a field type, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    Int(IntRepr),
    Float(FloatRepr),
    Bool,
    String,
    /// A closed set of symbol names.
    Enum(Vec<String>),
    /// A nullable wrapper around another shape.
    Optional(Box<TypeShape>),
    /// Anything else, carrying the type name for diagnostics.
    Unsupported(String),
}

impl TypeShape {
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn enumeration<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(symbols.into_iter().map(Into::into).collect())
    }
}

/// Classified form of a [`TypeShape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    repr: ValueRepr,
    requiredness: Requiredness,
}

/// The base kind together with what coercion needs to know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValueRepr {
    Int(IntRepr),
    Float(FloatRepr),
    Bool,
    String,
    Enum(Box<[String]>),
}

impl TypeDescriptor {
    /// Classify a shape. Nested optional wrappers collapse into one `Optional`.
    pub fn classify(shape: &TypeShape) -> Result<Self, String> {
        let (repr, requiredness) = match shape {
            TypeShape::Optional(inner) => {
                let inner = Self::classify(inner)?;
                return Ok(Self { repr: inner.repr, requiredness: Requiredness::Optional });
            }
            TypeShape::Int(int) if !int.is_valid() => return Err(int.to_string()),
            TypeShape::Int(int) => (ValueRepr::Int(*int), Requiredness::Required),
            TypeShape::Float(float) => (ValueRepr::Float(*float), Requiredness::Required),
            TypeShape::Bool => (ValueRepr::Bool, Requiredness::Required),
            TypeShape::String => (ValueRepr::String, Requiredness::Required),
            TypeShape::Enum(symbols) => {
                (ValueRepr::Enum(symbols.clone().into_boxed_slice()), Requiredness::Required)
            }
            TypeShape::Unsupported(ty) => return Err(ty.clone()),
        };
        Ok(Self { repr, requiredness })
    }

    pub(crate) fn classify_field(field: &str, shape: &TypeShape) -> Result<Self, SchemaError> {
        Self::classify(shape)
            .map_err(|ty| SchemaError::UnsupportedFieldType { field: field.into(), ty })
    }

    #[must_use]
    pub fn kind(&self) -> BaseKind {
        match self.repr {
            ValueRepr::Int(_) => BaseKind::Int,
            ValueRepr::Float(_) => BaseKind::Float,
            ValueRepr::Bool => BaseKind::Bool,
            ValueRepr::String => BaseKind::String,
            ValueRepr::Enum(_) => BaseKind::Enum,
        }
    }

    #[must_use]
    pub fn requiredness(&self) -> Requiredness {
        self.requiredness
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.requiredness == Requiredness::Required
    }

    /// Integer width and signedness, if this is an integer field.
    #[must_use]
    pub fn int_repr(&self) -> Option<IntRepr> {
        match self.repr {
            ValueRepr::Int(int) => Some(int),
            _ => None,
        }
    }

    #[must_use]
    pub fn float_repr(&self) -> Option<FloatRepr> {
        match self.repr {
            ValueRepr::Float(float) => Some(float),
            _ => None,
        }
    }

    /// Valid symbol names, if this is an enum field.
    #[must_use]
    pub fn symbols(&self) -> Option<&[String]> {
        match &self.repr {
            ValueRepr::Enum(symbols) => Some(symbols),
            _ => None,
        }
    }

    pub(crate) fn repr(&self) -> &ValueRepr {
        &self.repr
    }
}

/// Rust types usable as option fields.
///
/// Implemented for integer primitives up to 64 bits, `f32`, `f64`, `bool`,
/// `String`, `Option<T>` of those, and enums deriving `ValueEnum`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as an option field",
    label = "unsupported option type",
    note = "supported types are integers, floats, `bool`, `String`, \
    enums with `derive(declopt::ValueEnum)`, and `Option` of any of these"
)]
pub trait FieldType {
    fn shape() -> TypeShape;
}

macro_rules! impl_field_type_int {
    ($($ty:ty => $ctor:ident;)*) => {
        $(
            impl FieldType for $ty {
                fn shape() -> TypeShape {
                    TypeShape::Int(IntRepr::$ctor(<$ty>::BITS as u8))
                }
            }
        )*
    };
}

impl_field_type_int! {
    i8 => signed;
    i16 => signed;
    i32 => signed;
    i64 => signed;
    isize => signed;
    u8 => unsigned;
    u16 => unsigned;
    u32 => unsigned;
    u64 => unsigned;
    usize => unsigned;
}

impl FieldType for f32 {
    fn shape() -> TypeShape {
        TypeShape::Float(FloatRepr::F32)
    }
}

impl FieldType for f64 {
    fn shape() -> TypeShape {
        TypeShape::Float(FloatRepr::F64)
    }
}

impl FieldType for bool {
    fn shape() -> TypeShape {
        TypeShape::Bool
    }
}

impl FieldType for String {
    fn shape() -> TypeShape {
        TypeShape::String
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::optional(T::shape())
    }
}
