//! *Declarative command line option parser with a typed schema.*
//!
//! Options are described once, either through [`Schema::builder`] at runtime or
//! with [`derive(Options)`](macro@Options) on a struct. The resulting [`Schema`]
//! drives a small state machine over the argument list:
//!
//! - `--name` or `-c` selects an option; its value is the *next* argument.
//!   `--name=value` and bundled short flags like `-abc` are not recognized.
//! - A `bool` option takes no value, but may be followed by an explicit literal.
//!   The next argument is consumed as that literal unless it starts with `-`, and
//!   only `true` and `1` count as true. Note that a positional argument that
//!   happens to follow a flag is consumed this way too: in `prog -v 1 file`,
//!   `1` is the value of `-v`.
//! - The first argument not starting with `-` ends option parsing. It and every
//!   argument after it are positional, even if they look like options.
//! - Fields of `Option<T>` type are optional. Every other field is required and
//!   the parse fails if it is never given and has no default.
//!
//! ```
//! use declopt::{FieldDecl, Schema, Value};
//!
//! let schema = Schema::builder()
//!     .field(FieldDecl::of::<Option<bool>>("verbose").with_default(false))
//!     .option::<String>("output")
//!     .short("verbose", 'v')
//!     .short("output", 'o')
//!     .build()?;
//!
//! let parsed = declopt::parse(&schema, ["prog", "-v", "--output", "a.out", "f1", "f2"])?;
//! assert_eq!(parsed.record.get("verbose"), Some(&Value::Bool(true)));
//! assert_eq!(parsed.record.get("output"), Some(&Value::String("a.out".into())));
//! assert_eq!(parsed.positional_args, ["f1", "f2"]);
//! # Ok::<_, declopt::Error>(())
//! ```
//!
//! Nothing is printed by this crate. Errors are returned to the caller, and help
//! text is rendered into a `String` on request.
#![forbid(unsafe_code)]
use std::ffi::OsString;

mod error;
mod parser;
mod schema;
mod types;
mod value;

#[cfg(feature = "help")]
mod help;

pub use crate::error::{Error, ParseError, SchemaError};
#[cfg(feature = "help")]
pub use crate::help::render;
pub use crate::parser::{ParseResult, Record, parse};
pub use crate::schema::{DefaultDecl, FieldDecl, OptionField, Schema, SchemaBuilder};
pub use crate::types::{
    BaseKind, FieldType, FloatRepr, IntRepr, Requiredness, TypeDescriptor, TypeShape,
};
pub use crate::value::{FromValue, Value, ValueEnum, coerce, parse_bool_literal};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Not public API. Only for proc-macro internal use.
#[doc(hidden)]
pub mod __private {
    pub use std::convert::From;
    pub use std::string::String;
    pub use std::vec::Vec;
    pub use {Err, None, Ok, Option, Some, bool, str};
    pub use std::unreachable;

    pub use crate::error::{ParseError, SchemaError};
    pub use crate::parser::Record;
    pub use crate::schema::{FieldDecl, Schema, SchemaBuilder};
    pub use crate::types::{FieldType, TypeShape};
    pub use crate::value::{FromValue, Value, ValueEnum};
    pub use crate::{Options, Result};

    pub fn enum_shape<T: ValueEnum>() -> TypeShape {
        TypeShape::enumeration(T::SYMBOLS.iter().copied())
    }

    pub fn enum_from_value<T: ValueEnum>(value: Value) -> Option<T> {
        match value {
            Value::Enum(s) => T::parse_value(&s),
            _ => None,
        }
    }
}

/// A configuration record with a derived schema.
///
/// You should only get an implementation via [`derive(Options)`](macro@Options).
pub trait Options: Sized {
    /// Build the schema for this record type.
    fn schema() -> Result<Schema, SchemaError>;

    /// Convert a parsed record of this type's schema into `Self`.
    fn from_record(record: Record) -> Result<Self, ParseError>;

    fn try_parse_from<I, T>(iter: I) -> Result<ParseResult<Self>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let schema = Self::schema()?;
        let parsed = parse(&schema, iter)?;
        Ok(parsed.try_map(Self::from_record)?)
    }

    #[cfg(feature = "help")]
    fn render_help(program_name: &str) -> Result<String, SchemaError> {
        Ok(render(program_name, &Self::schema()?))
    }
}

/// Derive macro generating an [`Options`][trait@Options] implementation.
///
/// This macro only accepts non-generic `struct`s with named fields. Each field
/// becomes one option, in declaration order. Field types must implement
/// [`FieldType`]; wrapping a type in `Option` makes the option optional.
///
/// # Container attributes
///
/// - `#[doc = "..."]` or `/// ...`
///
///   Shown as the description above the usage banner in help output.
///
/// # Field attributes
///
/// - `#[opt(long = "...")]`
///
///   Override the long name. By default the field identifier is used verbatim.
///
/// - `#[opt(short = 'c')]` or `#[opt(short)]`
///
///   Set the short name. Without an explicit char, the first char of the long
///   name is used.
///
/// - `#[opt(help = "...")]` or `/// ...`
///
///   The help message. Doc-comments are used if this attribute is not present.
///
/// - `#[opt(default = EXPR)]`
///
///   Declared default. `EXPR` must have the field type with `Option` stripped.
///
/// - `#[opt(default_value = "...")]`
///
///   Declared default written as a command line literal. It is coerced when the
///   schema is built, and an invalid literal is reported as
///   [`SchemaError::InvalidDefault`].
///
/// # Errors
///
/// Duplicated long or short names produce a compile error.
#[cfg(feature = "derive")]
pub use declopt_derive::Options;

/// Derive macro for enums usable as option fields.
///
/// Only unit variants are supported.
///
/// # Container attributes
///
/// - `#[value(rename_all = "...")]`
///
///   Override the variant name case conversion.
///   When not present, the default value is `"kebab-case"`.
///
///   All supported conversions:
///   - `"camelCase"`
///   - `"kebab-case"`
///   - `"PascalCase"`
///   - `"SCREAMING_SNAKE_CASE"`
///   - `"snake_case"`
///   - `"lower"`
///   - `"UPPER"`
///   - `"verbatim"`
///
/// # Variant attributes
///
/// - `#[value(name = "...")]`
///
///   Override the symbol name for this variant, taken verbatim.
///
/// # Errors
///
/// Symbol names colliding after case conversion produce a compile error.
#[cfg(feature = "derive")]
pub use declopt_derive::ValueEnum;
