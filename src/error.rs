use std::ffi::OsString;

use thiserror::Error;

/// Misconfiguration detected while building a [`Schema`][crate::Schema].
///
/// These indicate a programming mistake in the option declarations rather than
/// bad user input, and cannot be fixed by passing different arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("field `{field}` has unsupported type `{ty}`")]
    UnsupportedFieldType { field: String, ty: String },

    #[error("no field named `{0}`")]
    UnknownField(String),

    #[error("short name `-{0}` is assigned to more than one field")]
    DuplicateShortName(char),

    #[error("long name `--{0}` is declared more than once")]
    DuplicateLongName(String),

    #[error("invalid long name `{0}`")]
    InvalidLongName(String),

    #[error("invalid short name {0:?}")]
    InvalidShortName(char),

    #[error("invalid default for field `{field}`: {reason}")]
    InvalidDefault { field: String, reason: String },
}

/// Failure while consuming a token stream against a schema.
///
/// The first failure aborts the parse; nothing is aggregated.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("missing program name")]
    MissingProgramName,

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("missing value for option `--{0}`")]
    MissingOptionValue(String),

    #[error("invalid integer literal `{0}`")]
    InvalidIntegerLiteral(String),

    #[error("invalid float literal `{0}`")]
    InvalidFloatLiteral(String),

    #[error("invalid value `{input}`, expected one of: {}", .valid.join(", "))]
    InvalidEnumValue { input: String, valid: Vec<String> },

    #[error("missing required option `--{0}`")]
    MissingRequiredOption(String),

    #[error("argument is not valid UTF-8: {0:?}")]
    InvalidUtf8(OsString),

    /// The record slot does not hold the type the caller asked for.
    #[error("value of `--{0}` does not match the requested type")]
    ValueMismatch(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
