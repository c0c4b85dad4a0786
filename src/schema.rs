//! Option schema: the ordered, validated list of option fields.
use crate::error::SchemaError;
use crate::types::{FieldType, TypeDescriptor, TypeShape};
use crate::value::{Value, coerce};

/// Declaration of one configuration field, as fed into [`Schema::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub shape: TypeShape,
    pub default: Option<DefaultDecl>,
}

/// A declared default, either already typed or as a literal to be coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultDecl {
    Value(Value),
    Literal(String),
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self { name: name.into(), shape, default: None }
    }

    /// Declare a field with the shape of the Rust type `T`.
    pub fn of<T: FieldType>(name: impl Into<String>) -> Self {
        Self::new(name, T::shape())
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultDecl::Value(value.into()));
        self
    }

    /// Default given as a literal, coerced like a command line token at build time.
    #[must_use]
    pub fn with_default_literal(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(DefaultDecl::Literal(literal.into()));
        self
    }
}

/// One option in a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptionField {
    long_name: String,
    short_name: Option<char>,
    message: Option<String>,
    descriptor: TypeDescriptor,
    default: Option<Value>,
}

impl OptionField {
    #[must_use]
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    #[must_use]
    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// The declared default, if any.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether a parse fails when this option is never given.
    ///
    /// A required field with a declared default starts out satisfied.
    #[must_use]
    pub fn must_be_set(&self) -> bool {
        self.descriptor.is_required() && self.default.is_none()
    }

    /// The value a record slot holds before any token is consumed.
    pub(crate) fn initial_value(&self) -> Value {
        self.default.clone().unwrap_or_default()
    }
}

/// Ordered option fields derived from a configuration shape.
///
/// Immutable once built; it can be shared by any number of parses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    about: Option<String>,
    fields: Vec<OptionField>,
}

impl Schema {
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Build a schema from field declarations, short-alias and help-message tables.
    pub fn build<F, S, M, N1, N2, T>(fields: F, shorts: S, messages: M) -> Result<Self, SchemaError>
    where
        F: IntoIterator<Item = FieldDecl>,
        S: IntoIterator<Item = (N1, char)>,
        M: IntoIterator<Item = (N2, T)>,
        N1: AsRef<str>,
        N2: AsRef<str>,
        T: Into<String>,
    {
        let decls = fields.into_iter();
        let mut fields = Vec::<OptionField>::with_capacity(decls.size_hint().0);
        for FieldDecl { name, shape, default } in decls {
            check_long_name(&name)?;
            if fields.iter().any(|f| f.long_name == name) {
                return Err(SchemaError::DuplicateLongName(name));
            }
            let descriptor = TypeDescriptor::classify_field(&name, &shape)?;
            let default = match default {
                None => None,
                Some(DefaultDecl::Value(v)) => {
                    v.check_fits(&descriptor).map_err(|reason| SchemaError::InvalidDefault {
                        field: name.clone(),
                        reason,
                    })?;
                    Some(v).filter(|v| !v.is_null())
                }
                Some(DefaultDecl::Literal(s)) => {
                    let v = coerce(&descriptor, &s).map_err(|err| SchemaError::InvalidDefault {
                        field: name.clone(),
                        reason: err.to_string(),
                    })?;
                    Some(v)
                }
            };
            fields.push(OptionField {
                long_name: name,
                short_name: None,
                message: None,
                descriptor,
                default,
            });
        }

        for (name, c) in shorts {
            let name = name.as_ref();
            check_short_name(c)?;
            let idx = position_of(&fields, name)?;
            if fields.iter().enumerate().any(|(i, f)| i != idx && f.short_name == Some(c)) {
                return Err(SchemaError::DuplicateShortName(c));
            }
            fields[idx].short_name = Some(c);
        }

        for (name, msg) in messages {
            let idx = position_of(&fields, name.as_ref())?;
            fields[idx].message = Some(msg.into());
        }

        tracing::debug!(fields = fields.len(), "built option schema");
        Ok(Self { about: None, fields })
    }

    /// Free-form description shown above the usage banner in help output.
    #[must_use]
    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    #[must_use]
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[OptionField] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, long_name: &str) -> Option<&OptionField> {
        self.fields.iter().find(|f| f.long_name == long_name)
    }

    pub(crate) fn position_long(&self, long_name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.long_name == long_name)
    }

    pub(crate) fn position_short(&self, short_name: char) -> Option<usize> {
        self.fields.iter().position(|f| f.short_name == Some(short_name))
    }
}

fn position_of(fields: &[OptionField], name: &str) -> Result<usize, SchemaError> {
    fields
        .iter()
        .position(|f| f.long_name == name)
        .ok_or_else(|| SchemaError::UnknownField(name.into()))
}

fn check_long_name(name: &str) -> Result<(), SchemaError> {
    if name.is_empty()
        || name.starts_with('-')
        || name.contains(|c: char| c.is_whitespace() || c.is_control())
    {
        return Err(SchemaError::InvalidLongName(name.into()));
    }
    Ok(())
}

fn check_short_name(c: char) -> Result<(), SchemaError> {
    if c == '-' || c.is_whitespace() || c.is_control() {
        return Err(SchemaError::InvalidShortName(c));
    }
    Ok(())
}

/// Incremental form of [`Schema::build`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    about: Option<String>,
    fields: Vec<FieldDecl>,
    shorts: Vec<(String, char)>,
    messages: Vec<(String, String)>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    #[must_use]
    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }

    /// Shorthand for `field(FieldDecl::of::<T>(name))`.
    #[must_use]
    pub fn option<T: FieldType>(self, name: impl Into<String>) -> Self {
        self.field(FieldDecl::of::<T>(name))
    }

    #[must_use]
    pub fn short(mut self, name: impl Into<String>, c: char) -> Self {
        self.shorts.push((name.into(), c));
        self
    }

    #[must_use]
    pub fn message(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.push((name.into(), message.into()));
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut schema = Schema::build(self.fields, self.shorts, self.messages)?;
        schema.about = self.about;
        Ok(schema)
    }
}
