//! The token-consuming state machine.
use std::ffi::OsString;

use crate::error::ParseError;
use crate::schema::Schema;
use crate::types::BaseKind;
use crate::value::{FromValue, Value, coerce, parse_bool_literal};

/// Field values produced by one parse, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    name: String,
    value: Value,
    is_set: bool,
}

impl Record {
    /// A record with every slot holding its pre-parse value.
    fn new(schema: &Schema) -> Self {
        let slots = schema
            .fields()
            .iter()
            .map(|f| Slot { name: f.long_name().into(), value: f.initial_value(), is_set: false })
            .collect();
        Self { slots }
    }

    fn set(&mut self, idx: usize, value: Value) {
        let slot = &mut self.slots[idx];
        slot.value = value;
        slot.is_set = true;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn get(&self, long_name: &str) -> Option<&Value> {
        self.slot(long_name).map(|s| &s.value)
    }

    /// Whether the option was given on the command line, as opposed to
    /// holding its default.
    #[must_use]
    pub fn is_set(&self, long_name: &str) -> bool {
        self.slot(long_name).is_some_and(|s| s.is_set)
    }

    /// Iterate `(long_name, value)` in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots.iter().map(|s| (&*s.name, &s.value))
    }

    /// Move the value at schema index `idx` out as `T`, leaving `Null` behind.
    pub fn take<T: FromValue>(&mut self, idx: usize) -> Result<T, ParseError> {
        let slot = self
            .slots
            .get_mut(idx)
            .ok_or_else(|| ParseError::ValueMismatch(format!("#{idx}")))?;
        T::from_value(std::mem::take(&mut slot.value))
            .ok_or_else(|| ParseError::ValueMismatch(slot.name.clone()))
    }

    fn slot(&self, long_name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == long_name)
    }
}

/// The outcome of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<R = Record> {
    pub program_name: String,
    pub record: R,
    pub positional_args: Vec<String>,
}

impl<R> ParseResult<R> {
    pub fn try_map<T, E>(self, f: impl FnOnce(R) -> Result<T, E>) -> Result<ParseResult<T>, E> {
        Ok(ParseResult {
            program_name: self.program_name,
            record: f(self.record)?,
            positional_args: self.positional_args,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    /// Expecting the value of the option at this schema index.
    WaitValue(usize),
    /// After a bool option, which may be followed by an explicit literal.
    WaitBoolValue(usize),
    Positional,
}

/// Parse `args` against `schema`. The first item is the program name.
pub fn parse<I, T>(schema: &Schema, args: I) -> Result<ParseResult, ParseError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut iter = args.into_iter().map(Into::into);
    let arg0 = iter.next().ok_or(ParseError::MissingProgramName)?;
    let program_name = arg0.to_string_lossy().into_owned();

    let mut parser = TokenParser::new(schema);
    for raw in iter {
        let token = raw.into_string().map_err(ParseError::InvalidUtf8)?;
        parser.feed(token)?;
    }
    let (record, positional_args) = parser.finish()?;
    tracing::debug!(program = %program_name, positional = positional_args.len(), "parsed arguments");
    Ok(ParseResult { program_name, record, positional_args })
}

struct TokenParser<'s> {
    schema: &'s Schema,
    state: State,
    record: Record,
    positional: Vec<String>,
}

impl<'s> TokenParser<'s> {
    fn new(schema: &'s Schema) -> Self {
        Self { schema, state: State::Start, record: Record::new(schema), positional: Vec::new() }
    }

    fn feed(&mut self, token: String) -> Result<(), ParseError> {
        tracing::trace!(state = ?self.state, len = token.len(), "feed");
        match self.state {
            State::Start => self.dispatch(token)?,
            State::Positional => self.positional.push(token),
            State::WaitValue(idx) => {
                let field = &self.schema.fields()[idx];
                let value = coerce(field.descriptor(), &token)?;
                self.record.set(idx, value);
                self.state = State::Start;
            }
            State::WaitBoolValue(idx) => {
                self.state = State::Start;
                if token.starts_with('-') {
                    // Not our value. The flag stands alone and the token starts over.
                    self.record.set(idx, Value::Bool(true));
                    self.dispatch(token)?;
                } else {
                    self.record.set(idx, Value::Bool(parse_bool_literal(&token)));
                }
            }
        }
        Ok(())
    }

    /// Handle a token in the `Start` state.
    fn dispatch(&mut self, token: String) -> Result<(), ParseError> {
        let idx = if let Some(name) = token.strip_prefix("--") {
            self.schema
                .position_long(name)
                .ok_or_else(|| ParseError::UnknownOption(name.into()))?
        } else if let Some(rest) = token.strip_prefix('-') {
            let mut chars = rest.chars();
            let found = match (chars.next(), chars.next()) {
                (Some(c), None) => self.schema.position_short(c),
                _ => None,
            };
            found.ok_or_else(|| ParseError::UnknownOption(token.clone()))?
        } else {
            self.positional.push(token);
            self.state = State::Positional;
            return Ok(());
        };

        self.state = if self.schema.fields()[idx].descriptor().kind() == BaseKind::Bool {
            State::WaitBoolValue(idx)
        } else {
            State::WaitValue(idx)
        };
        Ok(())
    }

    fn finish(mut self) -> Result<(Record, Vec<String>), ParseError> {
        match self.state {
            State::WaitValue(idx) => {
                let name = self.schema.fields()[idx].long_name();
                return Err(ParseError::MissingOptionValue(name.into()));
            }
            State::WaitBoolValue(idx) => self.record.set(idx, Value::Bool(true)),
            State::Start | State::Positional => {}
        }

        if let Some((field, _)) = self
            .schema
            .fields()
            .iter()
            .zip(&self.record.slots)
            .find(|(field, slot)| field.must_be_set() && !slot.is_set)
        {
            return Err(ParseError::MissingRequiredOption(field.long_name().into()));
        }

        Ok((self.record, self.positional))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDecl;

    fn schema() -> Schema {
        Schema::builder()
            .field(FieldDecl::of::<Option<bool>>("verbose").with_default(false))
            .option::<String>("output")
            .short("verbose", 'v')
            .short("output", 'o')
            .build()
            .unwrap()
    }

    #[test]
    fn state_after_option() {
        let schema = schema();
        let mut p = TokenParser::new(&schema);
        p.feed("-o".into()).unwrap();
        assert_eq!(p.state, State::WaitValue(1));
        p.feed("-v".into()).unwrap();
        assert_eq!(p.state, State::Start);
        assert_eq!(p.record.get("output"), Some(&Value::String("-v".into())));
        p.feed("--verbose".into()).unwrap();
        assert_eq!(p.state, State::WaitBoolValue(0));
        p.feed("file".into()).unwrap();
        assert_eq!(p.state, State::Start);
        assert_eq!(p.record.get("verbose"), Some(&Value::Bool(false)));
        assert!(p.record.is_set("verbose"));
    }

    #[test]
    fn bool_redispatch() {
        let schema = schema();
        let mut p = TokenParser::new(&schema);
        p.feed("-v".into()).unwrap();
        p.feed("-o".into()).unwrap();
        assert_eq!(p.state, State::WaitValue(1));
        assert_eq!(p.record.get("verbose"), Some(&Value::Bool(true)));
    }

    #[test]
    fn bool_at_end() {
        let schema = schema();
        let mut p = TokenParser::new(&schema);
        p.feed("-o".into()).unwrap();
        p.feed("x".into()).unwrap();
        p.feed("-v".into()).unwrap();
        let (record, positional) = p.finish().unwrap();
        assert_eq!(record.get("verbose"), Some(&Value::Bool(true)));
        assert!(positional.is_empty());
    }

    #[test]
    fn unknown_short_forms() {
        let schema = schema();
        for token in ["-x", "-vo", "-"] {
            let mut p = TokenParser::new(&schema);
            assert_eq!(p.feed(token.into()), Err(ParseError::UnknownOption(token.into())));
        }
        let mut p = TokenParser::new(&schema);
        assert_eq!(p.feed("--outptu".into()), Err(ParseError::UnknownOption("outptu".into())));
    }

    #[derive(Clone, Default)]
    struct CapturedEvents(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

    struct EventFields(String);

    impl tracing::field::Visit for EventFields {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.0.push_str(&format!("{}={:?} ", field.name(), value));
        }
    }

    impl tracing::Subscriber for CapturedEvents {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }
        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}
        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}
        fn event(&self, event: &tracing::Event<'_>) {
            let mut fields = EventFields(String::new());
            event.record(&mut fields);
            self.0.lock().unwrap().push(fields.0);
        }
        fn enter(&self, _: &tracing::span::Id) {}
        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[test]
    fn trace_omits_token_text() {
        let schema = schema();
        let events = CapturedEvents::default();
        tracing::subscriber::with_default(events.clone(), || {
            parse(&schema, ["prog", "--output", "hunter2"]).unwrap();
        });
        let events = events.0.lock().unwrap();
        assert!(events.iter().any(|e| e.contains("len=7")), "{events:?}");
        assert!(events.iter().all(|e| !e.contains("hunter2")), "{events:?}");
    }

    #[test]
    fn take_values() {
        let schema = schema();
        let mut record = Record::new(&schema);
        record.set(1, Value::String("a".into()));
        assert_eq!(record.take::<Option<bool>>(0), Ok(Some(false)));
        assert_eq!(record.take::<u8>(1), Err(ParseError::ValueMismatch("output".into())));
        assert!(record.take::<bool>(9).is_err());
    }
}
