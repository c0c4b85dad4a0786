use declopt::{Options, ParseError, Schema, TypeShape, Value, ValueEnum};
use declopt::{FieldType, FromValue};

#[derive(Debug, ValueEnum)]
enum Empty {}

#[derive(Debug, PartialEq, ValueEnum)]
enum Single {
    SingleVariant,
}

#[derive(Debug, PartialEq, ValueEnum)]
#[value(rename_all = "camelCase")]
enum Override {
    #[value(name = "")]
    A,
    DefaultVariant,
    #[value(name = "the value")]
    ExplicitVariant,
}

#[test]
fn empty() {
    assert!(Empty::parse_value("").is_none());
    assert!(Empty::SYMBOLS.is_empty());
}

#[test]
fn single() {
    assert_eq!(Single::parse_value("single-variant"), Some(Single::SingleVariant));
    assert_eq!(Single::parse_value("Single-variant"), None);
    assert_eq!(Single::SingleVariant.as_symbol(), "single-variant");
}

#[test]
fn rename_all() {
    assert_eq!(Override::parse_value(""), Some(Override::A));
    assert_eq!(Override::parse_value("defaultVariant"), Some(Override::DefaultVariant));
    assert_eq!(Override::parse_value("the value"), Some(Override::ExplicitVariant));
    assert_eq!(Override::SYMBOLS, ["", "defaultVariant", "the value"]);
}

macro_rules! test_renames {
    ($($convert:literal, $variant:ident, $expect:literal;)*) => {
        $(
            #[expect(non_snake_case)]
            #[test]
            fn $variant() {
                #[allow(non_camel_case_types)]
                #[derive(Debug, PartialEq, ValueEnum)]
                #[value(rename_all = $convert)]
                enum $variant {
                    $variant,
                }

                assert_eq!($variant::parse_value($expect), Some($variant::$variant));
            }
        )*
    };
}

test_renames! {
    "camelCase", RenameCamel, "renameCamel";
    "PascalCase", RenamePascal, "RenamePascal";
    "SCREAMING_SNAKE_CASE", RenameScream, "RENAME_SCREAM";
    "snake_case", RenameSnake, "rename_snake";
    "lower", RenameLower, "renamelower";
    "UPPER", RenameUpper, "RENAMEUPPER";
    "verbatim", RenameXMLHttp_Request, "RenameXMLHttp_Request";
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum Level {
    Low,
    Medium,
    High,
}

#[test]
fn field_type_and_value() {
    assert_eq!(
        Level::shape(),
        TypeShape::Enum(vec!["low".into(), "medium".into(), "high".into()]),
    );
    assert_eq!(Value::from(Level::High), Value::Enum("high".into()));
    assert_eq!(Level::from_value(Value::Enum("medium".into())), Some(Level::Medium));
    assert_eq!(Level::from_value(Value::Enum("extreme".into())), None);
    assert_eq!(Level::from_value(Value::String("low".into())), None);
}

#[derive(Debug, PartialEq, Options)]
struct Cli {
    #[opt(short)]
    level: Level,
    #[opt(default = Level::Low)]
    fallback: Option<Level>,
}

#[test]
fn parse_enum_option() {
    let got = Cli::try_parse_from(["prog", "-l", "high"]).unwrap();
    assert_eq!(got.record, Cli { level: Level::High, fallback: Some(Level::Low) });

    let got = Cli::try_parse_from(["prog", "--level", "low", "--fallback", "medium"]).unwrap();
    assert_eq!(got.record, Cli { level: Level::Low, fallback: Some(Level::Medium) });
}

#[test]
fn invalid_enum_symbol() {
    let err = Cli::try_parse_from(["prog", "--level", "High"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidEnumValue {
            input: "High".into(),
            valid: vec!["low".into(), "medium".into(), "high".into()],
        }
        .into(),
    );
    assert_eq!(err.to_string(), "invalid value `High`, expected one of: low, medium, high");
}

#[test]
fn enum_symbols_in_schema() {
    let schema: Schema = Cli::schema().unwrap();
    let symbols = schema.field("level").unwrap().descriptor().symbols().unwrap();
    assert_eq!(symbols, ["low", "medium", "high"]);
    assert_eq!(schema.field("fallback").unwrap().default(), Some(&Value::Enum("low".into())));
}
