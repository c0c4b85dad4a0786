#![cfg(feature = "help")]
#![expect(dead_code, reason = "only for help generation")]
use declopt::{FieldDecl, Options, Schema, ValueEnum};
use expect_test::{Expect, expect};

#[derive(ValueEnum)]
enum Level {
    Low,
    High,
}

/// My great app.
#[derive(Options)]
struct Cli {
    /// Log more details.
    #[opt(short = 'v', default = false)]
    verbose: Option<bool>,

    /// Output path.
    #[opt(short)]
    output: String,

    #[opt(long = "jobs", default_value = "4")]
    threads: u32,

    level: Option<Level>,
}

/// Configure something.
///
/// Some detailed explanation.
#[derive(Options)]
struct ConfigCli {
    #[opt(short, help = "The key to set.")]
    key: String,

    /// Ignored.
    #[opt(help = "Ratio of things.", default = 0.5)]
    a_very_long_option_name: f64,
}

#[track_caller]
fn assert_help<O: Options>(program_name: &str, expect: Expect) {
    let help = O::render_help(program_name).unwrap();
    expect.assert_eq(&help);
}

#[test]
fn derived() {
    assert_help::<Cli>(
        "me",
        expect![[r#"
            My great app.

            USAGE:
                me [OPTIONS] ...

            OPTIONS:
              -v, --verbose          Log more details. (default: false) [type: bool]
              -o, --output           Output path. [type: string][REQUIRED]
                  --jobs             (default: 4) [type: integer]
                  --level            [type: enum][values: low, high]
        "#]],
    );
}

#[test]
fn paragraphs_and_long_names() {
    assert_help::<ConfigCli>(
        "me",
        expect![[r#"
            Configure something.
            Some detailed explanation.

            USAGE:
                me [OPTIONS] ...

            OPTIONS:
              -k, --key              The key to set. [type: string][REQUIRED]
                  --a_very_long_option_name Ratio of things. (default: 0.5) [type: float]
        "#]],
    );
}

#[derive(Options)]
struct Ratios {
    #[opt(default = 0.1)]
    ratio: f32,
    #[opt(default_value = "0.3")]
    scale: Option<f32>,
    #[opt(default = 0.1)]
    wide: f64,
}

#[test]
fn float_defaults_keep_field_width() {
    assert_help::<Ratios>(
        "me",
        expect![[r#"
            USAGE:
                me [OPTIONS] ...

            OPTIONS:
                  --ratio            (default: 0.1) [type: float]
                  --scale            (default: 0.3) [type: float]
                  --wide             (default: 0.1) [type: float]
        "#]],
    );
}

#[test]
fn empty_schema() {
    let schema = Schema::builder().build().unwrap();
    expect![[r#"
        USAGE:
            prog [OPTIONS] ...
    "#]]
    .assert_eq(&declopt::render("prog", &schema));
}

#[test]
fn runtime_schema() {
    let schema = Schema::builder()
        .about("Runtime built.")
        .field(FieldDecl::of::<Option<i8>>("offset").with_default(-3i8))
        .option::<Option<String>>("name")
        .short("name", 'n')
        .message("name", "Who to greet.")
        .build()
        .unwrap();
    expect![[r#"
        Runtime built.

        USAGE:
            tool [OPTIONS] ...

        OPTIONS:
              --offset           (default: -3) [type: integer]
          -n, --name             Who to greet. [type: string]
    "#]]
    .assert_eq(&declopt::render("tool", &schema));
}

#[test]
fn render_does_not_depend_on_parse() {
    let schema = Cli::schema().unwrap();
    let before = declopt::render("me", &schema);
    let _ = declopt::parse(&schema, ["me", "-o", "x", "--jobs", "8"]).unwrap();
    assert_eq!(before, declopt::render("me", &schema));
}
