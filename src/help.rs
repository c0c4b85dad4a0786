use crate::schema::{OptionField, Schema};

/// Column at which help messages start, measured from line start.
const MESSAGE_COLUMN: usize = 25;

/// Render usage text for `schema`. This does not depend on any parse result.
pub fn render(program_name: &str, schema: &Schema) -> String {
    let mut out = String::new();
    render_into(&mut out, program_name, schema);
    out
}

#[inline(never)]
fn push_str(out: &mut String, s: &str) {
    out.push_str(s);
}

macro_rules! w {
    ($out:ident; $($e:expr),*) => {{
        $(push_str($out, $e);)*
    }};
}

fn render_into(out: &mut String, program_name: &str, schema: &Schema) {
    if let Some(about) = schema.about() {
        w!(out; about, "\n\n");
    }

    w!(out; "USAGE:\n    ", program_name, " [OPTIONS] ...\n");

    if schema.fields().is_empty() {
        return;
    }

    w!(out; "\nOPTIONS:\n");
    for field in schema.fields() {
        render_field(out, field);
        w!(out; "\n");
    }
}

fn render_field(out: &mut String, field: &OptionField) {
    let start = out.len();
    match field.short_name() {
        Some(c) => w!(out; "  -", c.encode_utf8(&mut [0; 4]), ", --"),
        // Pad 4 spaces to align "--long" with "-s, --long".
        None => w!(out; "      --"),
    }
    w!(out; field.long_name());

    let width = out[start..].chars().count();
    let pad = MESSAGE_COLUMN.saturating_sub(width).max(1);
    w!(out; &" ".repeat(pad));

    if let Some(msg) = field.message() {
        w!(out; msg, " ");
    }
    let desc = field.descriptor();
    if let Some(default) = field.default() {
        w!(out; "(default: ", &default.display_as(desc), ") ");
    }

    w!(out; "[type: ", desc.kind().name(), "]");
    if let Some(symbols) = desc.symbols() {
        w!(out; "[values: ", &symbols.join(", "), "]");
    }
    if field.must_be_set() {
        w!(out; "[REQUIRED]");
    }
}
