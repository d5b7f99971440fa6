//! String escaping for the canonical form.

use std::fmt::Write;

use kudl_lex::unicode::{is_bom, is_disallowed, is_newline, valid_identifier};

/// Appends a name (node name, property key, annotation, or string value):
/// bare when the identifier rules allow it, dquote-escaped otherwise.
pub(crate) fn push_name(text: &str, out: &mut String) {
    if valid_identifier(text) {
        out.push_str(text);
    } else {
        push_quoted(text, out);
    }
}

/// Appends a dquote-escaped string.
///
/// Named escapes cover the common controls; every other scalar that could
/// not re-tokenize inside a quoted string (controls, newline-class, BOM,
/// direction controls) falls back to `\u{...}` with uppercase hex.
pub(crate) fn push_quoted(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if (c as u32) < 0x20
                || c == '\u{7F}'
                || is_newline(c)
                || is_bom(c)
                || is_disallowed(c) =>
            {
                let _ = write!(out, "\\u{{{:X}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
