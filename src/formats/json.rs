//! JSON output strategy.

use std::fmt::Write;

use super::FormatStrategy;

/// Escaping rules for JSON string values. Unlike the shell-flavored formats,
/// JSON strings cannot carry raw control characters, so those are escaped too.
#[derive(Debug)]
pub struct JsonStrategy;

impl FormatStrategy for JsonStrategy {
    fn name(&self) -> &'static str {
        "json"
    }

    fn escape_string(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    // Remaining control characters take the \u form.
                    let _ = write!(out, "\\u{:04x}", c as u32);
                }
                c => out.push(c),
            }
        }
        out
    }

    fn comment_prefix(&self) -> Option<&'static str> {
        None
    }
}
