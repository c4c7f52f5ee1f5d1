//! Python output strategy.

use super::FormatStrategy;

/// Escaping rules for python double-quoted string literals.
#[derive(Debug)]
pub struct PythonStrategy;

impl FormatStrategy for PythonStrategy {
    fn name(&self) -> &'static str {
        "python"
    }

    fn escape_string(&self, text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }
}
