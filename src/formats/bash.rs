//! Bash output strategy.

use super::FormatStrategy;

/// Escaping rules for bash. Values are assumed to land inside single-quoted
/// strings, so the only character that needs handling is the quote itself.
#[derive(Debug)]
pub struct BashStrategy;

impl FormatStrategy for BashStrategy {
    fn name(&self) -> &'static str {
        "bash"
    }

    fn escape_string(&self, text: &str) -> String {
        text.replace('\'', "'\\''")
    }
}
