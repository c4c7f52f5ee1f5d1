//! Dockerfile output strategy.

use super::FormatStrategy;

/// Escaping rules for Dockerfile instruction arguments, which follow
/// shell-style double quoting.
#[derive(Debug)]
pub struct DockerfileStrategy;

impl FormatStrategy for DockerfileStrategy {
    fn name(&self) -> &'static str {
        "dockerfile"
    }

    fn escape_string(&self, text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_and_backslashes() {
        let strategy = DockerfileStrategy;
        assert_eq!(strategy.escape_string(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(strategy.escape_string(r"a\b"), r"a\\b");
    }
}
