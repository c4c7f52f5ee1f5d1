//! Advisory output validation.
//!
//! These checks never block assembly; they exist so the CLI can warn when
//! generated text looks structurally wrong for its target format.

/// Outcome of validating one piece of generated output.
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn invalid(error: String) -> Self {
        Self {
            is_valid: false,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    fn warning(warning: String) -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: vec![warning],
        }
    }
}

/// Validate `text` against the structural rules of `format`.
pub fn validate_output(text: &str, format: &str) -> ValidationResult {
    match format {
        "json" => validate_json(text),
        "bash" => validate_bash(text),
        "python" => validate_python(text),
        "dockerfile" => validate_dockerfile(text),
        _ => ValidationResult::valid(),
    }
}

fn validate_json(text: &str) -> ValidationResult {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(_) => ValidationResult::valid(),
        Err(e) => ValidationResult::invalid(format!("output is not valid JSON: {e}")),
    }
}

fn validate_bash(text: &str) -> ValidationResult {
    // Quote-balance heuristic. The closed-reopened idiom `'\''` counts as
    // balanced, so strip it before counting.
    let stripped = text.replace("'\\''", "");
    if stripped.matches('\'').count() % 2 != 0 {
        return ValidationResult::warning("unbalanced single quotes".to_string());
    }
    let unescaped_doubles = count_unescaped(&stripped, '"');
    if unescaped_doubles % 2 != 0 {
        return ValidationResult::warning("unbalanced double quotes".to_string());
    }
    ValidationResult::valid()
}

fn validate_python(text: &str) -> ValidationResult {
    if text.matches("\"\"\"").count() % 2 != 0 || text.matches("'''").count() % 2 != 0 {
        return ValidationResult::warning("unbalanced triple-quoted string".to_string());
    }
    ValidationResult::valid()
}

fn validate_dockerfile(text: &str) -> ValidationResult {
    if text.trim_end_matches(' ').ends_with('\\') {
        return ValidationResult::warning("dangling line continuation".to_string());
    }
    ValidationResult::valid()
}

fn count_unescaped(text: &str, target: char) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in text.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == target {
            count += 1;
        }
    }
    count
}
