//! Syntax pass: format-specific text from a canonical intent.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::formats::FormatStrategy;
use crate::llm::{GenerationRequest, TextGenerator};
use crate::parser::DirectiveId;

/// Runs the syntax pass for individual directives.
pub struct Renderer {
    generator: Arc<dyn TextGenerator>,
    strategy: Arc<dyn FormatStrategy>,
    model: Option<String>,
}

impl Renderer {
    pub fn new(generator: Arc<dyn TextGenerator>, strategy: Arc<dyn FormatStrategy>) -> Self {
        Self {
            generator,
            strategy,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Render a canonical intent into text valid for the target format.
    /// The generated text is unwrapped from any code fence, escaped with the
    /// format's rules, then shaped for insertion.
    pub async fn render(&self, directive: DirectiveId, intent: &str) -> Result<String> {
        debug!(directive, format = self.strategy.name(), "syntax pass");

        let mut request = GenerationRequest::new(syntax_prompt(intent, self.strategy.name()));
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let generated = self
            .generator
            .generate(request)
            .await
            .map_err(|e| Error::for_directive(directive, e))?;

        let unfenced = strip_code_fence(&generated);
        Ok(self
            .strategy
            .format_output(&self.strategy.escape_string(unfenced)))
    }
}

fn syntax_prompt(intent: &str, format: &str) -> String {
    format!(
        "Produce the exact text that accomplishes the following in a {format} file.\n\n\
         Task:\n{intent}\n\n\
         Respond with only the text to insert, no explanation and no surrounding quotes."
    )
}

/// Generated responses often arrive wrapped in a markdown code fence; unwrap
/// the body when the whole response is one fenced block.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // The opening fence line may carry an info string ("```bash").
    match body.find('\n') {
        Some(idx) => body[idx + 1..].trim_end(),
        None => body.trim(),
    }
}
