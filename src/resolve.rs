//! Concept pass: semantic understanding and context injection.
//!
//! The first of the two resolution passes. It turns a directive's raw text,
//! together with the ambient context scope, into one canonical,
//! format-independent statement of intent. The second pass
//! ([`crate::render`]) turns that intent into concrete target-format text.

use std::fmt::Write;
use std::sync::Arc;

use tracing::debug;

use crate::context::Scope;
use crate::error::{Error, Result};
use crate::llm::{GenerationRequest, TextGenerator};
use crate::parser::DirectiveRecord;

/// Runs the concept pass for individual directives.
pub struct Resolver {
    generator: Arc<dyn TextGenerator>,
    model: Option<String>,
}

impl Resolver {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Resolve one directive's raw text into a canonical intent.
    ///
    /// Failure carries the directive id so the caller can report which span
    /// broke the run. Retry policy belongs to the generator, not here.
    pub async fn resolve(&self, record: &DirectiveRecord, scope: &Scope) -> Result<String> {
        debug!(directive = record.id, depth = record.depth, "concept pass");

        let mut request = GenerationRequest::new(concept_prompt(&record.raw_content, scope));
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let intent = self
            .generator
            .generate(request)
            .await
            .map_err(|e| Error::for_directive(record.id, e))?;
        Ok(intent.trim().to_string())
    }
}

fn concept_prompt(raw_content: &str, scope: &Scope) -> String {
    let mut prompt = String::new();
    prompt.push_str("You resolve build-time directives embedded in source files.\n\n");
    prompt.push_str("Directive:\n");
    prompt.push_str(raw_content);
    prompt.push_str("\n\n");

    if !scope.is_empty() {
        prompt.push_str("Context:\n");
        let mut keys: Vec<_> = scope.keys().collect();
        keys.sort();
        for key in keys {
            let value = &scope[key];
            match value.as_str() {
                Some(s) => {
                    let _ = writeln!(prompt, "  {key}: {s}");
                }
                None => {
                    let _ = writeln!(prompt, "  {key}: {value}");
                }
            }
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "Restate the directive as a single canonical instruction, independent of any \
         programming language or output format. Respond with only that instruction.",
    );
    prompt
}
