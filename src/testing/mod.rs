//! Test support: mock implementations of external collaborators.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::llm::{GenerationRequest, TextGenerator};

/// Scripted stand-in for the generation service.
///
/// Responses are chosen in precedence order: a blanket failure, an injected
/// failure matched by prompt substring, the next scripted response, the first
/// matching substring rule, then a fixed default.
pub struct MockGenerator {
    script: Mutex<VecDeque<String>>,
    rules: Vec<(String, String)>,
    fail_all: Option<String>,
    fail_containing: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            rules: Vec::new(),
            fail_all: None,
            fail_containing: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Responds with each entry in order, falling back to the default once
    /// the script runs out.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            ..Self::new()
        }
    }

    /// Fails every call with a generation error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_all: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Respond with `response` whenever the prompt contains `needle`.
    pub fn with_rule(mut self, needle: &str, response: &str) -> Self {
        self.rules.push((needle.to_string(), response.to_string()));
        self
    }

    /// Fail any call whose prompt contains `needle`.
    pub fn fail_when(mut self, needle: &str) -> Self {
        self.fail_containing = Some(needle.to_string());
        self
    }

    /// Every prompt seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        self.prompts.lock().unwrap().push(request.prompt.clone());

        if let Some(message) = &self.fail_all {
            return Err(Error::Generation(message.clone()));
        }
        if let Some(needle) = &self.fail_containing {
            if request.prompt.contains(needle.as_str()) {
                return Err(Error::Generation(format!(
                    "injected failure for prompt containing {needle:?}"
                )));
            }
        }
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return Ok(next);
        }
        for (needle, response) in &self.rules {
            if request.prompt.contains(needle.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok("mock output".to_string())
    }
}
