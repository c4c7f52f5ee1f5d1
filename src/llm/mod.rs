//! Generation capability behind the two resolution passes.
//!
//! The rest of the crate treats text generation as one opaque, fallible
//! operation: prompt in, text out. The trait keeps core components testable
//! without a live service; [`HttpGenerator`] is the production
//! implementation. Retry policy belongs here, not in the resolver or
//! renderer; those call `generate` exactly once per pass.

pub mod client;

pub use client::{HttpGenerator, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// One generation request: the prompt plus optional model selection and
/// free-form parameters forwarded to the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub params: HashMap<String, Value>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Opaque text-generation capability.
///
/// Implementations surface every failure mode (network or auth trouble,
/// non-2xx status, malformed response body) as a single
/// [`Error::Generation`](crate::error::Error::Generation).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}
