//! Document processing pipeline.
//!
//! Orchestrates one document's run: scan, extract, resolve each directive
//! through the two passes, then reassemble by span. Resolution is the only
//! concurrent stage; assembly waits for every directive before it runs.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::assemble::assemble;
use crate::config::DEFAULT_MAX_CONCURRENT;
use crate::context::{ContextStore, GLOBAL_SCOPE};
use crate::error::{Error, Result};
use crate::formats::FormatRegistry;
use crate::llm::TextGenerator;
use crate::parser::{self, DirectiveId, Span};
use crate::render::Renderer;
use crate::resolve::Resolver;

/// Output of the two passes for one directive.
#[derive(Debug, Clone)]
pub struct ResolvedDirective {
    pub record_id: DirectiveId,
    pub canonical_intent: String,
    pub rendered_text: Option<String>,
}

/// One processing run's configuration and collaborators.
///
/// Each call to [`Pipeline::process`] owns its own node tree and directive id
/// space; the context store is the only state shared across documents, and
/// only when the caller supplies one.
pub struct Pipeline {
    generator: Arc<dyn TextGenerator>,
    registry: FormatRegistry,
    store: Arc<ContextStore>,
    scope_id: String,
    model: Option<String>,
    max_concurrent: usize,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            registry: FormatRegistry::with_builtins(),
            store: Arc::new(ContextStore::new()),
            scope_id: GLOBAL_SCOPE.to_string(),
            model: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Share a context store across documents instead of the per-run default.
    pub fn with_store(mut self, store: Arc<ContextStore>) -> Self {
        self.store = store;
        self
    }

    /// Select the context scope consulted during resolution.
    pub fn with_scope(mut self, id: impl Into<String>) -> Self {
        self.scope_id = id.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    /// Process one document, returning the assembled output.
    ///
    /// Fails fast: the first directive that cannot be resolved aborts the
    /// remaining in-flight resolutions and surfaces its error. The input is
    /// never partially substituted.
    pub async fn process(&self, text: &str, format: &str) -> Result<String> {
        let strategy = self.registry.get(format)?;

        let nodes = parser::scan(text);
        let records = parser::extract(&nodes);
        if records.is_empty() {
            debug!("no directives found, passing document through");
            return Ok(text.to_string());
        }
        info!(directives = records.len(), format, "resolving document");

        let scope = self.store.get(&self.scope_id);
        let mut resolver = Resolver::new(self.generator.clone());
        let mut renderer = Renderer::new(self.generator.clone(), strategy);
        if let Some(model) = &self.model {
            resolver = resolver.with_model(model.clone());
            renderer = renderer.with_model(model.clone());
        }

        let results = {
            let resolver = &resolver;
            let renderer = &renderer;
            let scope = &scope;
            let mut in_flight = stream::iter(records.iter())
                .map(|record| async move {
                    let intent = resolver.resolve(record, scope).await?;
                    let rendered = renderer.render(record.id, &intent).await?;
                    Ok::<_, Error>(ResolvedDirective {
                        record_id: record.id,
                        canonical_intent: intent,
                        rendered_text: Some(rendered),
                    })
                })
                .buffer_unordered(self.max_concurrent);

            let mut resolved = Vec::with_capacity(records.len());
            while let Some(result) = in_flight.next().await {
                // Dropping the stream on the first error cancels the rest.
                resolved.push(result?);
            }
            resolved
        };

        let mut rendered: Vec<Option<String>> = vec![None; records.len()];
        for item in results {
            rendered[item.record_id] = item.rendered_text;
        }

        // Only outermost spans are substituted; a parent's rendered text
        // covers its whole span, children included.
        let substitutions: Vec<(Span, String)> = records
            .iter()
            .filter(|record| record.is_top_level())
            .map(|record| {
                let text = rendered[record.id].take().unwrap_or_default();
                (record.source_span, text)
            })
            .collect();

        Ok(assemble(text, &substitutions))
    }

    /// Process one document, falling back to the original text when the run
    /// fails. The error comes back alongside the text so the caller can
    /// report it.
    pub async fn process_with_fallback(&self, text: &str, format: &str) -> (String, Option<Error>) {
        match self.process(text, format).await {
            Ok(output) => (output, None),
            Err(e) => {
                warn!("emitting original text after failed run: {e}");
                (text.to_string(), Some(e))
            }
        }
    }
}
