//! Per-format output strategies.
//!
//! Each supported target format registers a [`FormatStrategy`] describing how
//! generated text is escaped and shaped before insertion. Strategies are
//! looked up once, when a pipeline is constructed; asking for a format nobody
//! registered is a configuration error, not a per-directive one.

pub mod bash;
pub mod dockerfile;
pub mod json;
pub mod python;
pub mod validate;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

pub use bash::BashStrategy;
pub use dockerfile::DockerfileStrategy;
pub use json::JsonStrategy;
pub use python::PythonStrategy;
pub use validate::{validate_output, ValidationResult};

/// Escaping and shaping rules for one target format.
pub trait FormatStrategy: Send + Sync + std::fmt::Debug {
    /// Identifier this strategy is registered under.
    fn name(&self) -> &'static str;

    /// Escape `text` so it can sit inside the format's string syntax.
    fn escape_string(&self, text: &str) -> String;

    /// Final shaping of generated text before insertion into the document.
    fn format_output(&self, text: &str) -> String {
        text.trim().to_string()
    }

    /// Line-comment prefix, if the format has one. Used for build stamps.
    fn comment_prefix(&self) -> Option<&'static str> {
        Some("#")
    }
}

/// String-keyed table of registered strategies.
pub struct FormatRegistry {
    strategies: HashMap<&'static str, Arc<dyn FormatStrategy>>,
}

impl FormatRegistry {
    /// An empty registry with no strategies.
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// A registry with all built-in formats registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BashStrategy));
        registry.register(Arc::new(PythonStrategy));
        registry.register(Arc::new(DockerfileStrategy));
        registry.register(Arc::new(JsonStrategy));
        registry
    }

    pub fn register(&mut self, strategy: Arc<dyn FormatStrategy>) {
        self.strategies.insert(strategy.name(), strategy);
    }

    /// Look up a strategy by format identifier.
    pub fn get(&self, format: &str) -> Result<Arc<dyn FormatStrategy>> {
        self.strategies
            .get(format)
            .cloned()
            .ok_or_else(|| Error::UnknownFormat(format.to_string()))
    }

    /// Registered format identifiers, sorted for stable diagnostics.
    pub fn formats(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.strategies.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Drop the `.ono` infix from a file name: `deploy.ono.py` becomes
/// `deploy.py`, `Dockerfile.ono` becomes `Dockerfile`.
pub fn strip_ono_infix(name: &str) -> String {
    if let Some(stripped) = name.strip_suffix(".ono") {
        stripped.to_string()
    } else {
        name.replacen(".ono.", ".", 1)
    }
}

/// Infer the target format from a file name, after stripping the `.ono`
/// infix. Returns `None` when the extension is not recognized.
pub fn infer_format(path: &Path) -> Option<&'static str> {
    let name = path.file_name().and_then(|n| n.to_str())?;
    let name = strip_ono_infix(name);

    if name == "Dockerfile" || name.starts_with("Dockerfile.") {
        return Some("dockerfile");
    }

    match Path::new(&name).extension().and_then(|e| e.to_str())? {
        "sh" | "bash" => Some("bash"),
        "py" => Some("python"),
        "dockerfile" => Some("dockerfile"),
        "json" => Some("json"),
        _ => None,
    }
}
