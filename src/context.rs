//! Named key-value scopes consulted during the concept pass.
//!
//! Scopes are created on first reference and only ever removed explicitly.
//! Absence is always treated as "empty", never as an error, so every
//! operation here is infallible. A store lives for one processing run unless
//! the caller shares one across runs via [`std::sync::Arc`].

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

/// Scope id used when a directive does not select one explicitly.
pub const GLOBAL_SCOPE: &str = "global";

/// One named scope: a flat key-value mapping.
pub type Scope = HashMap<String, Value>;

/// Store of independently lifecycled context scopes.
///
/// Reads are concurrent; mutations serialize behind the write lock.
#[derive(Debug, Default)]
pub struct ContextStore {
    scopes: RwLock<HashMap<String, Scope>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope. No-op if it already exists; existing data is kept.
    pub fn create(&self, id: &str) {
        let mut scopes = self.scopes.write().unwrap();
        scopes.entry(id.to_string()).or_default();
    }

    /// Snapshot of a scope, creating it empty first if absent.
    pub fn get(&self, id: &str) -> Scope {
        {
            let scopes = self.scopes.read().unwrap();
            if let Some(scope) = scopes.get(id) {
                return scope.clone();
            }
        }
        let mut scopes = self.scopes.write().unwrap();
        scopes.entry(id.to_string()).or_default().clone()
    }

    /// Shallow-merge `data` into the scope, overwriting existing keys.
    pub fn update(&self, id: &str, data: Scope) {
        let mut scopes = self.scopes.write().unwrap();
        scopes.entry(id.to_string()).or_default().extend(data);
    }

    /// Reset a scope to empty. No-op if it does not exist.
    pub fn clear(&self, id: &str) {
        let mut scopes = self.scopes.write().unwrap();
        if let Some(scope) = scopes.get_mut(id) {
            scope.clear();
        }
    }

    /// Remove a scope entirely. No-op if it does not exist.
    pub fn delete(&self, id: &str) {
        let mut scopes = self.scopes.write().unwrap();
        scopes.remove(id);
    }
}
