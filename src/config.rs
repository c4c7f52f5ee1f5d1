//! Configuration loading and precedence.
//!
//! Two YAML sources: a global file under the home directory and a project
//! file under `.ono/`. Project values override global values key by key.
//! A missing or malformed file contributes an empty section; configuration
//! problems never fail a run.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Keys recognized in a config file. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub model: Option<String>,
    pub max_concurrent: Option<usize>,
    pub stamp: Option<bool>,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub context: Option<HashMap<String, Value>>,
}

#[derive(Debug, Clone, Default)]
pub struct OnoConfig {
    pub global: ConfigFile,
    pub project: Option<ConfigFile>,
}

impl OnoConfig {
    /// Load from the standard locations (`~/.ono/config.yaml` and
    /// `.ono/config.yaml`) and apply environment variables.
    pub fn load() -> Self {
        let global_path = dirs::home_dir().map(|home| home.join(".ono").join("config.yaml"));
        let mut config = Self::load_from(global_path.as_deref(), Path::new(".ono/config.yaml"));
        config.merge_env_vars();
        config
    }

    /// Load from explicit paths, without consulting the environment.
    pub fn load_from(global_path: Option<&Path>, project_path: &Path) -> Self {
        Self {
            global: global_path.map(load_config_file).unwrap_or_default(),
            project: project_path
                .exists()
                .then(|| load_config_file(project_path)),
        }
    }

    pub fn merge_env_vars(&mut self) {
        if let Ok(url) = std::env::var("ONO_API_URL") {
            self.global.api_url = Some(url);
        }
        if let Ok(key) = std::env::var("ONO_API_KEY") {
            self.global.api_key = Some(key);
        }
    }

    pub fn get_model(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|p| p.model.as_deref())
            .or(self.global.model.as_deref())
    }

    pub fn get_max_concurrent(&self) -> usize {
        self.project
            .as_ref()
            .and_then(|p| p.max_concurrent)
            .or(self.global.max_concurrent)
            .unwrap_or(DEFAULT_MAX_CONCURRENT)
    }

    pub fn get_stamp(&self) -> bool {
        self.project
            .as_ref()
            .and_then(|p| p.stamp)
            .or(self.global.stamp)
            .unwrap_or(false)
    }

    pub fn get_api_url(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|p| p.api_url.as_deref())
            .or(self.global.api_url.as_deref())
    }

    pub fn get_api_key(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|p| p.api_key.as_deref())
            .or(self.global.api_key.as_deref())
    }

    /// Ambient context entries for the global scope. Merging is shallow at
    /// the key level, so a project `context` mapping replaces the global one
    /// wholesale.
    pub fn get_context(&self) -> HashMap<String, Value> {
        self.project
            .as_ref()
            .and_then(|p| p.context.clone())
            .or_else(|| self.global.context.clone())
            .unwrap_or_default()
    }
}

fn load_config_file(path: &Path) -> ConfigFile {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring malformed config file {}: {e}", path.display());
                ConfigFile::default()
            }
        },
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("could not read config file {}: {e}", path.display());
            }
            ConfigFile::default()
        }
    }
}
