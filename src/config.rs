//! Generator configuration.
//!
//! Values come from defaults, an optional YAML or JSON file, and finally CLI
//! flags. The plugin registry is attached programmatically and never read
//! from a file.

use crate::plugin::PluginRegistry;
use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PAGINATION_LIMIT: u32 = 20;
pub const DEFAULT_PAGINATION_MAX_LIMIT: u32 = 100;
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
pub const DEFAULT_TITLE: &str = "Generated API";
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Settings for one document generation
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory of DTO source files, one resource per file
    pub dtos_directory: Option<PathBuf>,
    pub pagination_limit: u32,
    pub pagination_max_limit: u32,
    pub server_url: String,
    pub title: String,
    pub version: String,
    pub description: String,
    /// Plugins whose resources take precedence over DTO files
    #[serde(skip)]
    pub plugin_registry: Option<PluginRegistry>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dtos_directory: None,
            pagination_limit: DEFAULT_PAGINATION_LIMIT,
            pagination_max_limit: DEFAULT_PAGINATION_MAX_LIMIT,
            server_url: DEFAULT_SERVER_URL.to_string(),
            title: DEFAULT_TITLE.to_string(),
            version: DEFAULT_VERSION.to_string(),
            description: String::new(),
            plugin_registry: None,
        }
    }
}

impl GeneratorConfig {
    /// Reads a config file, JSON for `.json` and YAML otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON config: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML config: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn with_dtos_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dtos_directory = Some(dir.into());
        self
    }

    pub fn with_plugin_registry(mut self, registry: PluginRegistry) -> Self {
        self.plugin_registry = Some(registry);
        self
    }
}
