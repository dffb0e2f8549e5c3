//! Model catalog for alias-based model selection
//!
//! Maps short model aliases ("gpt-4", "claude-3-sonnet") to full OpenRouter
//! identifiers ("openai/gpt-4", "anthropic/claude-3-sonnet") so callers can
//! switch models without memorizing provider prefixes.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/khata/config/models.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/models.toml");

/// Catalog configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Full identifier of the default model
    pub default_model: String,
    /// Alias to full identifier, sorted for stable listing
    pub aliases: BTreeMap<String, String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_model: "openai/gpt-4".to_string(),
            aliases: BTreeMap::new(),
        }
    }
}

/// Model catalog with alias resolution
pub struct ModelCatalog {
    config: CatalogConfig,
    config_path: Option<PathBuf>,
}

impl ModelCatalog {
    /// Create a new catalog with default configuration
    pub fn new() -> Result<Self> {
        let config = load_config(None)?;
        Ok(Self {
            config,
            config_path: default_config_path(),
        })
    }

    /// Create with a custom config path
    pub fn with_config_path(path: PathBuf) -> Result<Self> {
        let config = load_config(Some(&path))?;
        Ok(Self {
            config,
            config_path: Some(path),
        })
    }

    /// Create with an explicit configuration (for testing)
    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    /// Resolve an alias to a full model identifier
    ///
    /// Unknown aliases resolve to the default model so callers never lose a
    /// working model over a typo.
    pub fn resolve<'a>(&'a self, alias: &'a str) -> &'a str {
        if let Some(model) = self.config.aliases.get(alias) {
            return model;
        }
        // Full "provider/model" identifiers pass through untouched
        if alias.contains('/') {
            return alias;
        }
        warn!(
            alias,
            default = %self.config.default_model,
            "Unknown model alias, using default"
        );
        &self.config.default_model
    }

    /// Check if an alias is known
    pub fn contains(&self, alias: &str) -> bool {
        self.config.aliases.contains_key(alias)
    }

    /// Get the default model identifier
    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    /// List all aliases with their full identifiers, sorted by alias
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.config
            .aliases
            .iter()
            .map(|(alias, model)| (alias.as_str(), model.as_str()))
            .collect()
    }

    /// Get the config path (if using file-based config)
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    /// Reload configuration from disk
    pub fn reload(&mut self) -> Result<()> {
        self.config = load_config(self.config_path.as_ref())?;
        Ok(())
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_config(CatalogConfig::default()))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("khata").join("config").join("models.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&PathBuf>) -> Result<CatalogConfig> {
    let content = if let Some(path) = override_path {
        if path.exists() {
            fs::read_to_string(path)
                .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?
        } else {
            DEFAULT_CONFIG.to_string()
        }
    } else {
        // Check default override location
        if let Some(default_path) = default_config_path() {
            if default_path.exists() {
                fs::read_to_string(&default_path)
                    .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?
            } else {
                DEFAULT_CONFIG.to_string()
            }
        } else {
            DEFAULT_CONFIG.to_string()
        }
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    defaults: Option<RawDefaults>,
    aliases: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct RawDefaults {
    model: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<CatalogConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = CatalogConfig::default();

    if let Some(defaults) = raw.defaults {
        if let Some(model) = defaults.model {
            config.default_model = model;
        }
    }

    if let Some(aliases) = raw.aliases {
        config.aliases = aliases;
    }

    Ok(config)
}
