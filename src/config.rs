//! Persisted configuration and per-invocation resolution.
//!
//! The config file stores a credential, default provider and default
//! model at a fixed well-known path. Resolution merges command-line
//! values over environment variables over the file, in that order, and
//! produces one immutable [`ProviderConfig`] per invocation — the core
//! never reads the file itself and there is no process-wide mutable
//! configuration state.

use crate::error::{Error, Result};
use crate::log_debug;
use crate::providers::{Provider, ProviderConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Generic credential variable checked before the provider-specific one.
pub const API_KEY_ENV: &str = "README_API_KEY";

/// Stored settings for one provider.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct StoredProvider {
    /// API key for the provider.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// Default model for the provider.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
}

/// Default numeric limits applied when neither the CLI nor the file
/// overrides them.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct GenerationDefaults {
    pub max_tokens: u32,
    pub max_retries: u32,
    pub retry_delay: u64,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            max_retries: 3,
            retry_delay: 2,
        }
    }
}

/// The persisted configuration file.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    /// Provider used when none is given on the command line.
    pub default_provider: String,
    /// Per-provider settings.
    #[serde(default)]
    pub providers: HashMap<String, StoredProvider>,
    /// Numeric generation defaults.
    #[serde(default)]
    pub defaults: GenerationDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: Provider::default().name().to_string(),
            providers: HashMap::new(),
            defaults: GenerationDefaults::default(),
        }
    }
}

/// Command-line values that take precedence over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub max_retries: Option<u32>,
    pub retry_delay: Option<u64>,
}

impl Config {
    /// Load the configuration from the well-known path, falling back to
    /// defaults when no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| Error::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::Configuration(format!("Invalid config file {}: {e}", path.display())))?;
        log_debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save the configuration to the well-known path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Filesystem {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("Could not serialize config: {e}")))?;
        fs::write(path, content).map_err(|source| Error::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;
        log_debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Delete the persisted file, restoring defaults.
    pub fn reset() -> Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path).map_err(|source| Error::Filesystem { path, source })?;
        }
        Ok(())
    }

    /// `config_dir()/readmegen/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            Error::Configuration("Unable to determine config directory".to_string())
        })?;
        path.push("readmegen");
        path.push("config.toml");
        Ok(path)
    }

    /// Apply `configure` updates to the stored settings.
    pub fn update(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(provider_str) = &overrides.provider {
            let provider: Provider = provider_str.parse()?;
            self.default_provider = provider.name().to_string();
        }
        let entry = self
            .providers
            .entry(self.default_provider.clone())
            .or_default();
        if let Some(key) = &overrides.api_key {
            entry.api_key.clone_from(key);
        }
        if let Some(model) = &overrides.model {
            entry.model.clone_from(model);
        }
        if let Some(max_tokens) = overrides.max_tokens {
            self.defaults.max_tokens = max_tokens;
        }
        if let Some(max_retries) = overrides.max_retries {
            self.defaults.max_retries = max_retries;
        }
        if let Some(retry_delay) = overrides.retry_delay {
            self.defaults.retry_delay = retry_delay;
        }
        Ok(())
    }

    /// Merge CLI overrides, environment and stored settings into one
    /// immutable [`ProviderConfig`], validating bounds.
    pub fn resolve(&self, overrides: &ConfigOverrides) -> Result<ProviderConfig> {
        let provider: Provider = overrides
            .provider
            .as_deref()
            .unwrap_or(&self.default_provider)
            .parse()?;
        let stored = self.providers.get(provider.name());

        let model = overrides
            .model
            .clone()
            .or_else(|| stored.map(|s| s.model.clone()).filter(|m| !m.is_empty()))
            .unwrap_or_else(|| provider.default_model().to_string());

        let api_key = overrides
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
            .or_else(|| {
                std::env::var(provider.api_key_env())
                    .ok()
                    .filter(|k| !k.is_empty())
            })
            .or_else(|| stored.map(|s| s.api_key.clone()).filter(|k| !k.is_empty()))
            .unwrap_or_default();

        let config = ProviderConfig {
            provider,
            model,
            api_key,
            max_tokens: overrides.max_tokens.unwrap_or(self.defaults.max_tokens),
            max_retries: overrides.max_retries.unwrap_or(self.defaults.max_retries),
            retry_delay: overrides.retry_delay.unwrap_or(self.defaults.retry_delay),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Mask a credential for display, keeping only the last four characters.
pub fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let count = key.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("****{tail}")
}
