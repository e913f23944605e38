use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BazaarError, Result};

/// Top-level configuration for the bazaar application.
///
/// Loaded from `~/.bazaar/config.toml` by default, with environment variable
/// overrides applied afterwards. The database path and the generator API key
/// have no usable defaults: `validate` rejects a config that lacks either,
/// and startup treats that as fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BazaarConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl BazaarConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BazaarConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Apply environment variable overrides on top of the loaded file.
    ///
    /// Recognized variables: `BAZAAR_PORT`, `BAZAAR_DATABASE_PATH`,
    /// `BAZAAR_GENERATOR_ENDPOINT`, `BAZAAR_GENERATOR_API_KEY`.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = std::env::var("BAZAAR_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(path) = std::env::var("BAZAAR_DATABASE_PATH") {
            self.storage.database_path = path;
        }
        if let Ok(endpoint) = std::env::var("BAZAAR_GENERATOR_ENDPOINT") {
            self.generator.endpoint = endpoint;
        }
        if let Ok(key) = std::env::var("BAZAAR_GENERATOR_API_KEY") {
            self.generator.api_key = key;
        }
    }

    /// Check that all mandatory settings are present.
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_path.trim().is_empty() {
            return Err(BazaarError::Config(
                "storage.database_path is required (or set BAZAAR_DATABASE_PATH)".to_string(),
            ));
        }
        if self.generator.api_key.trim().is_empty() {
            return Err(BazaarError::Config(
                "generator.api_key is required (or set BAZAAR_GENERATOR_API_KEY)".to_string(),
            ));
        }
        Ok(())
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind: String,
    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Persistent storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file. Mandatory.
    pub database_path: String,
}

/// Text-generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Inference endpoint URL for the conversational model.
    pub endpoint: String,
    /// Bearer credential for the inference service. Mandatory.
    pub api_key: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium"
                .to_string(),
            api_key: String::new(),
        }
    }
}

/// Conversational core settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum tokens retained in the conversation window, and the maximum
    /// total length requested from the generator.
    pub context_tokens: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_tokens: 1000,
        }
    }
}
