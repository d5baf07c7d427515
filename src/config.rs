//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.
//! The configuration is constructed once at startup and passed down to the
//! components that need it; nothing reads ambient globals afterwards.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::error::Result;

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// URL of the local Ollama generation endpoint
    pub ollama_endpoint: String,
    /// Model name passed to the generation endpoint
    pub ollama_model: String,
    /// Directory holding template JSON files
    pub templates_dir: PathBuf,
    /// Root directory for template image assets
    pub assets_dir: PathBuf,
    /// Directory finished decks are written to
    pub downloads_dir: PathBuf,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            ollama_endpoint: "http://localhost:11434/api/generate".to_string(),
            ollama_model: "llama3.2:1b".to_string(),
            templates_dir: PathBuf::from("data/templates"),
            assets_dir: PathBuf::from("data/assets"),
            downloads_dir: PathBuf::from("out/downloads"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    #[allow(clippy::unnecessary_wraps)] // Returns Result for forward-compatible API
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Ok(endpoint) = env::var("OLLAMA_ENDPOINT") {
            config.ollama_endpoint = endpoint;
        }

        if let Ok(model) = env::var("OLLAMA_MODEL") {
            config.ollama_model = model;
        }

        if let Ok(dir) = env::var("DECKFORGE_TEMPLATES_DIR") {
            config.templates_dir = expand_path(&dir);
        }

        if let Ok(dir) = env::var("DECKFORGE_ASSETS_DIR") {
            config.assets_dir = expand_path(&dir);
        }

        if let Ok(dir) = env::var("DECKFORGE_DOWNLOADS_DIR") {
            config.downloads_dir = expand_path(&dir);
        }

        Ok(config)
    }
}

/// Expand `~` in user-supplied paths.
fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}
