use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::llm::groq::{DEFAULT_MODEL, GROQ_API_URL};

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_READING_LEVEL: &str = "elementary school";
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 12_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Values read from `config.toml`. Every field is optional.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub default_model: Option<String>,
    pub reading_level: Option<String>,
    pub max_chunk_chars: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub api_url: Option<String>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().context("Could not determine config directory")?;
        Ok(base.join("docsum"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Result<Self> {
        let Ok(path) = Self::config_path() else {
            tracing::debug!("no config directory on this platform, using defaults");
            return Ok(Config::default());
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            Self::parse(&content).with_context(|| format!("Failed to parse config file {:?}", path))
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the Groq API key, using the environment value as fallback
    pub fn api_key(&self, env_value: Option<String>) -> Option<String> {
        self.groq_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env_value.filter(|k| !k.trim().is_empty()))
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub reading_level: Option<String>,
    pub max_chunk_chars: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub api_url: Option<String>,
}

/// Fully resolved run settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: String,
    pub reading_level: String,
    pub max_chunk_chars: usize,
    pub timeout: Duration,
    pub api_url: String,
}

impl Settings {
    pub fn resolve(config: &Config, overrides: Overrides) -> Self {
        Self {
            model: overrides
                .model
                .or_else(|| config.default_model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            reading_level: overrides
                .reading_level
                .or_else(|| config.reading_level.clone())
                .filter(|level| !level.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_READING_LEVEL.to_string()),
            max_chunk_chars: overrides
                .max_chunk_chars
                .or(config.max_chunk_chars)
                .unwrap_or(DEFAULT_MAX_CHUNK_CHARS),
            timeout: Duration::from_secs(
                overrides
                    .timeout_secs
                    .or(config.request_timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            api_url: overrides
                .api_url
                .or_else(|| config.api_url.clone())
                .unwrap_or_else(|| GROQ_API_URL.to_string()),
        }
    }
}
