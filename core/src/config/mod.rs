//! Configuration management
//!
//! Configuration is read from TOML (`examiner.toml` in the current directory,
//! then `~/.config/examiner/examiner.toml`) and can be overridden from the
//! environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "examiner.toml";

/// Error type for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error occurred while reading/writing config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// TOML serialization error
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Reasoning service providers
///
/// Every provider except `Google` speaks the OpenAI-compatible chat API.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Default URL: https://api.openai.com/v1
    #[default]
    Openai,
    /// Google Gemini API
    ///
    /// Default URL: https://generativelanguage.googleapis.com
    Google,
    /// Local models, no API key required
    ///
    /// Default URL: http://localhost:11434/v1
    Ollama,
    /// Default URL: https://openrouter.ai/api/v1
    Openrouter,
    /// User-specified URL; requires `base_url`
    Custom,
}

impl Provider {
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Provider::Openai => Some("https://api.openai.com/v1"),
            Provider::Google => Some("https://generativelanguage.googleapis.com"),
            Provider::Ollama => Some("http://localhost:11434/v1"),
            Provider::Openrouter => Some("https://openrouter.ai/api/v1"),
            Provider::Custom => None,
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::Openai),
            "google" | "gemini" => Ok(Provider::Google),
            "ollama" => Ok(Provider::Ollama),
            "openrouter" => Ok(Provider::Openrouter),
            "custom" => Ok(Provider::Custom),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Openai => write!(f, "OpenAI"),
            Provider::Google => write!(f, "Google Generative AI"),
            Provider::Ollama => write!(f, "Ollama"),
            Provider::Openrouter => write!(f, "OpenRouter"),
            Provider::Custom => write!(f, "Custom"),
        }
    }
}

/// Connection settings for the reasoning service
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EndpointConfig {
    #[serde(default)]
    pub provider: Provider,

    /// Model identifier, e.g. "gpt-4o-mini" or "gemini-2.0-flash"
    #[serde(default = "default_model")]
    pub model: String,

    /// Overrides the provider's default URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout; no timeout when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: default_model(),
            base_url: None,
            api_key: None,
            timeout_secs: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Append the debug log to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Root configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ExaminerConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExaminerConfig {
    /// Load configuration from the first file found:
    /// 1. `./examiner.toml`
    /// 2. `~/.config/examiner/examiner.toml`
    ///
    /// Falls back to defaults when neither exists.
    pub fn load() -> Result<Self, ConfigError> {
        let current_dir_path = Path::new(CONFIG_FILE_NAME);
        if current_dir_path.exists() {
            return Self::load_from(current_dir_path);
        }

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                return Self::load_from(&user_config_path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: ExaminerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write the configuration as pretty TOML, creating parent directories.
    /// Defaults to the user config location.
    pub fn save(&self, path: Option<&Path>) -> Result<(), ConfigError> {
        let target_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::user_config_path().ok_or_else(|| {
                ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine home directory",
                ))
            })?,
        };

        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&target_path, toml_string)?;

        Ok(())
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("examiner").join(CONFIG_FILE_NAME))
    }

    /// Apply environment variable overrides
    ///
    /// - `EXAMINER_PROVIDER` → `endpoint.provider`
    /// - `EXAMINER_MODEL` → `endpoint.model`
    /// - `EXAMINER_API_KEY` → `endpoint.api_key`
    /// - `EXAMINER_BASE_URL` → `endpoint.base_url`
    /// - `EXAMINER_TIMEOUT_SECS` → `endpoint.timeout_secs`
    ///
    /// Empty values are ignored; invalid values are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(provider_str) = non_empty_var("EXAMINER_PROVIDER") {
            match provider_str.parse::<Provider>() {
                Ok(provider) => self.endpoint.provider = provider,
                Err(_) => crate::warn_log!("Invalid EXAMINER_PROVIDER value: {}", provider_str),
            }
        }

        if let Some(model) = non_empty_var("EXAMINER_MODEL") {
            self.endpoint.model = model;
        }

        if let Some(api_key) = non_empty_var("EXAMINER_API_KEY") {
            self.endpoint.api_key = Some(api_key);
        }

        if let Some(base_url) = non_empty_var("EXAMINER_BASE_URL") {
            self.endpoint.base_url = Some(base_url);
        }

        if let Some(timeout_str) = non_empty_var("EXAMINER_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(secs) => self.endpoint.timeout_secs = Some(secs),
                Err(_) => crate::warn_log!("Invalid EXAMINER_TIMEOUT_SECS value: {}", timeout_str),
            }
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
