//! Configuration loading, validation, and management for groundcrew.
//!
//! Loads configuration from `~/.groundcrew/config.toml` with environment
//! variable overrides. Every field has a default, so a missing file is
//! not an error — the assistant starts with a local Ollama model, the
//! encyclopedia search backend, and built-in prompts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The root configuration structure.
///
/// Maps directly to `~/.groundcrew/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language model backend settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Search / retrieval settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Prompt template overrides
    #[serde(default)]
    pub prompts: PromptsConfig,

    /// Reasoning-loop limits
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which backend to use: "ollama" or "openai"
    #[serde(default = "default_model_backend")]
    pub backend: String,

    /// Base URL of the backend
    #[serde(default = "default_model_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model_name")]
    pub model: String,

    /// API key for hosted backends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Client-side request timeout in seconds
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

fn default_model_backend() -> String {
    "ollama".into()
}
fn default_model_base_url() -> String {
    "http://localhost:11434".into()
}
fn default_model_name() -> String {
    "llama3".into()
}
fn default_model_timeout() -> u64 {
    120
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: default_model_backend(),
            base_url: default_model_base_url(),
            model: default_model_name(),
            api_key: None,
            timeout_secs: default_model_timeout(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Key for the external search API. When absent the retriever uses
    /// the encyclopedia backend only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Search API endpoint
    #[serde(default = "default_search_api_url")]
    pub api_url: String,

    /// Encyclopedia API endpoint
    #[serde(default = "default_encyclopedia_api_url")]
    pub encyclopedia_api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

fn default_search_api_url() -> String {
    "https://api.tavily.com/search".into()
}
fn default_encyclopedia_api_url() -> String {
    "https://en.wikipedia.org/w/api.php".into()
}
fn default_search_timeout() -> u64 {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_search_api_url(),
            encyclopedia_api_url: default_encyclopedia_api_url(),
            timeout_secs: default_search_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsConfig {
    /// Directory holding `<name>.txt` template overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum reasoning/tool-call iterations per turn
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Malformed reasoning steps tolerated before giving up
    #[serde(default = "default_max_parse_failures")]
    pub max_parse_failures: u32,
}

fn default_max_iterations() -> u32 {
    5
}
fn default_max_parse_failures() -> u32 {
    3
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_parse_failures: default_max_parse_failures(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_host")]
    pub host: String,

    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}
fn default_gateway_port() -> u16 {
    5000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("backend", &self.backend)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("encyclopedia_api_url", &self.encyclopedia_api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// The default config file location: `~/.groundcrew/config.toml`.
    pub fn default_path() -> PathBuf {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(".groundcrew").join("config.toml")
    }

    /// Load from the default location, tolerating a missing file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Load from an explicit path, tolerating a missing file, then apply
    /// environment overrides and validate.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&text)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("GROUNDCREW_MODEL") {
            self.model.model = v;
        }
        if let Ok(v) = std::env::var("GROUNDCREW_MODEL_URL") {
            self.model.base_url = v;
        }
        if let Ok(v) = std::env::var("GROUNDCREW_MODEL_API_KEY") {
            self.model.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("GROUNDCREW_SEARCH_API_KEY") {
            self.search.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("GROUNDCREW_PROMPTS_DIR") {
            self.prompts.dir = Some(PathBuf::from(v));
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.model.backend.as_str() {
            "ollama" | "openai" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown model backend '{other}' (expected \"ollama\" or \"openai\")"
                )));
            }
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "agent.max_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
