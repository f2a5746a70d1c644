//! TOML-based configuration for Agora
//!
//! Loaded once at process start from `agora.toml`. The worker roster and its
//! instruction templates are compiled in; this file only tunes the server,
//! the model provider, the run budget and the source endpoints.

use crate::llm::Provider;
use crate::tools::arxiv::DEFAULT_ARXIV_URL;
use crate::tools::hackernews::DEFAULT_HACKERNEWS_URL;
use crate::types::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure loaded from agora.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgoraConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub research: ResearchConfig,

    #[serde(default)]
    pub sources: SourcesConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LlmConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
    },
    OpenAI {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        model: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig::Ollama {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
        }
    }
}

impl LlmConfig {
    /// Resolve secrets from the environment and build a provider
    pub fn to_provider(&self) -> Result<Provider, AppError> {
        match self {
            LlmConfig::Ollama { base_url, model } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
            }),
            LlmConfig::OpenAI {
                api_key_env,
                api_base,
                model,
            } => {
                let api_key = std::env::var(api_key_env)
                    .map_err(|_| ConfigError::MissingEnvVar(api_key_env.clone()))?;
                Ok(Provider::OpenAI {
                    api_key,
                    api_base: api_base.clone(),
                    model: model.clone(),
                })
            }
        }
    }
}

// ============= Research Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerKind {
    /// Deterministic line extraction, no model calls
    #[default]
    Extractive,
    /// Model-written summaries, clamped to the budget
    Llm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Deadline for one whole research run
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Max characters per worker summary in the shared context
    #[serde(default = "default_summary_budget")]
    pub summary_budget: usize,

    /// Max workers researching at once (1 = sequential)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    #[serde(default = "default_results_per_source")]
    pub results_per_source: usize,

    #[serde(default)]
    pub summarizer: SummarizerKind,
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_summary_budget() -> usize {
    1200
}

fn default_max_concurrency() -> usize {
    4
}

fn default_results_per_source() -> usize {
    10
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            summary_budget: default_summary_budget(),
            max_concurrency: default_max_concurrency(),
            results_per_source: default_results_per_source(),
            summarizer: SummarizerKind::default(),
        }
    }
}

impl ResearchConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============= Source Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_hackernews_url")]
    pub hackernews_url: String,

    #[serde(default = "default_arxiv_url")]
    pub arxiv_url: String,
}

fn default_hackernews_url() -> String {
    DEFAULT_HACKERNEWS_URL.to_string()
}

fn default_arxiv_url() -> String {
    DEFAULT_ARXIV_URL.to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            hackernews_url: default_hackernews_url(),
            arxiv_url: default_arxiv_url(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AgoraConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AgoraConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to built-in defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound(missing)) => {
                tracing::info!(path = %missing.display(), "no configuration file, using defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// Validate ranges and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.research.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "research.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.research.summary_budget == 0 {
            return Err(ConfigError::ValidationError(
                "research.summary_budget must be greater than zero".to_string(),
            ));
        }
        if self.research.max_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "research.max_concurrency must be greater than zero".to_string(),
            ));
        }
        if self.research.results_per_source == 0 {
            return Err(ConfigError::ValidationError(
                "research.results_per_source must be greater than zero".to_string(),
            ));
        }

        if let LlmConfig::OpenAI { api_key_env, .. } = &self.llm {
            std::env::var(api_key_env)
                .map_err(|_| ConfigError::MissingEnvVar(api_key_env.clone()))?;
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
