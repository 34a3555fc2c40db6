//! Generation Backend Abstraction
//!
//! Capability interface for turning a prompt plus sampling parameters into text.
//! Concrete backends (OpenAI-compatible, Anthropic, Ollama) are selected once at
//! construction time from a tagged configuration; orchestration code only sees
//! `dyn GenerationBackend`.

use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod http;

pub use http::{AnthropicClient, OpenAiCompatibleClient};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// System instruction sent alongside every review prompt.
pub const SYSTEM_PROMPT: &str = "You are an experienced financial journalist who writes \
    accurate, balanced broker reviews. Respond with a single JSON object and nothing else.";

/// Sampling parameters for one generation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// One generation call. Built once per attempt and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub subject_id: String,
    pub prompt: String,
    pub model: String,
    pub sampling: SamplingParams,
    /// 1 for the first attempt, 2 for the feedback regeneration
    pub attempt: u32,
}

/// Generation backend client trait
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate raw text for a request. Transport, quota and timeout failures
    /// are reported as errors; the text itself is returned unparsed.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, PipelineError>;

    /// Short backend name for diagnostics
    fn backend_name(&self) -> &str;
}

/// Tagged backend selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum GenerationBackendConfig {
    OpenAi {
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_openai_key_env")]
        api_key_env: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
    },
    Anthropic {
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_anthropic_key_env")]
        api_key_env: Option<String>,
    },
    Ollama {
        #[serde(default)]
        base_url: Option<String>,
    },
}

fn default_openai_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}

fn default_anthropic_key_env() -> Option<String> {
    Some("ANTHROPIC_API_KEY".to_string())
}

impl Default for GenerationBackendConfig {
    fn default() -> Self {
        GenerationBackendConfig::Anthropic {
            api_key: None,
            api_key_env: default_anthropic_key_env(),
        }
    }
}

impl GenerationBackendConfig {
    pub fn provider_slug(&self) -> &'static str {
        match self {
            GenerationBackendConfig::OpenAi { .. } => "openai",
            GenerationBackendConfig::Anthropic { .. } => "anthropic",
            GenerationBackendConfig::Ollama { .. } => "ollama",
        }
    }

    /// Structural validation (no network, no env lookups).
    pub fn validate(&self) -> Result<(), String> {
        let base_url = match self {
            GenerationBackendConfig::OpenAi { base_url, .. }
            | GenerationBackendConfig::Ollama { base_url } => base_url.as_deref(),
            GenerationBackendConfig::Anthropic { .. } => None,
        };
        if let Some(url) = base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("base_url must be an http(s) URL, got '{}'", url));
            }
        }
        Ok(())
    }
}

/// Resolve an API key from an inline value or a named environment variable.
fn resolve_api_key(
    provider: &str,
    api_key: &Option<String>,
    api_key_env: &Option<String>,
) -> Result<String, PipelineError> {
    if let Some(key) = api_key.as_ref().filter(|k| !k.trim().is_empty()) {
        return Ok(key.clone());
    }
    if let Some(var) = api_key_env {
        if let Ok(key) = std::env::var(var) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }
        return Err(PipelineError::Config(format!(
            "No API key for {} backend: set `api_key` or the {} environment variable",
            provider, var
        )));
    }
    Err(PipelineError::Config(format!(
        "No API key configured for {} backend",
        provider
    )))
}

/// Backend factory for creating generation clients
pub struct BackendFactory;

impl BackendFactory {
    pub fn create(
        config: &GenerationBackendConfig,
    ) -> Result<Box<dyn GenerationBackend>, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        match config {
            GenerationBackendConfig::OpenAi {
                api_key,
                api_key_env,
                base_url,
            } => {
                let key = resolve_api_key("openai", api_key, api_key_env)?;
                Ok(Box::new(OpenAiCompatibleClient::new(
                    "openai",
                    base_url
                        .clone()
                        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                    Some(key),
                )?))
            }
            GenerationBackendConfig::Anthropic {
                api_key,
                api_key_env,
            } => {
                let key = resolve_api_key("anthropic", api_key, api_key_env)?;
                Ok(Box::new(AnthropicClient::new(key)?))
            }
            GenerationBackendConfig::Ollama { base_url } => {
                Ok(Box::new(OpenAiCompatibleClient::new(
                    "ollama",
                    base_url
                        .clone()
                        .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
                    None,
                )?))
            }
        }
    }
}
