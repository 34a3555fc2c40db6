//! Configuration System
//!
//! Layered pipeline configuration: merge-policy defaults, the global user
//! file, workspace files, then `BROKERPRESS__SECTION__KEY` environment
//! overrides. Every section is optional and falls back to its defaults.

use crate::batch::BatchSettings;
use crate::catalog::DEFAULT_IMAGE_EXTENSIONS;
use crate::generation::GenerationSettings;
use crate::logging::LoggingConfig;
use crate::provider::GenerationBackendConfig;
use crate::qa::QaBackendConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::environment::{ENV_PREFIX, ENV_SEPARATOR};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub generation: GenerationSettings,

    #[serde(default)]
    pub batch: BatchSettings,

    /// Generation backend selection and credentials
    #[serde(default)]
    pub backend: GenerationBackendConfig,

    #[serde(default)]
    pub qa: QaBackendConfig,

    #[serde(default)]
    pub assets: AssetSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where source assets live and which extensions count as assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub directory: PathBuf,
    pub extensions: Vec<String>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("assets"),
            extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl AssetSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.directory.as_os_str().is_empty() {
            return Err("Asset directory cannot be empty".to_string());
        }
        if self.extensions.is_empty() {
            return Err("At least one asset extension is required".to_string());
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(format!(
                "Invalid asset extension '{}' (use bare names like 'png')",
                bad
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("out"),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Generation(String),
    Batch(String),
    Backend(String),
    Qa(String),
    Assets(String),
    Output(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Generation(msg) => write!(f, "Generation: {}", msg),
            ValidationError::Batch(msg) => write!(f, "Batch: {}", msg),
            ValidationError::Backend(msg) => write!(f, "Backend: {}", msg),
            ValidationError::Qa(msg) => write!(f, "QA: {}", msg),
            ValidationError::Assets(msg) => write!(f, "Assets: {}", msg),
            ValidationError::Output(msg) => write!(f, "Output: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl PipelineConfig {
    /// Validate the entire configuration, collecting every error
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.generation.validate() {
            errors.push(ValidationError::Generation(e));
        }
        if let Err(e) = self.batch.validate() {
            errors.push(ValidationError::Batch(e));
        }
        if let Err(e) = self.backend.validate() {
            errors.push(ValidationError::Backend(e));
        }
        if let Err(e) = self.qa.validate() {
            errors.push(ValidationError::Qa(e));
        }
        if let Err(e) = self.assets.validate() {
            errors.push(ValidationError::Assets(e));
        }
        if self.output.directory.as_os_str().is_empty() {
            errors.push(ValidationError::Output(
                "Output directory cannot be empty".to_string(),
            ));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
