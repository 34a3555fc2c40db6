//! Quality-assurance backends.
//!
//! A QA backend receives serialized review content plus subject metadata and
//! returns a verdict. Two implementations ship: a local structural rule engine
//! (default) and an HTTP client for a remote QA service.

use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod http;
pub mod rules;

pub use http::HttpQaBackend;
pub use rules::{RuleQaBackend, RuleSet};

/// Content type tag sent with broker reviews.
pub const REVIEW_CONTENT_TYPE: &str = "broker_review";

/// Pass/fail verdict. `issues` is empty iff `is_valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaVerdict {
    pub is_valid: bool,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl QaVerdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            issues: Vec::new(),
        }
    }

    pub fn invalid(issues: Vec<String>) -> Self {
        Self {
            is_valid: false,
            issues,
        }
        .normalized()
    }

    /// Restore the empty-iff-valid invariant on a verdict from an untrusted
    /// backend: reported issues always mean invalid, and an invalid verdict
    /// always carries at least one issue.
    pub fn normalized(mut self) -> Self {
        self.issues.retain(|issue| !issue.trim().is_empty());
        if !self.issues.is_empty() {
            self.is_valid = false;
        } else if !self.is_valid {
            self.issues
                .push("content rejected without a stated reason".to_string());
        }
        self
    }
}

/// Subject metadata forwarded to the QA backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaMetadata {
    pub subject_id: String,
    pub subject_name: String,
    pub category: String,
    pub region: String,
}

/// QA backend client trait
#[async_trait]
pub trait QaBackend: Send + Sync {
    async fn validate(
        &self,
        content: &str,
        content_type: &str,
        metadata: &QaMetadata,
    ) -> Result<QaVerdict, PipelineError>;

    fn backend_name(&self) -> &str;
}

/// Tagged QA backend selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QaBackendConfig {
    Rules {
        #[serde(default)]
        rules: RuleSet,
    },
    Http {
        endpoint: String,
        #[serde(default)]
        api_key: Option<String>,
    },
}

impl Default for QaBackendConfig {
    fn default() -> Self {
        QaBackendConfig::Rules {
            rules: RuleSet::default(),
        }
    }
}

impl QaBackendConfig {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            QaBackendConfig::Rules { rules } => rules.validate(),
            QaBackendConfig::Http { endpoint, .. } => {
                if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
                    Ok(())
                } else {
                    Err(format!("QA endpoint must be an http(s) URL, got '{}'", endpoint))
                }
            }
        }
    }
}

pub struct QaBackendFactory;

impl QaBackendFactory {
    pub fn create(config: &QaBackendConfig) -> Result<Box<dyn QaBackend>, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        match config {
            QaBackendConfig::Rules { rules } => Ok(Box::new(RuleQaBackend::new(rules.clone()))),
            QaBackendConfig::Http { endpoint, api_key } => Ok(Box::new(HttpQaBackend::new(
                endpoint.clone(),
                api_key.clone(),
            )?)),
        }
    }
}
