//! Generation orchestrator: prompt → backend call → parsed content.

use super::parse::parse_structured_content;
use super::prompt::{feedback_prompt, review_prompt, PromptTemplate};
use crate::catalog::Entity;
use crate::content::StructuredContent;
use crate::error::PipelineError;
use crate::provider::{GenerationBackend, GenerationRequest, SamplingParams};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Model and sampling settings for both generation attempts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub model: String,
    /// Model for the feedback regeneration; `None` reuses `model`
    pub regeneration_model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Lower than `temperature` to reduce variance on the retry
    pub regeneration_temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "claude-3-5-sonnet-latest".to_string(),
            regeneration_model: None,
            max_tokens: 4096,
            temperature: 0.7,
            regeneration_temperature: 0.5,
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be positive".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} outside 0.0-2.0", self.temperature));
        }
        // Strictly cooler on the retry; only a fully greedy run may repeat 0.0.
        let cooler = self.regeneration_temperature < self.temperature
            || (self.temperature == 0.0 && self.regeneration_temperature == 0.0);
        if self.regeneration_temperature < 0.0 || !cooler {
            return Err(format!(
                "regeneration_temperature {} must be at least 0.0 and below temperature {}",
                self.regeneration_temperature, self.temperature
            ));
        }
        Ok(())
    }
}

/// Raw backend output for one attempt, before parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGenerationResult {
    pub subject_id: String,
    pub text: String,
    pub attempt: u32,
}

/// Builds prompts, makes the single backend call per attempt, and parses the reply.
pub struct GenerationOrchestrator {
    backend: Arc<dyn GenerationBackend>,
    template: Arc<PromptTemplate>,
    settings: GenerationSettings,
    today: NaiveDate,
}

impl GenerationOrchestrator {
    pub fn new(backend: Arc<dyn GenerationBackend>, settings: GenerationSettings) -> Self {
        Self {
            backend,
            template: Arc::new(review_prompt),
            settings,
            today: Utc::now().date_naive(),
        }
    }

    /// Replace the prompt template.
    pub fn with_template(mut self, template: Arc<PromptTemplate>) -> Self {
        self.template = template;
        self
    }

    /// Pin the date stamped into `last_updated`.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// First-attempt request for a subject.
    pub fn initial_request(&self, entity: &Entity) -> GenerationRequest {
        GenerationRequest {
            subject_id: entity.id.clone(),
            prompt: (self.template)(entity),
            model: self.settings.model.clone(),
            sampling: SamplingParams {
                max_tokens: self.settings.max_tokens,
                temperature: self.settings.temperature,
            },
            attempt: 1,
        }
    }

    /// Feedback regeneration request: the original prompt plus the QA issues,
    /// at the lower regeneration temperature and on the secondary model if set.
    pub fn feedback_request(
        &self,
        original: &GenerationRequest,
        issues: &[String],
    ) -> GenerationRequest {
        GenerationRequest {
            subject_id: original.subject_id.clone(),
            prompt: feedback_prompt(&original.prompt, issues),
            model: self
                .settings
                .regeneration_model
                .clone()
                .unwrap_or_else(|| original.model.clone()),
            sampling: SamplingParams {
                max_tokens: original.sampling.max_tokens,
                temperature: self.settings.regeneration_temperature,
            },
            attempt: original.attempt + 1,
        }
    }

    /// Invoke the backend once and return its unparsed text.
    pub async fn invoke(
        &self,
        request: &GenerationRequest,
    ) -> Result<RawGenerationResult, PipelineError> {
        let start = Instant::now();
        info!(
            subject_id = %request.subject_id,
            backend = self.backend.backend_name(),
            model = %request.model,
            attempt = request.attempt,
            temperature = request.sampling.temperature,
            "Generation request sent"
        );

        let text = self.backend.generate(request).await.map_err(|e| {
            warn!(
                subject_id = %request.subject_id,
                attempt = request.attempt,
                duration_ms = start.elapsed().as_millis(),
                error = %e,
                "Generation request failed"
            );
            e
        })?;

        debug!(
            subject_id = %request.subject_id,
            attempt = request.attempt,
            duration_ms = start.elapsed().as_millis(),
            response_chars = text.chars().count(),
            "Generation response received"
        );
        Ok(RawGenerationResult {
            subject_id: request.subject_id.clone(),
            text,
            attempt: request.attempt,
        })
    }

    /// Invoke and parse. Transport errors and parse errors are both returned
    /// as `Err`; callers distinguish them with [`PipelineError::is_transport`].
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<StructuredContent, PipelineError> {
        let raw = self.invoke(request).await?;
        parse_structured_content(&raw.text, self.today).map_err(|e| {
            warn!(
                subject_id = %raw.subject_id,
                attempt = raw.attempt,
                error = %e,
                "Generated content could not be parsed"
            );
            e
        })
    }
}
