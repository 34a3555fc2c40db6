//! Error types for the broker review generation pipeline.

use thiserror::Error;

/// Pipeline-level errors
///
/// Per-subject failures (transport, parse, QA infrastructure) are produced by
/// collaborators and absorbed by the retry controller; they never abort a run.
/// Only configuration, I/O and emission errors surface to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Backend transport error: {0}")]
    Transport(String),

    #[error("Backend rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Backend authentication failed: {0}")]
    AuthFailed(String),

    #[error("Backend model not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to parse generated content: {0}")]
    Parse(String),

    #[error("QA backend error: {0}")]
    QaInfrastructure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Artifact emission failed: {0}")]
    Emit(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// True for failures of the generation backend itself (unreachable,
    /// throttled, rejected credentials), as opposed to unusable output.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PipelineError::Transport(_)
                | PipelineError::RateLimited(_)
                | PipelineError::AuthFailed(_)
                | PipelineError::ModelNotFound(_)
        )
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}
