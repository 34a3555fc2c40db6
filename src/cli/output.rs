//! CLI output: error mapping from pipeline errors to stable CLI surface.

use crate::error::PipelineError;

/// Map pipeline errors to a string for CLI output.
pub fn map_error(e: &PipelineError) -> String {
    match e {
        PipelineError::Config(msg) => format!("Configuration error: {}", msg),
        PipelineError::AuthFailed(_) => format!("{} (check the backend API key)", e),
        _ => e.to_string(),
    }
}
