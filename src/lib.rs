//! brokerpress: batch broker review generation
//!
//! Turns a directory of broker image assets into a catalog of subjects, then
//! generates structured review content for each one through a generative
//! backend, gates it through a QA backend with a single feedback-guided
//! retry, and falls back to deterministic content so every subject ends with
//! exactly one emitted outcome.

pub mod batch;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod content;
pub mod emit;
pub mod error;
pub mod fallback;
pub mod generation;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod qa;
pub mod retry;
pub mod validation;

pub use batch::{BatchScheduler, BatchSettings, RunReport, RunStats};
pub use catalog::{Category, Entity, EntityExtractor, ExtractionReport, Region};
pub use config::{ConfigLoader, PipelineConfig};
pub use content::StructuredContent;
pub use emit::{ArtifactEmitter, JsonArtifactEmitter};
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use retry::{PipelineOutcome, Provenance, RetryController, RetryState};
