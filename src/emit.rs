//! Artifact emission: one artifact per outcome, then a single index.

use crate::batch::{RunReport, RunStats};
use crate::catalog::{Category, Region};
use crate::error::PipelineError;
use crate::retry::{PipelineOutcome, Provenance};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const INDEX_FILE_NAME: &str = "index.json";

/// Paths written by one emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
    pub artifacts: Vec<PathBuf>,
    pub index: PathBuf,
}

pub trait ArtifactEmitter: Send + Sync {
    /// Write every outcome in `report`, then the index. The index must not be
    /// written unless every per-subject artifact was.
    fn emit(&self, report: &RunReport) -> Result<EmitSummary, PipelineError>;
}

#[derive(Debug, Serialize)]
struct IndexEntry<'a> {
    id: &'a str,
    name: &'a str,
    category: Category,
    region: Region,
    provenance: Provenance,
    attempts: u32,
    overall_rating: f64,
    artifact: String,
}

#[derive(Debug, Serialize)]
struct IndexDocument<'a> {
    generated_at: String,
    stats: &'a RunStats,
    subjects: Vec<IndexEntry<'a>>,
}

fn artifact_file_name(subject_id: &str) -> String {
    format!("{}.json", subject_id)
}

/// Writes `<dir>/<id>.json` for each outcome and `<dir>/index.json` last.
pub struct JsonArtifactEmitter {
    directory: PathBuf,
}

impl JsonArtifactEmitter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), PipelineError> {
        let body = serde_json::to_string_pretty(value)?;
        std::fs::write(path, body).map_err(|e| {
            PipelineError::Emit(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    fn write_outcome(&self, outcome: &PipelineOutcome) -> Result<PathBuf, PipelineError> {
        let path = self.directory.join(artifact_file_name(&outcome.subject_id));
        self.write_json(&path, outcome)?;
        debug!(
            subject_id = %outcome.subject_id,
            path = %path.display(),
            "Artifact written"
        );
        Ok(path)
    }
}

impl ArtifactEmitter for JsonArtifactEmitter {
    fn emit(&self, report: &RunReport) -> Result<EmitSummary, PipelineError> {
        std::fs::create_dir_all(&self.directory).map_err(|e| {
            PipelineError::Emit(format!(
                "Failed to create output directory {}: {}",
                self.directory.display(),
                e
            ))
        })?;

        let artifacts = report
            .outcomes
            .values()
            .map(|outcome| self.write_outcome(outcome))
            .collect::<Result<Vec<_>, _>>()?;

        let index = IndexDocument {
            generated_at: chrono::Utc::now().to_rfc3339(),
            stats: &report.stats,
            subjects: report
                .outcomes
                .values()
                .map(|outcome| IndexEntry {
                    id: &outcome.subject_id,
                    name: &outcome.subject.name,
                    category: outcome.subject.category,
                    region: outcome.subject.region,
                    provenance: outcome.provenance,
                    attempts: outcome.attempts,
                    overall_rating: outcome.content.ratings.overall,
                    artifact: artifact_file_name(&outcome.subject_id),
                })
                .collect(),
        };
        let index_path = self.directory.join(INDEX_FILE_NAME);
        self.write_json(&index_path, &index)?;

        info!(
            artifacts = artifacts.len(),
            index = %index_path.display(),
            "Artifacts emitted"
        );
        Ok(EmitSummary {
            artifacts,
            index: index_path,
        })
    }
}
