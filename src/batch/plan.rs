use crate::catalog::Entity;
use crate::error::PipelineError;
use crate::retry::{PipelineOutcome, Provenance};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

/// Concurrency and pacing policy for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Subjects processed concurrently per chunk
    pub chunk_size: usize,
    /// Pause between chunks, in milliseconds
    pub delay_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            chunk_size: 3,
            delay_ms: 2000,
        }
    }
}

impl BatchSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// The catalog partitioned into consecutive chunks.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub chunks: Vec<Vec<Entity>>,
    pub delay: Duration,
    pub total_subjects: usize,
}

impl BatchPlan {
    pub fn new(entities: &[Entity], settings: &BatchSettings) -> Result<Self, PipelineError> {
        settings.validate().map_err(PipelineError::Config)?;

        let mut seen = HashSet::new();
        for entity in entities {
            if !seen.insert(entity.id.as_str()) {
                return Err(PipelineError::Config(format!(
                    "Batch contains duplicate subject id: {}",
                    entity.id
                )));
            }
        }

        Ok(Self {
            chunks: entities
                .chunks(settings.chunk_size)
                .map(<[Entity]>::to_vec)
                .collect(),
            delay: settings.delay(),
            total_subjects: entities.len(),
        })
    }

    /// Delays the scheduler will take: one between each pair of chunks.
    pub fn expected_delays(&self) -> usize {
        self.chunks.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSummary {
    pub chunk_index: usize,
    pub total_count: usize,
    pub fallback_count: usize,
    pub panicked_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub extracted: usize,
    pub processed: usize,
    pub skipped: usize,
    pub fallback_count: usize,
    pub generated_count: usize,
    pub regenerated_count: usize,
    pub chunks: usize,
    pub pacing_delays: usize,
}

impl RunStats {
    pub(crate) fn record(&mut self, provenance: Provenance) {
        self.processed += 1;
        match provenance {
            Provenance::Generated => self.generated_count += 1,
            Provenance::Regenerated => self.regenerated_count += 1,
            Provenance::Fallback => self.fallback_count += 1,
        }
    }
}

/// Result of one run, threaded through the scheduler and returned at the end.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub outcomes: BTreeMap<String, PipelineOutcome>,
    pub stats: RunStats,
    pub chunk_summaries: Vec<ChunkSummary>,
}

impl RunReport {
    pub fn outcome(&self, subject_id: &str) -> Option<&PipelineOutcome> {
        self.outcomes.get(subject_id)
    }
}
