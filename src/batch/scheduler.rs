//! Batch scheduler: runs a batch plan chunk by chunk against a subject runner.
//! Chunks are hard barriers; subjects inside a chunk overlap freely.

use crate::batch::plan::{BatchPlan, ChunkSummary, RunReport, RunStats};
use crate::catalog::Entity;
use crate::retry::{PipelineOutcome, Provenance, RetryController, RetryState};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{error, info};

#[allow(async_fn_in_trait)]
pub trait SubjectRunner: Send + Sync {
    /// Drive one subject to a terminal outcome.
    async fn run_subject(&self, entity: &Entity) -> PipelineOutcome;

    /// Outcome used when `run_subject` panicked.
    fn fallback_outcome(&self, entity: &Entity, reason: String) -> PipelineOutcome;
}

impl SubjectRunner for RetryController {
    async fn run_subject(&self, entity: &Entity) -> PipelineOutcome {
        self.run(entity).await
    }

    fn fallback_outcome(&self, entity: &Entity, reason: String) -> PipelineOutcome {
        let mut progress = self.take_progress(&entity.id).unwrap_or_default();
        progress.transitions.push(RetryState::Fallback);
        let reason = format!(
            "{} (after {} generation call(s))",
            reason, progress.attempts
        );
        PipelineOutcome::fallback(
            entity,
            self.fallback_content(entity),
            progress.attempts,
            progress.transitions,
            reason,
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BatchScheduler;

impl BatchScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Execute every chunk of `plan`, pausing `plan.delay` between chunks.
    ///
    /// The returned report holds exactly one outcome per subject in the plan.
    pub async fn execute<R: SubjectRunner>(&self, runner: &R, plan: BatchPlan) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport {
            stats: RunStats {
                extracted: plan.total_subjects,
                chunks: plan.chunks.len(),
                ..RunStats::default()
            },
            ..RunReport::default()
        };

        info!(
            total_subjects = plan.total_subjects,
            chunks = plan.chunks.len(),
            delay_ms = plan.delay.as_millis(),
            "Batch started"
        );

        let chunk_count = plan.chunks.len();
        for (chunk_index, chunk) in plan.chunks.iter().enumerate() {
            info!(
                chunk_index,
                total_count = chunk.len(),
                "Chunk started"
            );

            let mut futures = FuturesUnordered::new();
            for entity in chunk {
                futures.push(async move {
                    let outcome = AssertUnwindSafe(runner.run_subject(entity))
                        .catch_unwind()
                        .await;
                    (entity, outcome)
                });
            }

            let mut summary = ChunkSummary {
                chunk_index,
                total_count: chunk.len(),
                fallback_count: 0,
                panicked_count: 0,
            };
            while let Some((entity, outcome)) = futures.next().await {
                let outcome = match outcome {
                    Ok(outcome) => outcome,
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        error!(
                            subject_id = %entity.id,
                            chunk_index,
                            panic = %message,
                            "Subject pipeline panicked; isolating"
                        );
                        summary.panicked_count += 1;
                        runner.fallback_outcome(entity, format!("pipeline panicked: {}", message))
                    }
                };
                if outcome.provenance == Provenance::Fallback {
                    summary.fallback_count += 1;
                }
                report.stats.record(outcome.provenance);
                report.outcomes.insert(entity.id.clone(), outcome);
            }

            info!(
                chunk_index,
                total_count = summary.total_count,
                fallback_count = summary.fallback_count,
                "Chunk completed"
            );
            report.chunk_summaries.push(summary);

            if chunk_index + 1 < chunk_count {
                tokio::time::sleep(plan.delay).await;
                report.stats.pacing_delays += 1;
            }
        }

        info!(
            processed = report.stats.processed,
            fallback_count = report.stats.fallback_count,
            pacing_delays = report.stats.pacing_delays,
            duration_ms = start.elapsed().as_millis(),
            "Batch completed"
        );
        report
    }
}
