//! Per-subject retry controller.
//!
//! Composes the generation orchestrator and the validation gate into a
//! bounded state machine: one generation, one validation, and at most one
//! feedback-guided regeneration. Every path ends in `Done` or `Fallback`, and
//! both produce a [`PipelineOutcome`].

use crate::catalog::Entity;
use crate::content::StructuredContent;
use crate::fallback;
use crate::generation::GenerationOrchestrator;
use crate::validation::ValidationGate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryState {
    Generating,
    Validating,
    Regenerating,
    RevalidatingAfterFeedback,
    Fallback,
    Done,
}

impl RetryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryState::Generating => "generating",
            RetryState::Validating => "validating",
            RetryState::Regenerating => "regenerating",
            RetryState::RevalidatingAfterFeedback => "revalidating_after_feedback",
            RetryState::Fallback => "fallback",
            RetryState::Done => "done",
        }
    }
}

impl fmt::Display for RetryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which pipeline path produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Generated,
    Regenerated,
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Generated => "generated",
            Provenance::Regenerated => "regenerated",
            Provenance::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single emitted unit per subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub subject_id: String,
    pub subject: Entity,
    pub content: StructuredContent,
    pub provenance: Provenance,
    /// Generation calls made for this subject, including calls made before an
    /// isolated panic
    pub attempts: u32,
    pub transitions: Vec<RetryState>,
    /// Last QA issue list seen; may be non-empty for regenerated content
    pub issues: Vec<String>,
    pub fallback_reason: Option<String>,
}

impl PipelineOutcome {
    /// Fallback outcome built outside the state machine, e.g. after an
    /// isolated panic.
    pub fn fallback(
        entity: &Entity,
        content: StructuredContent,
        attempts: u32,
        transitions: Vec<RetryState>,
        reason: String,
    ) -> Self {
        Self {
            subject_id: entity.id.clone(),
            subject: entity.clone(),
            content,
            provenance: Provenance::Fallback,
            attempts,
            transitions,
            issues: Vec::new(),
            fallback_reason: Some(reason),
        }
    }
}

/// Attempts and transitions recorded so far for a subject still in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProgress {
    pub attempts: u32,
    pub transitions: Vec<RetryState>,
}

type ProgressLog = Mutex<HashMap<String, RunProgress>>;

/// Tracks one subject's walk through the state machine, mirrored into the
/// controller's progress log until a terminal state is reached.
struct Run<'a> {
    entity: &'a Entity,
    transitions: Vec<RetryState>,
    attempts: u32,
    log: &'a ProgressLog,
}

impl<'a> Run<'a> {
    fn new(entity: &'a Entity, log: &'a ProgressLog) -> Self {
        Self {
            entity,
            transitions: Vec::with_capacity(5),
            attempts: 0,
            log,
        }
    }

    fn enter(&mut self, state: RetryState) {
        debug!(
            subject_id = %self.entity.id,
            attempt = self.attempts,
            state = %state,
            "Retry state entered"
        );
        self.transitions.push(state);
        self.checkpoint();
    }

    fn set_attempt(&mut self, attempt: u32) {
        self.attempts = attempt;
        self.checkpoint();
    }

    fn checkpoint(&self) {
        self.log.lock().insert(
            self.entity.id.clone(),
            RunProgress {
                attempts: self.attempts,
                transitions: self.transitions.clone(),
            },
        );
    }

    fn finish(&self) {
        self.log.lock().remove(&self.entity.id);
    }
}

pub struct RetryController {
    orchestrator: Arc<GenerationOrchestrator>,
    gate: Arc<ValidationGate>,
    progress: ProgressLog,
}

impl RetryController {
    pub fn new(orchestrator: Arc<GenerationOrchestrator>, gate: Arc<ValidationGate>) -> Self {
        Self {
            orchestrator,
            gate,
            progress: Mutex::new(HashMap::new()),
        }
    }

    /// Remove and return what an unfinished run for `subject_id` had recorded.
    /// `None` once the run reached a terminal state or never started.
    pub fn take_progress(&self, subject_id: &str) -> Option<RunProgress> {
        self.progress.lock().remove(subject_id)
    }

    /// Deterministic fallback content for `entity` on the orchestrator's date.
    pub fn fallback_content(&self, entity: &Entity) -> StructuredContent {
        fallback::synthesize(entity, self.orchestrator.today())
    }

    /// Drive one subject to a terminal state. Never fails.
    pub async fn run(&self, entity: &Entity) -> PipelineOutcome {
        let start = Instant::now();
        let mut run = Run::new(entity, &self.progress);

        run.enter(RetryState::Generating);
        let request = self.orchestrator.initial_request(entity);
        run.set_attempt(request.attempt);
        let first = match self.orchestrator.generate(&request).await {
            Ok(content) => content,
            Err(e) => {
                let reason = if e.is_transport() {
                    format!("generation transport error: {}", e)
                } else {
                    format!("generation failed: {}", e)
                };
                return self.finish_fallback(run, reason, start);
            }
        };

        run.enter(RetryState::Validating);
        let verdict = self.gate.check(entity, &first).await;
        if verdict.is_valid {
            return self.finish_done(run, first, Provenance::Generated, Vec::new(), start);
        }

        run.enter(RetryState::Regenerating);
        let retry = self.orchestrator.feedback_request(&request, &verdict.issues);
        run.set_attempt(retry.attempt);
        let second = match self.orchestrator.generate(&retry).await {
            Ok(content) => content,
            Err(e) => {
                return self.finish_fallback(run, format!("regeneration failed: {}", e), start);
            }
        };

        run.enter(RetryState::RevalidatingAfterFeedback);
        let second_verdict = self.gate.check(entity, &second).await;
        if !second_verdict.is_valid {
            warn!(
                subject_id = %entity.id,
                issue_count = second_verdict.issues.len(),
                "Accepting regenerated content with unresolved QA issues"
            );
        }
        self.finish_done(
            run,
            second,
            Provenance::Regenerated,
            second_verdict.issues,
            start,
        )
    }

    fn finish_done(
        &self,
        mut run: Run<'_>,
        content: StructuredContent,
        provenance: Provenance,
        issues: Vec<String>,
        start: Instant,
    ) -> PipelineOutcome {
        run.enter(RetryState::Done);
        run.finish();
        info!(
            subject_id = %run.entity.id,
            provenance = %provenance,
            attempt = run.attempts,
            duration_ms = start.elapsed().as_millis(),
            "Subject completed"
        );
        PipelineOutcome {
            subject_id: run.entity.id.clone(),
            subject: run.entity.clone(),
            content,
            provenance,
            attempts: run.attempts,
            transitions: run.transitions,
            issues,
            fallback_reason: None,
        }
    }

    fn finish_fallback(&self, mut run: Run<'_>, reason: String, start: Instant) -> PipelineOutcome {
        run.enter(RetryState::Fallback);
        run.finish();
        warn!(
            subject_id = %run.entity.id,
            provenance = %Provenance::Fallback,
            attempt = run.attempts,
            duration_ms = start.elapsed().as_millis(),
            reason = %reason,
            "Subject routed to fallback"
        );
        let content = self.fallback_content(run.entity);
        PipelineOutcome::fallback(run.entity, content, run.attempts, run.transitions, reason)
    }
}
