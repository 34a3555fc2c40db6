//! Batch scheduling: chunked fan-out of per-subject pipelines with a pacing
//! delay between chunks.

pub mod plan;
pub mod scheduler;

pub use plan::{BatchPlan, BatchSettings, ChunkSummary, RunReport, RunStats};
pub use scheduler::{BatchScheduler, SubjectRunner};
