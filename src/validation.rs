//! Validation gate: runs generated content through the QA backend.
//!
//! Infrastructure failures are folded into an invalid verdict so the retry
//! controller treats "QA could not run" and "QA rejected" the same way.

use crate::catalog::Entity;
use crate::content::StructuredContent;
use crate::qa::{QaBackend, QaMetadata, QaVerdict, REVIEW_CONTENT_TYPE};
use std::sync::Arc;
use tracing::{info, warn};

/// Issue prefix used when the QA backend itself failed.
pub const INFRASTRUCTURE_ISSUE_PREFIX: &str = "QA infrastructure error";

pub struct ValidationGate {
    backend: Arc<dyn QaBackend>,
}

impl ValidationGate {
    pub fn new(backend: Arc<dyn QaBackend>) -> Self {
        Self { backend }
    }

    /// Validate content for a subject. Never fails.
    pub async fn check(&self, entity: &Entity, content: &StructuredContent) -> QaVerdict {
        let serialized = match serde_json::to_string(content) {
            Ok(serialized) => serialized,
            Err(e) => {
                return QaVerdict::invalid(vec![format!(
                    "{}: content could not be serialized: {}",
                    INFRASTRUCTURE_ISSUE_PREFIX, e
                )])
            }
        };
        let metadata = QaMetadata {
            subject_id: entity.id.clone(),
            subject_name: entity.name.clone(),
            category: entity.category.to_string(),
            region: entity.region.to_string(),
        };

        let verdict = match self
            .backend
            .validate(&serialized, REVIEW_CONTENT_TYPE, &metadata)
            .await
        {
            Ok(verdict) => verdict.normalized(),
            Err(e) => {
                warn!(
                    subject_id = %entity.id,
                    backend = self.backend.backend_name(),
                    error = %e,
                    "QA backend failed; treating content as invalid"
                );
                QaVerdict::invalid(vec![format!("{}: {}", INFRASTRUCTURE_ISSUE_PREFIX, e)])
            }
        };

        info!(
            subject_id = %entity.id,
            is_valid = verdict.is_valid,
            issue_count = verdict.issues.len(),
            "QA verdict"
        );
        verdict
    }
}
