//! Local structural QA rules.

use super::{QaBackend, QaMetadata, QaVerdict};
use crate::content::StructuredContent;
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Editorial thresholds checked by [`RuleQaBackend`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub min_pros: usize,
    pub min_cons: usize,
    pub min_sections: usize,
    pub min_section_chars: usize,
    pub min_faq: usize,
    pub min_introduction_chars: usize,
    pub title_max_chars: usize,
    pub meta_min_chars: usize,
    pub meta_max_chars: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            min_pros: 5,
            min_cons: 3,
            min_sections: 4,
            min_section_chars: 300,
            min_faq: 4,
            min_introduction_chars: 150,
            title_max_chars: 70,
            meta_min_chars: 70,
            meta_max_chars: 160,
        }
    }
}

impl RuleSet {
    pub fn validate(&self) -> Result<(), String> {
        if self.meta_min_chars > self.meta_max_chars {
            return Err(format!(
                "meta_min_chars ({}) exceeds meta_max_chars ({})",
                self.meta_min_chars, self.meta_max_chars
            ));
        }
        if self.title_max_chars == 0 {
            return Err("title_max_chars must be positive".to_string());
        }
        Ok(())
    }

    /// Every rule violation for `content`, in a stable order.
    pub fn check(&self, content: &StructuredContent, metadata: &QaMetadata) -> Vec<String> {
        let mut issues = Vec::new();

        let title_chars = content.title.chars().count();
        if title_chars > self.title_max_chars {
            issues.push(format!(
                "Title is {} characters; keep it at or under {}",
                title_chars, self.title_max_chars
            ));
        }
        if !content
            .title
            .to_lowercase()
            .contains(&metadata.subject_name.to_lowercase())
        {
            issues.push(format!(
                "Title must mention the broker name '{}'",
                metadata.subject_name
            ));
        }

        let meta_chars = content.meta_description.chars().count();
        if meta_chars < self.meta_min_chars || meta_chars > self.meta_max_chars {
            issues.push(format!(
                "Meta description is {} characters; expected {}-{}",
                meta_chars, self.meta_min_chars, self.meta_max_chars
            ));
        }

        if content.introduction.chars().count() < self.min_introduction_chars {
            issues.push(format!(
                "Introduction must be at least {} characters",
                self.min_introduction_chars
            ));
        }
        if content.pros.len() < self.min_pros {
            issues.push(format!(
                "Expected at least {} pros, found {}",
                self.min_pros,
                content.pros.len()
            ));
        }
        if content.cons.len() < self.min_cons {
            issues.push(format!(
                "Expected at least {} cons, found {}",
                self.min_cons,
                content.cons.len()
            ));
        }
        if content.detailed_review.len() < self.min_sections {
            issues.push(format!(
                "Expected at least {} detailed review sections, found {}",
                self.min_sections,
                content.detailed_review.len()
            ));
        }
        for section in &content.detailed_review {
            if section.body.chars().count() < self.min_section_chars {
                issues.push(format!(
                    "Section '{}' is shorter than {} characters",
                    section.heading, self.min_section_chars
                ));
            }
        }
        if content.faq.len() < self.min_faq {
            issues.push(format!(
                "Expected at least {} FAQ entries, found {}",
                self.min_faq,
                content.faq.len()
            ));
        }
        if content.verdict.trim().is_empty() {
            issues.push("Verdict is empty".to_string());
        }
        issues.extend(content.invariant_violations());
        issues
    }
}

/// Rule-engine QA backend; never fails with an infrastructure error.
#[derive(Debug, Clone, Default)]
pub struct RuleQaBackend {
    rules: RuleSet,
}

impl RuleQaBackend {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl QaBackend for RuleQaBackend {
    async fn validate(
        &self,
        content: &str,
        content_type: &str,
        metadata: &QaMetadata,
    ) -> Result<QaVerdict, PipelineError> {
        let parsed: StructuredContent = match serde_json::from_str(content) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Ok(QaVerdict::invalid(vec![format!(
                    "Content does not match the review schema: {}",
                    e
                )]))
            }
        };

        let issues = self.rules.check(&parsed, metadata);
        debug!(
            subject_id = %metadata.subject_id,
            content_type,
            issue_count = issues.len(),
            "Rule QA evaluated"
        );
        if issues.is_empty() {
            Ok(QaVerdict::valid())
        } else {
            Ok(QaVerdict::invalid(issues))
        }
    }

    fn backend_name(&self) -> &str {
        "rules"
    }
}
