//! Structured review content: the strict schema every pipeline outcome carries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;

/// Five rating axes, each in `[RATING_MIN, RATING_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    pub overall: f64,
    pub fees: f64,
    pub platform: f64,
    pub support: f64,
    pub trust: f64,
}

impl Ratings {
    pub fn axes(&self) -> [(&'static str, f64); 5] {
        [
            ("overall", self.overall),
            ("fees", self.fees),
            ("platform", self.platform),
            ("support", self.support),
            ("trust", self.trust),
        ]
    }

    /// Clamp every axis into range; NaN collapses to the minimum.
    pub fn clamped(self) -> Self {
        fn clamp(value: f64) -> f64 {
            if value.is_nan() {
                RATING_MIN
            } else {
                value.clamp(RATING_MIN, RATING_MAX)
            }
        }
        Self {
            overall: clamp(self.overall),
            fees: clamp(self.fees),
            platform: clamp(self.platform),
            support: clamp(self.support),
            trust: clamp(self.trust),
        }
    }

    pub fn in_range(&self) -> bool {
        self.axes()
            .iter()
            .all(|(_, value)| (RATING_MIN..=RATING_MAX).contains(value))
    }
}

/// Structured feature facts shown in the review's summary box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrokerFeatures {
    pub regulation: Vec<String>,
    pub minimum_deposit: String,
    pub platforms: Vec<String>,
    pub instruments: Vec<String>,
    pub fees: String,
    pub customer_support: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSection {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Complete review content for one broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredContent {
    pub title: String,
    pub meta_description: String,
    pub introduction: String,
    pub overview: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub features: BrokerFeatures,
    pub detailed_review: Vec<ReviewSection>,
    pub verdict: String,
    pub faq: Vec<FaqEntry>,
    pub ratings: Ratings,
    pub last_updated: NaiveDate,
}

impl StructuredContent {
    /// Hard schema invariants. Returns every violation found.
    ///
    /// These are the guarantees downstream consumers rely on; softer editorial
    /// rules (lengths, counts) belong to the QA backend.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.title.trim().is_empty() {
            violations.push("title is empty".to_string());
        }
        if self.pros.iter().all(|p| p.trim().is_empty()) {
            violations.push("pros list is empty".to_string());
        }
        if self.cons.iter().all(|c| c.trim().is_empty()) {
            violations.push("cons list is empty".to_string());
        }
        for (axis, value) in self.ratings.axes() {
            if !(RATING_MIN..=RATING_MAX).contains(&value) {
                violations.push(format!("rating '{}' out of range: {}", axis, value));
            }
        }
        violations
    }

    pub fn satisfies_invariants(&self) -> bool {
        self.invariant_violations().is_empty()
    }
}
