//! Parsing of model output into structured content.

use crate::content::{BrokerFeatures, FaqEntry, Ratings, ReviewSection, StructuredContent};
use crate::error::PipelineError;
use chrono::NaiveDate;
use serde::Deserialize;

/// Locate the first balanced `{ ... }` substring in `text`.
///
/// Braces inside JSON string literals (including escaped quotes) do not count
/// toward nesting. Returns `None` when no opening brace is ever closed.
pub fn find_json_object(text: &str) -> Option<&str> {
    json_object_candidates(text).next()
}

/// Every balanced `{ ... }` substring in `text`, in order of opening brace.
pub fn json_object_candidates(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices('{')
        .filter_map(move |(start, _)| {
            balanced_end(&text[start..]).map(|end| &text[start..start + end])
        })
}

/// Byte length of the balanced object starting at `candidate[0] == '{'`.
fn balanced_end(candidate: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in candidate.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

// Wire shape of a generated review; optional prose fields default to empty so
// the QA gate, not the parser, judges completeness.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentPayload {
    title: String,
    #[serde(default)]
    meta_description: String,
    #[serde(default)]
    introduction: String,
    #[serde(default)]
    overview: String,
    pros: Vec<String>,
    cons: Vec<String>,
    #[serde(default)]
    features: BrokerFeatures,
    #[serde(default)]
    detailed_review: Vec<ReviewSection>,
    #[serde(default)]
    verdict: String,
    #[serde(default)]
    faq: Vec<FaqEntry>,
    ratings: Ratings,
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Extract and parse review content from raw model output.
///
/// `last_updated` is always stamped with `today`; any date the model wrote is
/// ignored. Ratings are clamped into range. Fails with [`PipelineError::Parse`]
/// when no object is found, no balanced object matches the schema, or the
/// result would violate a hard content invariant.
pub fn parse_structured_content(
    raw: &str,
    today: NaiveDate,
) -> Result<StructuredContent, PipelineError> {
    let mut first_error = None;
    let mut payload = None;
    for candidate in json_object_candidates(raw) {
        match serde_json::from_str::<ContentPayload>(candidate) {
            Ok(parsed) => {
                payload = Some(parsed);
                break;
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    let payload = match (payload, first_error) {
        (Some(payload), _) => payload,
        (None, Some(e)) => {
            return Err(PipelineError::Parse(format!(
                "response does not match schema: {}",
                e
            )))
        }
        (None, None) => {
            return Err(PipelineError::Parse(
                "no JSON object found in response".to_string(),
            ))
        }
    };

    let content = StructuredContent {
        title: payload.title.trim().to_string(),
        meta_description: payload.meta_description.trim().to_string(),
        introduction: payload.introduction,
        overview: payload.overview,
        pros: clean_list(payload.pros),
        cons: clean_list(payload.cons),
        features: payload.features,
        detailed_review: payload.detailed_review,
        verdict: payload.verdict,
        faq: payload.faq,
        ratings: payload.ratings.clamped(),
        last_updated: today,
    };

    let violations = content.invariant_violations();
    if !violations.is_empty() {
        return Err(PipelineError::Parse(violations.join("; ")));
    }
    Ok(content)
}
