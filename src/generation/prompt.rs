//! Review prompt templates.

use crate::catalog::Entity;

/// Prompt template: entity in, full prompt text out.
pub type PromptTemplate = dyn Fn(&Entity) -> String + Send + Sync;

/// Default review prompt. Enumerates every schema field with its minimum
/// counts and lengths so the backend returns a parseable object.
pub fn review_prompt(entity: &Entity) -> String {
    format!(
        r#"Write a comprehensive, balanced review of the {category} broker "{name}" for {region} traders.

Return ONLY a JSON object with exactly these fields:
- "title": string, at most 70 characters, must contain "{name}"
- "metaDescription": string, 70-160 characters
- "introduction": string, at least 150 characters
- "overview": string, 2-3 paragraphs describing the company, history and regulation
- "pros": array of 5-7 short strings
- "cons": array of 3-5 short strings
- "features": object with "regulation" (array of regulator names), "minimumDeposit" (string), "platforms" (array), "instruments" (array), "fees" (string), "customerSupport" (string)
- "detailedReview": array of 4-6 objects {{"heading": string, "body": string}}, each body at least 300 characters, covering fees, platforms, account types, safety and customer support
- "verdict": string, 1-2 paragraphs with a clear recommendation
- "faq": array of 4-6 objects {{"question": string, "answer": string}}
- "ratings": object with numeric "overall", "fees", "platform", "support", "trust", each between 0 and 5 with one decimal place

Do not wrap the JSON in markdown and do not add commentary before or after it."#,
        category = entity.category.describe(),
        name = entity.name,
        region = entity.region.describe(),
    )
}

/// Original prompt followed by a feedback clause quoting every QA issue verbatim.
pub fn feedback_prompt(original: &str, issues: &[String]) -> String {
    let mut prompt = String::with_capacity(original.len() + 256);
    prompt.push_str(original);
    prompt.push_str(
        "\n\nA previous draft of this review was rejected by quality review for these issues:\n",
    );
    for issue in issues {
        prompt.push_str("- ");
        prompt.push_str(issue);
        prompt.push('\n');
    }
    prompt.push_str("Fix every issue listed above while keeping all other requirements.");
    prompt
}
