//! Content generation: prompt construction, the single backend call, and
//! parsing of untrusted model output into [`StructuredContent`].
//!
//! [`StructuredContent`]: crate::content::StructuredContent

pub mod orchestrator;
pub mod parse;
pub mod prompt;

pub use orchestrator::{GenerationOrchestrator, GenerationSettings, RawGenerationResult};
pub use parse::{find_json_object, json_object_candidates, parse_structured_content};
pub use prompt::{feedback_prompt, review_prompt, PromptTemplate};
