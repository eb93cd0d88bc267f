//! Prompt templates for metadata generation.

use crate::context::ContextSummary;
use crate::error::Result;

pub const SYSTEM_PROMPT: &str = "You are an assistant that generates structured metadata for software projects. \
Your output must be valid JSON. Do not guess or hallucinate technologies. \
Use file names and code snippets to infer purpose and behavior. \
Avoid generic descriptions and avoid mentioning project stage. \
Tags must be lowercase. Category must be one of: \
Games, CLIs, Libraries, AI, Web, Tools, Other.";

const USER_PROMPT_TEMPLATE: &str = "Context:\n{context}\n\n\
Generate:\n\
* project name (kebab-case)\n\
* 1-paragraph description focused on functionality and purpose\n\
* tags (3-6)\n\
* tech stack\n\
* category\n\
Return as JSON only with keys: name, description, tags, tech, category.";

/// System and user prompt for one request.
pub fn build_prompts(context: &ContextSummary) -> Result<(String, String)> {
    let serialized = serde_json::to_string_pretty(context)?;
    let user = USER_PROMPT_TEMPLATE.replace("{context}", &serialized);
    Ok((SYSTEM_PROMPT.to_string(), user))
}
