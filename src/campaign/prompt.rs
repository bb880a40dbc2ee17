//! Prompt rendering for one campaign item.

use crate::agent::{KnowledgeDocument, Persona};
use std::fmt::Write;

const GROUNDING_DIRECTIVE: &str =
    "IMPORTANT: You must base 90% of your responses on the following knowledge base documents:";
const LENGTH_DIRECTIVE: &str =
    "Generate a concise SMS message (160 characters or less). Be direct and actionable.";

/// Persona framing, the instruction, optional grounding documents, then the length directive.
pub fn render_system_prompt(
    persona: Persona,
    instruction: &str,
    documents: &[KnowledgeDocument],
) -> String {
    let mut prompt = String::new();
    let _ = write!(prompt, "{}\n\n{}\n\n", persona.framing(), instruction);

    if !documents.is_empty() {
        let _ = write!(prompt, "{}\n\n", GROUNDING_DIRECTIVE);
        for (index, doc) in documents.iter().enumerate() {
            let _ = write!(prompt, "Document {}: {}\n{}\n\n", index + 1, doc.name, doc.content);
        }
    }

    let _ = write!(prompt, "\n{}", LENGTH_DIRECTIVE);
    prompt
}

pub fn render_user_prompt(address: &str, language: &str) -> String {
    format!(
        "Generate an SMS message for phone number {} in {}.",
        address, language
    )
}
