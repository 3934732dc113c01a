//! Script Generation: builds the one schema-constrained request and validates the answer.
//!
//! Flow: build instruction → attach files inline (upload order) → declare schema →
//!       one model call → trim / unfence → validating parse.
//!
//! Input validation (topic or attachments present) belongs to the caller.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{strip_json_fences, GenerativeModel, InlineData, LlmError, StructuredRequest};
use crate::script::models::{GeneratedScript, ScriptValidationError};
use crate::script::prompts::{
    ATTACHMENTS_INSTRUCTION, PERSONA_DIRECTIVE, SCRIPT_PROMPT_TEMPLATE, STRUCTURE_INSTRUCTION,
    TOPIC_INSTRUCTION_TEMPLATE,
};
use crate::script::schema::response_schema;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("generated script is invalid: {0}")]
    Invalid(#[from] ScriptValidationError),
}

/// Generates a script from a topic and/or reference files.
///
/// Issues exactly one request; never retries.
pub async fn generate_script(
    model: &dyn GenerativeModel,
    topic: &str,
    attachments: &[InlineData],
) -> Result<GeneratedScript, GenerationError> {
    let request = build_request(topic, attachments);

    info!(
        topic_chars = topic.chars().count(),
        attachments = attachments.len(),
        "Requesting script generation"
    );

    let text = model.generate_structured(&request).await?;
    debug!(response_chars = text.len(), "Model responded");

    let script = GeneratedScript::from_json(strip_json_fences(&text)).map_err(|e| {
        warn!("Model response failed validation: {e}");
        e
    })?;

    info!("Generated script {:?}", script.title);
    Ok(script)
}

/// Builds the single structured request sent to the model.
pub fn build_request(topic: &str, attachments: &[InlineData]) -> StructuredRequest {
    StructuredRequest {
        instruction: build_script_prompt(topic, !attachments.is_empty()),
        inline_parts: attachments.to_vec(),
        response_schema: response_schema(),
    }
}

/// Fills the instruction template. With files attached, the files replace the
/// topic line as the primary inspiration.
fn build_script_prompt(topic: &str, has_files: bool) -> String {
    let source_instruction = if has_files {
        ATTACHMENTS_INSTRUCTION.to_string()
    } else {
        TOPIC_INSTRUCTION_TEMPLATE.replace("{topic}", topic)
    };

    SCRIPT_PROMPT_TEMPLATE
        .replace("{persona}", PERSONA_DIRECTIVE)
        .replace("{source_instruction}", &source_instruction)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{structure}", STRUCTURE_INSTRUCTION)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
