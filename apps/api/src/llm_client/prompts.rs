// Shared prompt fragments. Feature modules keep their own prompts.rs and pull
// cross-cutting pieces from here.

/// Instruction that asks the model for a bare JSON object.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Return ONLY a valid JSON object. No markdown, no explanation, just raw JSON:";
