// Cross-cutting prompt fragments shared by every prompt that goes through the LLM client.
// Feature-specific prompts live in a prompts.rs next to the feature.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps the model from inventing facts about a real person.
pub const FACTUALITY_INSTRUCTION: &str = "\
    Use ONLY facts present in the provided resume text. You may reorder, rephrase and \
    emphasise, but never invent employers, dates, degrees, certifications or metrics. \
    If a field is unknown, omit it rather than guessing.";
