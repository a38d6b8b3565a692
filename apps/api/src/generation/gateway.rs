//! Generation Gateway: the boundary between the orchestrator and the hosted model.
//!
//! The orchestrator sees only the `Gateway` trait. Whatever the model returns is parsed and
//! shape-checked here, so a bad payload becomes `GatewayError::Malformed` at the boundary
//! rather than a surprise further in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::generation::prompts::{
    GENERATION_PROMPT_TEMPLATE, GENERATION_SYSTEM, PHOTO_PRESENT_INSTRUCTION,
    REPAIR_INSTRUCTION_TEMPLATE, RESUME_SCHEMA_EXAMPLE, SAMPLE_PERSONA_INSTRUCTION,
};
use crate::generation::request::{GenerationMode, Part, ValidatedRequest};
use crate::llm_client::prompts::{FACTUALITY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::ResumeDocument;

// ────────────────────────────────────────────────────────────────────────────
// Contract
// ────────────────────────────────────────────────────────────────────────────

/// Best-effort model output. Either part may be missing even when it was asked for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModelOutput {
    #[serde(default)]
    pub resume: Option<ResumeDocument>,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Transient network or service failure. Retryable.
    #[error("model service unavailable: {0}")]
    Unavailable(String),

    /// Output did not parse into the expected shape. Treated as an incomplete response.
    #[error("model output malformed: {0}")]
    Malformed(String),

    /// Safety or policy refusal. Terminal.
    #[error("model refused the request: {0}")]
    Rejected(String),
}

/// Sent on a retry: which parts are still missing, and a compact account of what exists.
/// Never carries the produced parts themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairInstruction {
    pub missing: Vec<Part>,
    /// One line per part already produced.
    pub produced_summary: Vec<String>,
}

/// The single capability the orchestrator depends on. Injected at construction so tests can
/// substitute a scripted stub.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `mode` names the parts to produce on this call; on a repair retry it covers only the
    /// missing parts.
    async fn invoke(
        &self,
        request: &ValidatedRequest,
        mode: GenerationMode,
        repair: Option<&RepairInstruction>,
    ) -> Result<RawModelOutput, GatewayError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LLM-backed implementation
// ────────────────────────────────────────────────────────────────────────────

/// Production gateway: one JSON call to the model per invocation.
pub struct LlmGateway {
    llm: LlmClient,
}

impl LlmGateway {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Gateway for LlmGateway {
    async fn invoke(
        &self,
        request: &ValidatedRequest,
        mode: GenerationMode,
        repair: Option<&RepairInstruction>,
    ) -> Result<RawModelOutput, GatewayError> {
        let prompt = build_generation_prompt(request, mode, repair);
        let system = format!("{GENERATION_SYSTEM} {JSON_ONLY_SYSTEM}");

        debug!(
            "Invoking model for {:?} (repair={}, prompt_chars={})",
            mode,
            repair.is_some(),
            prompt.len()
        );

        let value: Value = self.llm.call_json(&prompt, &system).await?;
        parse_model_output(value)
    }
}

impl From<LlmError> for GatewayError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Refused => GatewayError::Rejected(err.to_string()),
            LlmError::Parse(e) => GatewayError::Malformed(e.to_string()),
            LlmError::EmptyContent => GatewayError::Malformed(err.to_string()),
            LlmError::Http(_) | LlmError::Api { .. } | LlmError::RateLimited { .. } => {
                GatewayError::Unavailable(err.to_string())
            }
        }
    }
}

/// Parse-then-validate. Each part is checked on its own so a broken resume does not throw
/// away a good cover letter; the call is `Malformed` only when nothing usable survives.
fn parse_model_output(value: Value) -> Result<RawModelOutput, GatewayError> {
    let Value::Object(mut fields) = value else {
        return Err(GatewayError::Malformed(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let mut problems = Vec::new();

    let resume = match fields.remove("resume") {
        None | Some(Value::Null) => None,
        Some(raw) => match serde_json::from_value::<ResumeDocument>(raw) {
            Ok(resume) => Some(resume),
            Err(e) => {
                warn!("Discarding malformed resume from model output: {e}");
                problems.push(format!("resume: {e}"));
                None
            }
        },
    };

    let cover_letter = match fields.remove("coverLetter") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => {
            warn!("Discarding non-string coverLetter from model output");
            problems.push(format!("coverLetter: expected string, got {other}"));
            None
        }
    };

    if resume.is_none() && cover_letter.is_none() && !problems.is_empty() {
        return Err(GatewayError::Malformed(problems.join("; ")));
    }

    Ok(RawModelOutput {
        resume,
        cover_letter,
    })
}

fn build_generation_prompt(
    request: &ValidatedRequest,
    mode: GenerationMode,
    repair: Option<&RepairInstruction>,
) -> String {
    let parts_instruction = match mode {
        GenerationMode::ResumeOnly => {
            "Produce ONLY the structured resume. Set \"coverLetter\" to null."
        }
        GenerationMode::CoverLetterOnly => {
            "Produce ONLY the cover letter. Set \"resume\" to null."
        }
        GenerationMode::Both => "Produce BOTH the structured resume and the cover letter.",
    };

    let sample_instruction = if request.is_sample_persona() {
        SAMPLE_PERSONA_INSTRUCTION
    } else {
        ""
    };

    let photo_instruction = if request.photo().is_some() && mode.requires(Part::Resume) {
        PHOTO_PRESENT_INSTRUCTION
    } else {
        ""
    };

    let repair_instruction = repair.map(render_repair_instruction).unwrap_or_default();

    let prompt = GENERATION_PROMPT_TEMPLATE
        .replace("{factuality_instruction}", factuality_for(request))
        .replace("{parts_instruction}", parts_instruction)
        .replace("{sample_instruction}", sample_instruction)
        .replace("{photo_instruction}", photo_instruction)
        .replace("{repair_instruction}", &repair_instruction)
        .replace("{output_schema}", RESUME_SCHEMA_EXAMPLE);

    // User text goes in last and outside the template so braces in it are never substituted.
    format!(
        "{prompt}\n\nRESUME:\n{}\n\nJOB DESCRIPTION:\n{}",
        request.resume_text(),
        request.job_description()
    )
}

fn factuality_for(request: &ValidatedRequest) -> &'static str {
    if request.is_sample_persona() {
        ""
    } else {
        FACTUALITY_INSTRUCTION
    }
}

fn render_repair_instruction(repair: &RepairInstruction) -> String {
    let produced = if repair.produced_summary.is_empty() {
        "- nothing usable yet".to_string()
    } else {
        repair
            .produced_summary
            .iter()
            .map(|line| format!("- {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let missing = repair
        .missing
        .iter()
        .map(Part::label)
        .collect::<Vec<_>>()
        .join(", ");

    REPAIR_INSTRUCTION_TEMPLATE
        .replace("{produced_summary}", &produced)
        .replace("{missing_parts}", &missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::request::{validate, EmptyInputPolicy, GenerationRequest};
    use serde_json::json;

    fn validated(resume: &str, jd: &str, photo: Option<&str>) -> ValidatedRequest {
        let request = GenerationRequest {
            resume_text: resume.to_string(),
            job_description: jd.to_string(),
            photo_reference: photo.map(str::to_string),
            generation_mode: GenerationMode::Both,
        };
        validate(&request, EmptyInputPolicy::Lenient).unwrap()
    }

    #[test]
    fn test_parse_full_output() {
        let output = parse_model_output(json!({
            "resume": {"name": "Ana", "summary": "Nurse manager"},
            "coverLetter": "Dear team,"
        }))
        .unwrap();
        assert_eq!(output.resume.unwrap().name, "Ana");
        assert_eq!(output.cover_letter.as_deref(), Some("Dear team,"));
    }

    #[test]
    fn test_parse_keeps_resume_with_omitted_entry_fields() {
        let output = parse_model_output(json!({
            "resume": {
                "name": "Ana",
                "summary": "Nurse manager",
                "education": [{"degree": "BSN", "school": "UCLA"}],
                "experience": null
            },
            "coverLetter": null
        }))
        .unwrap();
        let resume = output.resume.unwrap();
        assert_eq!(resume.education[0].school, "UCLA");
        assert_eq!(resume.education[0].year, "");
        assert!(resume.experience.is_empty());
    }

    #[test]
    fn test_parse_nulls_are_absent_parts() {
        let output = parse_model_output(json!({"resume": null, "coverLetter": null})).unwrap();
        assert_eq!(output, RawModelOutput::default());
    }

    #[test]
    fn test_parse_non_object_is_malformed() {
        let result = parse_model_output(json!(["not", "an", "object"]));
        assert!(matches!(result, Err(GatewayError::Malformed(_))));
    }

    #[test]
    fn test_parse_keeps_good_part_when_other_is_broken() {
        let output = parse_model_output(json!({
            "resume": {"summary": "no name field"},
            "coverLetter": "Dear team,"
        }))
        .unwrap();
        assert!(output.resume.is_none());
        assert_eq!(output.cover_letter.as_deref(), Some("Dear team,"));
    }

    #[test]
    fn test_parse_all_parts_broken_is_malformed() {
        let result = parse_model_output(json!({"resume": "text", "coverLetter": 42}));
        assert!(matches!(result, Err(GatewayError::Malformed(_))));
    }

    #[test]
    fn test_llm_error_mapping() {
        assert!(matches!(
            GatewayError::from(LlmError::Refused),
            GatewayError::Rejected(_)
        ));
        assert!(matches!(
            GatewayError::from(LlmError::EmptyContent),
            GatewayError::Malformed(_)
        ));
        assert!(matches!(
            GatewayError::from(LlmError::RateLimited { retries: 3 }),
            GatewayError::Unavailable(_)
        ));
        assert!(matches!(
            GatewayError::from(LlmError::Api {
                status: 529,
                message: "overloaded".to_string()
            }),
            GatewayError::Unavailable(_)
        ));
    }

    #[test]
    fn test_prompt_contains_user_inputs_and_mode() {
        let request = validated("Ten years in logistics", "Ops lead at Acme", None);
        let prompt = build_generation_prompt(&request, GenerationMode::CoverLetterOnly, None);
        assert!(prompt.contains("Ten years in logistics"));
        assert!(prompt.contains("Ops lead at Acme"));
        assert!(prompt.contains("Produce ONLY the cover letter"));
        assert!(!prompt.contains("PREVIOUS ATTEMPT"));
        assert!(!prompt.contains("Alex Doe"));
    }

    #[test]
    fn test_prompt_never_substitutes_placeholders_in_user_text() {
        let request = validated("I wrote {repair_instruction} once", "", None);
        let prompt = build_generation_prompt(&request, GenerationMode::Both, None);
        assert!(prompt.contains("I wrote {repair_instruction} once"));
    }

    #[test]
    fn test_prompt_for_blank_lenient_request_asks_for_sample() {
        let request = validated("", "", None);
        let prompt = build_generation_prompt(&request, GenerationMode::Both, None);
        assert!(prompt.contains("Alex Doe"));
    }

    #[test]
    fn test_prompt_never_includes_photo_data() {
        let photo = "data:image/png;base64,iVBORw0KGgo=";
        let request = validated("cv", "", Some(photo));
        let prompt = build_generation_prompt(&request, GenerationMode::Both, None);
        assert!(!prompt.contains(photo));
        assert!(prompt.contains("attached a profile photo"));
    }

    #[test]
    fn test_repair_prompt_names_missing_parts_and_summary() {
        let request = validated("cv", "jd", None);
        let repair = RepairInstruction {
            missing: vec![Part::CoverLetter],
            produced_summary: vec!["resume: Ana, 2 experience entries".to_string()],
        };
        let prompt =
            build_generation_prompt(&request, GenerationMode::CoverLetterOnly, Some(&repair));
        assert!(prompt.contains("STILL MISSING (produce ONLY these): coverLetter"));
        assert!(prompt.contains("- resume: Ana, 2 experience entries"));
    }
}
