//! Generation requests and their validation.
//!
//! `validate()` is the only way to obtain a `ValidatedRequest`, so everything past this
//! module can assume the photo reference is well formed and the empty-input policy was applied.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which artifacts a request requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationMode {
    ResumeOnly,
    CoverLetterOnly,
    #[default]
    Both,
}

/// One of the two artifacts a generation can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Resume,
    CoverLetter,
}

impl Part {
    pub fn label(&self) -> &'static str {
        match self {
            Part::Resume => "resume",
            Part::CoverLetter => "coverLetter",
        }
    }
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl GenerationMode {
    /// Required parts, resume first.
    pub fn required_parts(&self) -> Vec<Part> {
        match self {
            GenerationMode::ResumeOnly => vec![Part::Resume],
            GenerationMode::CoverLetterOnly => vec![Part::CoverLetter],
            GenerationMode::Both => vec![Part::Resume, Part::CoverLetter],
        }
    }

    pub fn requires(&self, part: Part) -> bool {
        self.required_parts().contains(&part)
    }

    /// The narrowest mode covering `parts`. `None` when `parts` is empty.
    pub fn covering(parts: &[Part]) -> Option<GenerationMode> {
        let resume = parts.contains(&Part::Resume);
        let cover_letter = parts.contains(&Part::CoverLetter);
        match (resume, cover_letter) {
            (true, true) => Some(GenerationMode::Both),
            (true, false) => Some(GenerationMode::ResumeOnly),
            (false, true) => Some(GenerationMode::CoverLetterOnly),
            (false, false) => None,
        }
    }
}

/// How a request with neither resume text nor job description is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyInputPolicy {
    /// Reject with `ValidationError::Empty`.
    #[default]
    Strict,
    /// Accept and ask the model for a sample document for a placeholder persona.
    Lenient,
}

/// A per-action generation request. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, alias = "resume")]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default, rename = "photoDataUri")]
    pub photo_reference: Option<String>,
    #[serde(default)]
    pub generation_mode: GenerationMode,
}

/// A request that passed validation. Only constructible through `validate()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    resume_text: String,
    job_description: String,
    photo: Option<PhotoReference>,
    mode: GenerationMode,
    sample_persona: bool,
}

impl ValidatedRequest {
    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn photo(&self) -> Option<&PhotoReference> {
        self.photo.as_ref()
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// True when both inputs were blank and the lenient policy let the request through.
    pub fn is_sample_persona(&self) -> bool {
        self.sample_persona
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please provide either a resume or a job description")]
    Empty,

    #[error("Photo must be a base64 image data URI: {0}")]
    InvalidPhoto(String),
}

/// A photo carried as `data:image/<subtype>;base64,<payload>`.
///
/// The original string is kept verbatim; it is what gets passed through to the resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoReference {
    uri: String,
    mime_type: String,
}

impl PhotoReference {
    pub fn parse(uri: &str) -> Result<PhotoReference, ValidationError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| ValidationError::InvalidPhoto("missing 'data:' scheme".to_string()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ValidationError::InvalidPhoto("missing ',' separator".to_string()))?;

        let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
            ValidationError::InvalidPhoto("payload must be base64 encoded".to_string())
        })?;

        match mime_type.strip_prefix("image/") {
            Some(subtype) if is_mime_token(subtype) => {}
            _ => {
                return Err(ValidationError::InvalidPhoto(format!(
                    "'{mime_type}' is not an image type"
                )))
            }
        }

        if payload.is_empty() {
            return Err(ValidationError::InvalidPhoto("empty payload".to_string()));
        }

        STANDARD
            .decode(payload)
            .map_err(|e| ValidationError::InvalidPhoto(format!("bad base64 payload: {e}")))?;

        Ok(PhotoReference {
            uri: uri.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File extension for storage keys (`image/svg+xml` → `svg`).
    pub fn extension(&self) -> &str {
        let subtype = self.mime_type.trim_start_matches("image/");
        let subtype = subtype.split('+').next().unwrap_or(subtype);
        if subtype == "jpeg" {
            "jpg"
        } else {
            subtype
        }
    }

    /// Decoded image bytes. The payload was checked in `parse`, so this only fails if
    /// the value was constructed some other way.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let payload = self.uri.split_once(',').map(|(_, p)| p).unwrap_or_default();
        STANDARD.decode(payload)
    }
}

/// RFC 6838 restricted name: starts alphanumeric, then only `!#$&^_.+-` or alphanumerics.
fn is_mime_token(subtype: &str) -> bool {
    let mut chars = subtype.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    subtype.len() <= 127
        && chars.all(|c| c.is_ascii_alphanumeric() || "!#$&^_.+-".contains(c))
        && !subtype.contains("..")
}

/// Validates a raw request under the given empty-input policy. No side effects.
pub fn validate(
    request: &GenerationRequest,
    policy: EmptyInputPolicy,
) -> Result<ValidatedRequest, ValidationError> {
    let both_blank =
        request.resume_text.trim().is_empty() && request.job_description.trim().is_empty();

    if both_blank && policy == EmptyInputPolicy::Strict {
        return Err(ValidationError::Empty);
    }

    let photo = request
        .photo_reference
        .as_deref()
        .map(PhotoReference::parse)
        .transpose()?;

    Ok(ValidatedRequest {
        resume_text: request.resume_text.clone(),
        job_description: request.job_description.clone(),
        photo,
        mode: request.generation_mode,
        sample_persona: both_blank,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn request(resume: &str, jd: &str, photo: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            resume_text: resume.to_string(),
            job_description: jd.to_string(),
            photo_reference: photo.map(str::to_string),
            generation_mode: GenerationMode::Both,
        }
    }

    #[test]
    fn test_strict_rejects_blank_inputs() {
        let err = validate(&request("  ", "\n", None), EmptyInputPolicy::Strict).unwrap_err();
        assert_eq!(err, ValidationError::Empty);
    }

    #[test]
    fn test_lenient_accepts_blank_inputs_as_sample_persona() {
        let validated = validate(&request("", "", None), EmptyInputPolicy::Lenient).unwrap();
        assert!(validated.is_sample_persona());
    }

    #[test]
    fn test_either_input_alone_is_enough() {
        let only_resume = validate(&request("Ten years of SRE", "", None), EmptyInputPolicy::Strict);
        let only_jd = validate(&request("", "Hiring a PM", None), EmptyInputPolicy::Strict);
        assert!(!only_resume.unwrap().is_sample_persona());
        assert!(only_jd.is_ok());
    }

    #[test]
    fn test_valid_photo_is_kept_verbatim() {
        let validated =
            validate(&request("cv", "", Some(PNG_URI)), EmptyInputPolicy::Strict).unwrap();
        let photo = validated.photo().unwrap();
        assert_eq!(photo.as_str(), PNG_URI);
        assert_eq!(photo.mime_type(), "image/png");
        assert_eq!(photo.extension(), "png");
        assert!(!photo.decode().unwrap().is_empty());
    }

    #[test]
    fn test_photo_without_data_scheme_is_invalid() {
        let err = validate(
            &request("cv", "", Some("https://example.com/me.png")),
            EmptyInputPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPhoto(_)));
    }

    #[test]
    fn test_non_image_data_uri_is_invalid() {
        let result = PhotoReference::parse("data:application/pdf;base64,JVBERi0=");
        assert!(matches!(result, Err(ValidationError::InvalidPhoto(_))));
    }

    #[test]
    fn test_image_subtype_must_be_a_plain_token() {
        for uri in [
            "data:image/../../etc;x=y;base64,AAAA",
            "data:image/png/evil;base64,AAAA",
            "data:image/;base64,AAAA",
            "data:image/.hidden;base64,AAAA",
        ] {
            assert!(
                matches!(PhotoReference::parse(uri), Err(ValidationError::InvalidPhoto(_))),
                "{uri} should be rejected"
            );
        }

        let svg = PhotoReference::parse("data:image/svg+xml;base64,PHN2Zz4=").unwrap();
        assert_eq!(svg.extension(), "svg");
    }

    #[test]
    fn test_non_base64_data_uri_is_invalid() {
        assert!(PhotoReference::parse("data:image/png,rawbytes").is_err());
        assert!(PhotoReference::parse("data:image/png;base64,@@not base64@@").is_err());
        assert!(PhotoReference::parse("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_photo_checked_even_under_lenient_policy() {
        let result = validate(&request("", "", Some("garbage")), EmptyInputPolicy::Lenient);
        assert!(matches!(result, Err(ValidationError::InvalidPhoto(_))));
    }

    #[test]
    fn test_jpeg_extension_is_jpg() {
        let photo = PhotoReference::parse("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(photo.extension(), "jpg");
    }

    #[test]
    fn test_mode_required_parts() {
        assert_eq!(GenerationMode::ResumeOnly.required_parts(), vec![Part::Resume]);
        assert_eq!(
            GenerationMode::CoverLetterOnly.required_parts(),
            vec![Part::CoverLetter]
        );
        assert_eq!(
            GenerationMode::Both.required_parts(),
            vec![Part::Resume, Part::CoverLetter]
        );
    }

    #[test]
    fn test_covering_mode() {
        assert_eq!(
            GenerationMode::covering(&[Part::CoverLetter]),
            Some(GenerationMode::CoverLetterOnly)
        );
        assert_eq!(
            GenerationMode::covering(&[Part::CoverLetter, Part::Resume]),
            Some(GenerationMode::Both)
        );
        assert_eq!(GenerationMode::covering(&[]), None);
    }

    #[test]
    fn test_request_deserializes_original_field_names() {
        let json = serde_json::json!({
            "resume": "My resume",
            "photoDataUri": PNG_URI,
            "generationMode": "coverLetterOnly"
        });
        let request: GenerationRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.resume_text, "My resume");
        assert_eq!(request.job_description, "");
        assert_eq!(request.generation_mode, GenerationMode::CoverLetterOnly);
    }
}
