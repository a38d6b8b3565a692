//! Pure helpers for assembling a result across attempts.
//!
//! Everything here works on immutable snapshots and returns new values, so the retry loop in
//! the orchestrator stays a thin driver around these functions.

use crate::generation::gateway::{RawModelOutput, RepairInstruction};
use crate::generation::request::{GenerationMode, Part, PhotoReference};
use crate::models::resume::ResumeDocument;

/// Opening of the cover letter quoted in a repair summary.
const COVER_LETTER_PREVIEW_CHARS: usize = 120;

/// Parts collected so far. Holds only parts that passed the non-empty check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub resume: Option<ResumeDocument>,
    pub cover_letter: Option<String>,
}

impl Collected {
    pub fn has(&self, part: Part) -> bool {
        match part {
            Part::Resume => self.resume.is_some(),
            Part::CoverLetter => self.cover_letter.is_some(),
        }
    }

    /// Required parts still missing, in mode order.
    pub fn missing(&self, mode: GenerationMode) -> Vec<Part> {
        mode.required_parts()
            .into_iter()
            .filter(|part| !self.has(*part))
            .collect()
    }

    pub fn is_complete(&self, mode: GenerationMode) -> bool {
        self.missing(mode).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.resume.is_none() && self.cover_letter.is_none()
    }
}

/// Folds one attempt's output into what was already collected.
///
/// Only parts required by `mode` are considered. An existing part is never replaced; a later
/// attempt only fills a gap, and only with a non-empty value.
pub fn merge(collected: &Collected, output: RawModelOutput, mode: GenerationMode) -> Collected {
    let resume = match &collected.resume {
        Some(existing) => Some(existing.clone()),
        None if mode.requires(Part::Resume) => output
            .resume
            .filter(ResumeDocument::is_substantive)
            .map(|r| r.normalized()),
        None => None,
    };

    let cover_letter = match &collected.cover_letter {
        Some(existing) => Some(existing.clone()),
        None if mode.requires(Part::CoverLetter) => output
            .cover_letter
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()),
        None => None,
    };

    Collected {
        resume,
        cover_letter,
    }
}

/// Builds the instruction for a repair retry: the missing parts plus one summary line per part
/// already produced. The produced parts themselves are never included.
pub fn repair_instruction(collected: &Collected, mode: GenerationMode) -> RepairInstruction {
    let mut produced_summary = Vec::new();
    if let Some(resume) = &collected.resume {
        produced_summary.push(summarize_resume(resume));
    }
    if let Some(letter) = &collected.cover_letter {
        produced_summary.push(summarize_cover_letter(letter));
    }

    RepairInstruction {
        missing: collected.missing(mode),
        produced_summary,
    }
}

fn summarize_resume(resume: &ResumeDocument) -> String {
    let headline = match &resume.professional_title {
        Some(title) => format!("{}, {}", resume.name, title),
        None => resume.name.clone(),
    };
    format!(
        "resume for {headline}: {} experience entries, {} education entries, {} skills",
        resume.experience.len(),
        resume.education.len(),
        resume.skills.len()
    )
}

fn summarize_cover_letter(letter: &str) -> String {
    let words = letter.split_whitespace().count();
    let mut opening: String = letter
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(COVER_LETTER_PREVIEW_CHARS)
        .collect();
    if words > 0 && opening.chars().count() == COVER_LETTER_PREVIEW_CHARS {
        opening.push('…');
    }
    format!("coverLetter ({words} words) opening: \"{opening}\"")
}

/// Forces the resume's photo to the request's photo. Without a request photo any photo the
/// model emitted is dropped: photo data only ever comes from the user.
pub fn with_photo_passthrough(
    resume: ResumeDocument,
    photo: Option<&PhotoReference>,
) -> ResumeDocument {
    ResumeDocument {
        photo_reference: photo.map(|p| p.as_str().to_string()),
        ..resume
    }
}
