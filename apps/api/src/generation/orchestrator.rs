//! Generation Orchestrator: turns one request into a complete result or a typed failure.
//!
//! Flow: validate → invoke gateway → completeness check → (repair retry → merge)* →
//!       photo passthrough → result.
//!
//! At most `MAX_ATTEMPTS` gateway invocations per call. Incomplete responses, malformed
//! responses and unavailability all draw from that one budget; a refusal ends the call at once.
//! The orchestrator keeps no state between calls.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::generation::gateway::{Gateway, GatewayError};
use crate::generation::merge::{merge, repair_instruction, with_photo_passthrough, Collected};
use crate::generation::request::{
    validate, EmptyInputPolicy, GenerationMode, GenerationRequest, Part, ValidatedRequest,
    ValidationError,
};
use crate::models::resume::ResumeDocument;

/// First call plus one repair retry.
pub const MAX_ATTEMPTS: u32 = 2;

// ────────────────────────────────────────────────────────────────────────────
// Output and errors
// ────────────────────────────────────────────────────────────────────────────

/// The assembled output. Every part the request's mode requires is present; parts it did not
/// require are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumeDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("the model refused to generate: {reason}")]
    Refused { reason: String },

    #[error(
        "generation incomplete after {attempts} attempts; missing: {}",
        join_parts(.missing_parts)
    )]
    IncompleteGeneration {
        missing_parts: Vec<Part>,
        attempts: u32,
    },

    #[error("model unavailable after {attempts} attempts: {message}")]
    Unavailable { attempts: u32, message: String },

    #[error("generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

fn join_parts(parts: &[Part]) -> String {
    parts.iter().map(Part::label).collect::<Vec<_>>().join(", ")
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GenerationOrchestrator {
    gateway: Arc<dyn Gateway>,
    policy: EmptyInputPolicy,
    timeout: Option<Duration>,
}

impl GenerationOrchestrator {
    pub fn new(gateway: Arc<dyn Gateway>, policy: EmptyInputPolicy) -> Self {
        Self {
            gateway,
            policy,
            timeout: None,
        }
    }

    /// Bounds the whole call, retries included. On expiry the in-flight gateway call is dropped.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(request))
                .await
                .map_err(|_| {
                    warn!("Generation timed out after {}s", limit.as_secs());
                    GenerationError::Timeout(limit)
                })?,
            None => self.run(request).await,
        }
    }

    async fn run(&self, request: GenerationRequest) -> Result<GenerationResult, GenerationError> {
        let validated = validate(&request, self.policy)?;
        let mode = validated.mode();

        let mut collected = Collected::default();
        // Set when the latest attempt failed as unavailable; cleared by any response.
        let mut last_unavailable: Option<String> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let (attempt_mode, repair) = if attempt == 1 {
                (mode, None)
            } else if collected.is_empty() && last_unavailable.is_some() {
                // Nothing came back at all: resend the original request.
                (mode, None)
            } else {
                let repair = repair_instruction(&collected, mode);
                let narrowed = GenerationMode::covering(&repair.missing).unwrap_or(mode);
                (narrowed, Some(repair))
            };

            info!(
                "Generation attempt {}/{}: mode={:?} repair={}",
                attempt,
                MAX_ATTEMPTS,
                attempt_mode,
                repair.is_some()
            );

            match self
                .gateway
                .invoke(&validated, attempt_mode, repair.as_ref())
                .await
            {
                Ok(output) => {
                    last_unavailable = None;
                    collected = merge(&collected, output, mode);
                }
                Err(GatewayError::Rejected(reason)) => {
                    warn!("Generation refused on attempt {attempt}: {reason}");
                    return Err(GenerationError::Refused { reason });
                }
                Err(GatewayError::Malformed(reason)) => {
                    last_unavailable = None;
                    warn!("Attempt {attempt} returned malformed output: {reason}");
                }
                Err(GatewayError::Unavailable(reason)) => {
                    warn!("Attempt {attempt} failed, model unavailable: {reason}");
                    last_unavailable = Some(reason);
                }
            }

            if collected.is_complete(mode) {
                info!("Generation complete for {:?} after {} attempt(s)", mode, attempt);
                return Ok(assemble(collected, &validated));
            }

            warn!(
                "Attempt {}/{} incomplete; missing: {}",
                attempt,
                MAX_ATTEMPTS,
                join_parts(&collected.missing(mode))
            );
        }

        match last_unavailable {
            Some(message) if collected.is_empty() => Err(GenerationError::Unavailable {
                attempts: MAX_ATTEMPTS,
                message,
            }),
            _ => Err(GenerationError::IncompleteGeneration {
                missing_parts: collected.missing(mode),
                attempts: MAX_ATTEMPTS,
            }),
        }
    }
}

fn assemble(collected: Collected, validated: &ValidatedRequest) -> GenerationResult {
    GenerationResult {
        resume: collected
            .resume
            .map(|resume| with_photo_passthrough(resume, validated.photo())),
        cover_letter: collected.cover_letter,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
