//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::orchestrator::GenerationResult;
use crate::generation::request::GenerationRequest;
use crate::models::profile::ProfileForm;
use crate::profiles::store::save_profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub request: GenerationRequest,
    /// Signed-in user. When present together with `profile`, the form is saved after a
    /// successful generation.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub profile: Option<ProfileForm>,
}

/// POST /api/v1/generate
///
/// Runs the orchestrator and returns `{resume?, coverLetter?}`. Every part the requested mode
/// needs is present, otherwise the call fails with a typed error.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerationResult>, AppError> {
    let photo = body.request.photo_reference.clone();
    let mode = body.request.generation_mode;

    let result = state.orchestrator.generate(body.request).await?;
    info!("Generated {:?} documents", mode);

    if let (Some(user_id), Some(profile)) = (body.user_id, body.profile) {
        let saved = save_profile(
            &state.db,
            &state.s3,
            &state.config.s3_bucket,
            user_id,
            &profile,
            photo.as_deref(),
        )
        .await;
        // The documents are already generated; a failed save must not lose them.
        if let Err(e) = saved {
            warn!("Failed to save profile for user {user_id} after generation: {e}");
        }
    }

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::request::GenerationMode;

    #[test]
    fn test_generate_body_deserialization() {
        let json = serde_json::json!({
            "request": {
                "resume": "Product designer, 6 years",
                "jobDescription": "Senior designer at a fintech",
                "generationMode": "both"
            },
            "userId": Uuid::new_v4(),
            "profile": {"name": "Noor", "experiences": [], "educations": []}
        });

        let body: GenerateBody = serde_json::from_value(json).unwrap();
        assert_eq!(body.request.resume_text, "Product designer, 6 years");
        assert_eq!(body.request.generation_mode, GenerationMode::Both);
        assert!(body.user_id.is_some());
        assert_eq!(body.profile.unwrap().name.as_deref(), Some("Noor"));
    }

    #[test]
    fn test_generate_body_anonymous() {
        let json = serde_json::json!({"request": {"jobDescription": "Barista"}});
        let body: GenerateBody = serde_json::from_value(json).unwrap();
        assert!(body.user_id.is_none());
        assert!(body.profile.is_none());
        assert_eq!(body.request.generation_mode, GenerationMode::Both);
    }
}
