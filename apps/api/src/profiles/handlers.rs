use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileForm;
use crate::profiles::store::{get_profile, save_profile, SavedProfile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub form_data: ProfileForm,
    #[serde(default)]
    pub photo_data_uri: Option<String>,
}

/// PUT /api/v1/profiles/:user_id
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SaveProfileRequest>,
) -> Result<Json<SavedProfile>, AppError> {
    let saved = save_profile(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        user_id,
        &req.form_data,
        req.photo_data_uri.as_deref(),
    )
    .await?;
    Ok(Json(saved))
}

/// GET /api/v1/profiles/:user_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<SavedProfile>, AppError> {
    Ok(Json(get_profile(&state.db, user_id).await?))
}
