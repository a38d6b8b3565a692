use axum::{extract::Multipart, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::intake::pdf::extract_resume_text;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub resume_text: String,
}

/// POST /api/v1/intake/pdf (multipart, field `file`)
pub async fn handle_extract_pdf(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        let resume_text = extract_resume_text(bytes).await?;
        return Ok(Json(ExtractResponse { resume_text }));
    }

    Err(AppError::Validation(
        "Multipart body must contain a 'file' field".to_string(),
    ))
}
