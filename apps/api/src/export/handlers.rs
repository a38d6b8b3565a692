use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::text::{render_cover_letter_text, render_resume_text};
use crate::generation::orchestrator::GenerationResult;
use crate::generation::request::Part;

#[derive(Debug, Deserialize)]
pub struct ExportTextRequest {
    pub result: GenerationResult,
    pub part: Part,
}

/// POST /api/v1/export/text
///
/// Returns one part of a generation result as a downloadable `.txt` file.
pub async fn handle_export_text(
    Json(req): Json<ExportTextRequest>,
) -> Result<Response, AppError> {
    let (body, filename) = render_part(&req.result, req.part)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

fn render_part(result: &GenerationResult, part: Part) -> Result<(String, &'static str), AppError> {
    match part {
        Part::Resume => result
            .resume
            .as_ref()
            .map(|r| (render_resume_text(r), "resume.txt"))
            .ok_or_else(|| AppError::NotFound("Result has no resume".to_string())),
        Part::CoverLetter => result
            .cover_letter
            .as_deref()
            .map(|c| (render_cover_letter_text(c), "cover-letter.txt"))
            .ok_or_else(|| AppError::NotFound("Result has no cover letter".to_string())),
    }
}
