use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Extracts text from an uploaded PDF resume. Parsing is CPU bound and runs off the runtime.
pub async fn extract_resume_text(bytes: Bytes) -> Result<String, AppError> {
    if !looks_like_pdf(&bytes) {
        return Err(AppError::UnprocessableEntity(
            "Uploaded file is not a PDF".to_string(),
        ));
    }

    let size = bytes.len();
    let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?;

    let text = tidy_extracted_text(&raw);
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "PDF contains no extractable text".to_string(),
        ));
    }

    debug!("Extracted {} chars from {} byte PDF", text.len(), size);
    Ok(text)
}

/// Trims line ends and collapses runs of blank lines to one.
pub fn tidy_extracted_text(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in raw.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}
