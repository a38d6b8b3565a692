use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::orchestrator::GenerationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Generation(e) => generation_parts(e),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::S3(msg) => {
                tracing::error!("S3 error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "S3_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

/// Each generation failure gets its own code so the client can pick a distinct message.
fn generation_parts(err: &GenerationError) -> (StatusCode, &'static str, String) {
    match err {
        GenerationError::InvalidInput(e) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
        }
        GenerationError::Refused { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "GENERATION_REFUSED",
            "The request was declined by the AI service. Please revise your input.".to_string(),
        ),
        GenerationError::IncompleteGeneration { .. } => {
            tracing::error!("{err}");
            (
                StatusCode::BAD_GATEWAY,
                "INCOMPLETE_GENERATION",
                format!("{err}. Please retry."),
            )
        }
        GenerationError::Unavailable { .. } => {
            tracing::error!("{err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "MODEL_UNAVAILABLE",
                "Failed to generate documents. Please try again later.".to_string(),
            )
        }
        GenerationError::Timeout(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            "GENERATION_TIMEOUT",
            "Generation took too long. Please try again.".to_string(),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::generation::request::{Part, ValidationError};

    #[test]
    fn test_generation_errors_map_to_distinct_codes() {
        let cases = vec![
            (
                GenerationError::InvalidInput(ValidationError::Empty),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                GenerationError::Refused {
                    reason: "policy".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
                "GENERATION_REFUSED",
            ),
            (
                GenerationError::IncompleteGeneration {
                    missing_parts: vec![Part::CoverLetter],
                    attempts: 2,
                },
                StatusCode::BAD_GATEWAY,
                "INCOMPLETE_GENERATION",
            ),
            (
                GenerationError::Unavailable {
                    attempts: 2,
                    message: "503".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
                "MODEL_UNAVAILABLE",
            ),
            (
                GenerationError::Timeout(Duration::from_secs(5)),
                StatusCode::GATEWAY_TIMEOUT,
                "GENERATION_TIMEOUT",
            ),
        ];

        for (err, status, code) in cases {
            let (got_status, got_code, _) = AppError::from(err).parts();
            assert_eq!(got_status, status);
            assert_eq!(got_code, code);
        }
    }

    #[test]
    fn test_incomplete_message_names_missing_part() {
        let err = AppError::from(GenerationError::IncompleteGeneration {
            missing_parts: vec![Part::CoverLetter],
            attempts: 2,
        });
        let (_, _, message) = err.parts();
        assert!(message.contains("coverLetter"));
    }

    #[test]
    fn test_validation_message_is_surfaced_verbatim() {
        let err = AppError::from(GenerationError::InvalidInput(ValidationError::Empty));
        let (_, _, message) = err.parts();
        assert_eq!(
            message,
            "Please provide either a resume or a job description"
        );
    }
}
