use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::kinds::RequestKind;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required fields for {kind}: {}", .missing_keys.join(", "))]
    MissingFields {
        kind: RequestKind,
        missing_keys: Vec<String>,
    },

    #[error("Unknown request kind: {0}")]
    UnknownRequestKind(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Could not extract text from the document")]
    Extraction,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::MissingFields { missing_keys, .. } => (
                StatusCode::BAD_REQUEST,
                "MISSING_FIELDS",
                format!(
                    "Please fill in all required fields: {}",
                    missing_keys.join(", ")
                ),
            ),
            AppError::UnknownRequestKind(tag) => (
                StatusCode::NOT_FOUND,
                "UNKNOWN_REQUEST_KIND",
                format!("Unknown request kind '{tag}'"),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_FAILED",
                    "Could not generate a response".to_string(),
                )
            }
            AppError::Extraction => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_FAILED",
                "Could not read the document".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

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

    #[test]
    fn test_missing_fields_display_lists_keys() {
        let err = AppError::MissingFields {
            kind: RequestKind::BestAtsResume,
            missing_keys: vec!["skills".to_string(), "projects".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields for best_ats_resume: skills, projects"
        );
    }

    #[test]
    fn test_status_codes() {
        let status = |e: AppError| e.into_response().status();

        assert_eq!(
            status(AppError::MissingFields {
                kind: RequestKind::Chat,
                missing_keys: vec![]
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(AppError::UnknownRequestKind("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(AppError::Generation(LlmError::EmptyContent { reason: None })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status(AppError::Extraction), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status(AppError::Internal(anyhow::anyhow!("blocking task panicked"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
