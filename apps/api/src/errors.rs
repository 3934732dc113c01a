use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::render::RenderError;
use crate::script::generator::GenerationError;

pub const INPUT_MISSING_MESSAGE: &str =
    "Por favor, ingresa un tema o sube un archivo de referencia.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Ocurrió un error al generar el guión. Por favor, intenta de nuevo.";
pub const RENDER_FAILED_MESSAGE: &str = "No se pudo generar el PDF.";
pub const BUSY_MESSAGE: &str = "Ya hay una operación en curso.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Neither a topic nor an attachment was provided")]
    InputMissing,

    #[error("Script generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("PDF export failed: {0}")]
    Render(#[from] RenderError),

    #[error("Another operation is in progress")]
    Busy,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The single message shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InputMissing => INPUT_MISSING_MESSAGE.to_string(),
            AppError::Generation(_) => GENERATION_FAILED_MESSAGE.to_string(),
            AppError::Render(_) => RENDER_FAILED_MESSAGE.to_string(),
            AppError::Busy => BUSY_MESSAGE.to_string(),
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Internal(_) => "Ocurrió un error interno.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InputMissing => (StatusCode::BAD_REQUEST, "INPUT_MISSING"),
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                (StatusCode::BAD_GATEWAY, "GENERATION_ERROR")
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR")
            }
            AppError::Busy => (StatusCode::CONFLICT, "BUSY"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;

    #[test]
    fn test_status_codes() {
        let generation = AppError::Generation(GenerationError::Llm(LlmError::EmptyContent));
        assert_eq!(generation.into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::InputMissing.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Busy.into_response().status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_generation_failures_share_one_message() {
        let transport = AppError::Generation(GenerationError::Llm(LlmError::Api {
            status: 503,
            message: "overloaded".into(),
        }));
        let empty = AppError::Generation(GenerationError::Llm(LlmError::EmptyContent));
        assert_eq!(transport.user_message(), GENERATION_FAILED_MESSAGE);
        assert_eq!(empty.user_message(), GENERATION_FAILED_MESSAGE);
    }
}
