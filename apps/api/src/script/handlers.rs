use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::form::session::ScriptResult;
use crate::script::display::render_text;
use crate::script::models::GeneratedScript;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: String,
}

fn no_script() -> AppError {
    AppError::NotFound("No script has been generated".to_string())
}

/// POST /api/v1/scripts/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GeneratedScript>, AppError> {
    let script = state.form.generate(state.llm.clone(), &req.topic).await?;
    Ok(Json(script))
}

/// GET /api/v1/scripts/current
pub async fn handle_current(State(state): State<AppState>) -> Result<Json<ScriptResult>, AppError> {
    let result = state.form.current().await.ok_or_else(no_script)?;
    Ok(Json(result))
}

/// GET /api/v1/scripts/current/text
pub async fn handle_current_text(State(state): State<AppState>) -> Result<String, AppError> {
    let result = state.form.current().await.ok_or_else(no_script)?;
    Ok(render_text(&result.script))
}

/// GET /api/v1/scripts/current/pdf
pub async fn handle_current_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    let exported = state.form.export_pdf(&state.page_config).await?;
    let disposition = format!("attachment; filename=\"{}\"", exported.filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.bytes,
    )
        .into_response())
}
