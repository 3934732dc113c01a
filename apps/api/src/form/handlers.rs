use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::attachments::{Attachment, PreviewHandle, UploadedFile};
use crate::form::session::FormSnapshot;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ClearedResponse {
    pub removed: usize,
}

/// GET /api/v1/form
pub async fn handle_get_form(State(state): State<AppState>) -> Json<FormSnapshot> {
    Json(state.form.snapshot().await)
}

/// DELETE /api/v1/form
pub async fn handle_reset_form(State(state): State<AppState>) -> StatusCode {
    state.form.reset().await;
    StatusCode::NO_CONTENT
}

/// POST /api/v1/attachments
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<Attachment>>), AppError> {
    let files = read_files(multipart).await?;
    let added = state.form.add_attachments(files).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// PUT /api/v1/attachments
/// Replaces the whole list, releasing every previous preview.
pub async fn handle_replace(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<Attachment>>, AppError> {
    let files = read_files(multipart).await?;
    let attached = state.form.replace_attachments(files).await?;
    Ok(Json(attached))
}

/// Collects every part carrying a file name, in the order received.
async fn read_files(mut multipart: Multipart) -> Result<Vec<UploadedFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart field: {e}")))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let mime_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file data: {e}")))?;
        files.push(UploadedFile {
            name,
            mime_type,
            bytes,
        });
    }

    if files.is_empty() {
        return Err(AppError::Validation("No file was uploaded".to_string()));
    }
    Ok(files)
}

/// GET /api/v1/attachments/:handle/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(handle): Path<Uuid>,
) -> Result<Response, AppError> {
    let preview = state
        .form
        .preview(PreviewHandle::from_uuid(handle))
        .await
        .ok_or_else(|| AppError::NotFound(format!("Preview {handle} not found")))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, preview.mime_type)],
        preview.bytes,
    )
        .into_response())
}

/// DELETE /api/v1/attachments/:handle
pub async fn handle_remove_attachment(
    State(state): State<AppState>,
    Path(handle): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .form
        .remove_attachment(PreviewHandle::from_uuid(handle))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/attachments
pub async fn handle_clear_attachments(State(state): State<AppState>) -> Json<ClearedResponse> {
    let removed = state.form.clear_attachments().await;
    Json(ClearedResponse { removed })
}
