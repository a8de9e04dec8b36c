//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::DocumentFormat;
use crate::models::resume::ResumeRow;
use crate::resumes::repository::{
    delete_resume, get_owned_resume, insert_resume, list_resumes, NewResume,
};
use crate::resumes::storage::{sanitize_filename, UploadStore};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// POST /api/v1/resumes
///
/// Multipart fields: `user_id` (UUID) and `file` (the document; `resume` is also accepted).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let mut user_id: Option<Uuid> = None;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("user_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid user_id field: {e}")))?;
                user_id = Some(text.trim().parse().map_err(|_| {
                    AppError::Validation("user_id must be a valid UUID".to_string())
                })?);
            }
            Some("file") | Some("resume") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file field: {e}")))?;
                upload = Some((filename, data));
            }
            _ => {}
        }
    }

    let user_id = user_id.ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;
    let (filename, data) = upload
        .filter(|(filename, _)| !filename.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No file selected.".to_string()))?;

    let original_filename = sanitize_filename(&filename);
    let format = DocumentFormat::from_filename(&original_filename);
    let stored_name = state.storage.save(&original_filename, &data).await?;

    let inserted = insert_resume(
        &state.db,
        NewResume {
            user_id,
            original_filename: &original_filename,
            stored_name: &stored_name,
            format,
        },
    )
    .await;

    let resume = match inserted {
        Ok(row) => row,
        Err(e) => {
            // Don't leave orphaned bytes behind
            if let Err(cleanup) = state.storage.remove(&stored_name).await {
                warn!("Failed to remove orphaned upload {stored_name}: {cleanup}");
            }
            return Err(e.into());
        }
    };

    info!(
        "Stored {} resume {} ({} bytes) for user {}",
        format,
        resume.id,
        data.len(),
        user_id
    );
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes?user_id=
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(list_resumes(&state.db, params.user_id).await?))
}

/// GET /api/v1/resumes/:id/file?user_id=
///
/// Returns the raw document with a content type matching its format.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let resume = get_owned_resume(&state.db, resume_id, params.user_id).await?;
    let data = state.storage.read(&resume.stored_name).await?;

    let headers = [
        (
            header::CONTENT_TYPE,
            resume.document_format().content_type().to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", resume.original_filename),
        ),
    ];
    Ok((headers, data))
}

/// DELETE /api/v1/resumes/:id?user_id=
///
/// Deletes the row, then the stored bytes. A file left behind is only logged.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let resume = get_owned_resume(&state.db, resume_id, params.user_id).await?;
    delete_resume(&state.db, resume.id).await?;
    discard_stored_bytes(&state.storage, &resume.stored_name).await;

    info!("Deleted resume {} for user {}", resume.id, params.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Best-effort removal of bytes whose row is already gone. Returns whether the
/// store is now clean.
async fn discard_stored_bytes(storage: &UploadStore, stored_name: &str) -> bool {
    match storage.remove(stored_name).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Resume row deleted but stored file {} was not: {}", stored_name, e);
            false
        }
    }
}
