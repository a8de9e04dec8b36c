//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::ResumeDocument;
use crate::interview::answers::{record_answer, AnswerRequest};
use crate::interview::difficulty::Difficulty;
use crate::resumes::repository::get_owned_resume;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    pub user_id: Uuid,
    /// Defaults to medium when absent or empty.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub difficulty: Option<Difficulty>,
}

/// `?difficulty=` with no value means "not chosen", not an invalid tier.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}

/// GET /api/v1/resumes/:id/questions?user_id=&difficulty=
///
/// Runs the question pipeline over the stored résumé. An empty result is a
/// server error; the reason stays in the logs.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<QuestionsQuery>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let resume = get_owned_resume(&state.db, resume_id, params.user_id).await?;
    let bytes = state.storage.read(&resume.stored_name).await?;
    let difficulty = params.difficulty.unwrap_or_default();

    info!(
        "Generating {} questions for resume {} ({})",
        difficulty, resume.id, resume.format
    );
    let document = ResumeDocument {
        format: resume.document_format(),
        bytes,
    };
    let questions = state.pipeline.run(document, difficulty).await?;

    Ok(Json(QuestionsResponse { questions }))
}

/// POST /api/v1/answers
pub async fn handle_store_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<Value>, AppError> {
    let row = record_answer(&state.db, &request).await?;
    info!("Recorded answer {} for user {}", row.id, row.user_id);
    Ok(Json(json!({ "status": "success" })))
}
