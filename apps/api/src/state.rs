use sqlx::PgPool;

use crate::interview::pipeline::QuestionPipeline;
use crate::resumes::storage::UploadStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub storage: UploadStore,
    /// Question pipeline over the configured inference backend.
    pub pipeline: QuestionPipeline,
}
