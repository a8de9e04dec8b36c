use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::extraction::DocumentFormat;

/// An uploaded résumé. The bytes live in the upload store under `stored_name`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_filename: String,
    pub stored_name: String,
    /// "pdf" | "docx" | "unsupported", resolved once at upload.
    pub format: String,
    pub created_at: DateTime<Utc>,
}

impl ResumeRow {
    pub fn document_format(&self) -> DocumentFormat {
        self.format.parse().unwrap_or(DocumentFormat::Unsupported)
    }
}
