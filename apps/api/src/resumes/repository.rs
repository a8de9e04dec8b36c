use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::DocumentFormat;
use crate::models::resume::ResumeRow;

pub struct NewResume<'a> {
    pub user_id: Uuid,
    pub original_filename: &'a str,
    pub stored_name: &'a str,
    pub format: DocumentFormat,
}

pub async fn insert_resume(pool: &PgPool, resume: NewResume<'_>) -> Result<ResumeRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, original_filename, stored_name, format)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(resume.user_id)
    .bind(resume.original_filename)
    .bind(resume.stored_name)
    .bind(resume.format.as_str())
    .fetch_one(pool)
    .await
}

pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Loads a résumé and checks that `user_id` owns it.
pub async fn get_owned_resume(
    pool: &PgPool,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<ResumeRow, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(pool)
        .await?;
    check_owner(row, resume_id, user_id)
}

pub async fn delete_resume(pool: &PgPool, resume_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(resume_id)
        .execute(pool)
        .await?;
    Ok(())
}

fn check_owner(
    row: Option<ResumeRow>,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<ResumeRow, AppError> {
    let row = row.ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
    if row.user_id != user_id {
        tracing::warn!("User {user_id} attempted to access resume {resume_id}");
        return Err(AppError::Forbidden);
    }
    Ok(row)
}
