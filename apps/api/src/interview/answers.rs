use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::answer::InterviewAnswerRow;

/// A question/answer pair as submitted by the interview client.
/// Missing strings are stored as empty; nothing is validated or transformed.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

pub async fn record_answer(
    pool: &PgPool,
    request: &AnswerRequest,
) -> Result<InterviewAnswerRow, sqlx::Error> {
    sqlx::query_as::<_, InterviewAnswerRow>(
        r#"
        INSERT INTO interview_answers (id, user_id, question, answer)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.user_id)
    .bind(&request.question)
    .bind(&request.answer)
    .fetch_one(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_question_and_answer_default_to_empty() {
        let json = r#"{"user_id": "6f1c1a52-6a43-4a38-9a8e-5d2b6f3f0a11"}"#;
        let req: AnswerRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.question, "");
        assert_eq!(req.answer, "");
    }

    #[test]
    fn test_answer_passes_through_untouched() {
        let json = r#"{
            "user_id": "6f1c1a52-6a43-4a38-9a8e-5d2b6f3f0a11",
            "question": "  What was hardest?  ",
            "answer": "The migration.\n"
        }"#;
        let req: AnswerRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.question, "  What was hardest?  ");
        assert_eq!(req.answer, "The migration.\n");
    }

    #[test]
    fn test_user_id_is_required() {
        assert!(serde_json::from_str::<AnswerRequest>(r#"{"question": "Q"}"#).is_err());
    }
}
