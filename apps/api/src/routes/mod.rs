pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list).post(resumes::handle_upload),
        )
        .route("/api/v1/resumes/:id", delete(resumes::handle_delete))
        .route("/api/v1/resumes/:id/file", get(resumes::handle_download))
        // Interview API
        .route(
            "/api/v1/resumes/:id/questions",
            get(interview::handle_generate_questions),
        )
        .route("/api/v1/answers", post(interview::handle_store_answer))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::interview::pipeline::QuestionPipeline;
    use crate::llm_client::{InferenceError, TextGenerator};
    use crate::resumes::storage::UploadStore;

    struct Unreachable;

    #[async_trait]
    impl TextGenerator for Unreachable {
        async fn generate(&self, _prompt: &str, _max: u32) -> Result<String, InferenceError> {
            panic!("inference must not be called in routing tests");
        }
    }

    /// Router over a lazy pool that never connects; only exercises paths that
    /// are rejected before touching the database.
    async fn setup_test_app() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            db: PgPoolOptions::new()
                .connect_lazy("postgres://localhost/unused")
                .unwrap(),
            storage: UploadStore::open(dir.path()).await.unwrap(),
            pipeline: QuestionPipeline::new(Arc::new(Unreachable), 600),
        };
        (build_router(state), dir)
    }

    async fn status_of(app: Router, request: Request<Body>) -> StatusCode {
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = setup_test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "interview-api");
    }

    #[tokio::test]
    async fn test_unknown_difficulty_is_rejected() {
        let (app, _dir) = setup_test_app().await;
        let uri = format!(
            "/api/v1/resumes/{}/questions?user_id={}&difficulty=extreme",
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4()
        );
        let status = status_of(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_questions_require_user_id() {
        let (app, _dir) = setup_test_app().await;
        let uri = format!("/api/v1/resumes/{}/questions", uuid::Uuid::new_v4());
        let status = status_of(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_uuid_resume_id_is_rejected() {
        let (app, _dir) = setup_test_app().await;
        let uri = format!(
            "/api/v1/resumes/not-a-uuid/questions?user_id={}",
            uuid::Uuid::new_v4()
        );
        let status = status_of(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_answer_without_user_id_is_rejected() {
        let (app, _dir) = setup_test_app().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/answers")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question": "Q", "answer": "A"}"#))
            .unwrap();
        assert_eq!(status_of(app, request).await, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
