//! Inference client — the single point of entry for remote text generation.
//!
//! Talks to a Hugging Face style text-generation endpoint:
//! `POST {"inputs", "parameters"}` with a bearer token, answered by
//! `[{"generated_text": "..."}]`.
//!
//! Failures never escape as panics or raw transport errors: every fault is folded
//! into `InferenceError`, which carries the status and body for diagnostics.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_MAX_NEW_TOKENS: u32 = 600;
const TEMPERATURE: f32 = 0.7;
const TOP_K: u32 = 50;
const TOP_P: f32 = 0.95;
/// At most one retry is ever attempted, whatever the configuration says.
pub const MAX_RETRIES_CEILING: u32 = 1;
const RETRY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Inference API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed inference response ({reason}): {body}")]
    MalformedBody { reason: String, body: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl InferenceError {
    /// Transport faults, rate limiting and server errors may succeed on a second try.
    pub fn is_transient(&self) -> bool {
        match self {
            InferenceError::Transport(_) => true,
            InferenceError::Status { status, .. } => *status == 429 || *status >= 500,
            InferenceError::MalformedBody { .. } | InferenceError::ClientBuild(_) => false,
        }
    }
}

/// Endpoint and credentials for the inference backend.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub endpoint_url: String,
    pub api_token: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

/// Sampling configuration sent with every request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub do_sample: bool,
}

impl GenerationParameters {
    pub fn with_max_new_tokens(max_new_tokens: u32) -> Self {
        Self {
            max_new_tokens,
            temperature: TEMPERATURE,
            top_k: TOP_K,
            top_p: TOP_P,
            do_sample: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResult {
    generated_text: String,
}

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String, InferenceError>;
}

/// HTTP client for the text-generation endpoint. Performs no retries.
#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    endpoint_url: String,
    api_token: String,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::ClientBuild(e.to_string()))?;
        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait]
impl TextGenerator for InferenceClient {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String, InferenceError> {
        let request_body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters::with_max_new_tokens(max_new_tokens),
        };

        let response = self
            .client
            .post(&self.endpoint_url)
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != reqwest::StatusCode::OK {
            warn!("Inference API returned {}: {}", status, body);
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let generated = first_generated_text(&body)?;
        debug!(
            "Inference call succeeded: {} chars generated",
            generated.len()
        );
        Ok(generated)
    }
}

/// Pulls `generated_text` out of the first element of a `[{...}]` body.
fn first_generated_text(body: &str) -> Result<String, InferenceError> {
    let results: Vec<GenerationResult> =
        serde_json::from_str(body).map_err(|e| InferenceError::MalformedBody {
            reason: e.to_string(),
            body: body.to_string(),
        })?;

    results
        .into_iter()
        .next()
        .map(|r| r.generated_text)
        .ok_or_else(|| InferenceError::MalformedBody {
            reason: "empty result list".to_string(),
            body: body.to_string(),
        })
}

/// Wraps a generator with a bounded retry on transient failures.
pub struct RetryingGenerator<G> {
    inner: G,
    max_retries: u32,
    delay: Duration,
}

impl<G: TextGenerator> RetryingGenerator<G> {
    /// `max_retries` is clamped to `MAX_RETRIES_CEILING`.
    pub fn new(inner: G, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries: max_retries.min(MAX_RETRIES_CEILING),
            delay: RETRY_DELAY,
        }
    }

    #[cfg(test)]
    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for RetryingGenerator<G> {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String, InferenceError> {
        let mut attempt = 0;
        loop {
            match self.inner.generate(prompt, max_new_tokens).await {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Inference attempt {} failed ({e}), retrying after {}ms...",
                        attempt,
                        self.delay.as_millis()
                    );
                    tokio::time::sleep(self.delay).await;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/generate")
    }

    fn client_for(url: String) -> InferenceClient {
        InferenceClient::new(&InferenceConfig {
            endpoint_url: url,
            api_token: "test-token".to_string(),
            timeout: Duration::from_secs(5),
            max_retries: 0,
        })
        .unwrap()
    }

    #[test]
    fn test_generation_parameters_defaults() {
        let params = GenerationParameters::with_max_new_tokens(DEFAULT_MAX_NEW_TOKENS);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["max_new_tokens"], 600);
        assert_eq!(value["top_k"], 50);
        assert_eq!(value["do_sample"], true);
        assert!((params.temperature - 0.7).abs() < f32::EPSILON);
        assert!((params.top_p - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_first_generated_text_takes_first_result() {
        let body = r#"[{"generated_text": "Q1\nQ2"}, {"generated_text": "ignored"}]"#;
        assert_eq!(first_generated_text(body).unwrap(), "Q1\nQ2");
    }

    #[test]
    fn test_first_generated_text_rejects_unexpected_shapes() {
        for body in [
            "[]",
            r#"{"generated_text": "not a list"}"#,
            r#"[{"text": "wrong field"}]"#,
            "<html>gateway</html>",
        ] {
            let err = first_generated_text(body).unwrap_err();
            assert!(
                matches!(err, InferenceError::MalformedBody { body: ref got, .. } if got == body),
                "unexpected error for {body}: {err}"
            );
        }
    }

    #[test]
    fn test_transient_classification() {
        let status = |status| InferenceError::Status {
            status,
            body: String::new(),
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(400).is_transient());
        assert!(!InferenceError::MalformedBody {
            reason: "x".into(),
            body: String::new()
        }
        .is_transient());
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_parameters_and_bearer_token() {
        let seen: Arc<Mutex<Option<(Value, String)>>> = Arc::new(Mutex::new(None));
        let captured = seen.clone();
        let router = Router::new().route(
            "/generate",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *captured.lock().unwrap() = Some((body, auth));
                    Json(json!([{ "generated_text": "Tell me about X?\nWhat was hardest?\n" }]))
                }
            }),
        );
        let client = client_for(serve(router).await);

        let text = client.generate("the prompt", 321).await.unwrap();
        assert_eq!(text, "Tell me about X?\nWhat was hardest?\n");

        let (body, auth) = seen.lock().unwrap().take().unwrap();
        assert_eq!(auth, "Bearer test-token");
        assert_eq!(body["inputs"], "the prompt");
        assert_eq!(body["parameters"]["max_new_tokens"], 321);
        assert_eq!(body["parameters"]["do_sample"], true);
    }

    #[tokio::test]
    async fn test_generate_non_200_is_status_error() {
        let router = Router::new().route(
            "/generate",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model is loading") }),
        );
        let client = client_for(serve(router).await);

        match client.generate("p", 10).await {
            Err(InferenceError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "model is loading");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_other_2xx_is_status_error() {
        let router = Router::new().route(
            "/generate",
            post(|| async { (StatusCode::ACCEPTED, Json(json!([{ "generated_text": "Q" }]))) }),
        );
        let client = client_for(serve(router).await);

        let err = client.generate("p", 10).await.unwrap_err();
        assert!(matches!(err, InferenceError::Status { status: 202, .. }));
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let router = Router::new().route(
            "/generate",
            post(|| async { Json(json!({ "error": "unexpected" })) }),
        );
        let client = client_for(serve(router).await);

        let err = client.generate("p", 10).await.unwrap_err();
        assert!(matches!(err, InferenceError::MalformedBody { .. }));
    }

    #[tokio::test]
    async fn test_generate_connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(format!("http://{addr}/generate"));

        let err = client.generate("p", 10).await.unwrap_err();
        assert!(matches!(err, InferenceError::Transport(_)));
        assert!(err.is_transient());
    }

    struct Flaky {
        calls: AtomicU32,
        failures: u32,
        status: u16,
    }

    #[async_trait]
    impl TextGenerator for Flaky {
        async fn generate(&self, _prompt: &str, _max: u32) -> Result<String, InferenceError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(InferenceError::Status {
                    status: self.status,
                    body: "down".to_string(),
                })
            } else {
                Ok("Q1".to_string())
            }
        }
    }

    fn flaky(failures: u32, status: u16) -> Flaky {
        Flaky {
            calls: AtomicU32::new(0),
            failures,
            status,
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_after_one_transient_failure() {
        let generator = RetryingGenerator::new(flaky(1, 503), 1).with_delay(Duration::ZERO);
        assert_eq!(generator.generate("p", 10).await.unwrap(), "Q1");
        assert_eq!(generator.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_is_capped_at_one() {
        let generator = RetryingGenerator::new(flaky(5, 503), 10).with_delay(Duration::ZERO);
        assert!(generator.generate("p", 10).await.is_err());
        assert_eq!(generator.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_retry_by_default_or_for_client_errors() {
        let generator = RetryingGenerator::new(flaky(1, 503), 0).with_delay(Duration::ZERO);
        assert!(generator.generate("p", 10).await.is_err());
        assert_eq!(generator.inner.calls.load(Ordering::SeqCst), 1);

        let generator = RetryingGenerator::new(flaky(1, 401), 1).with_delay(Duration::ZERO);
        assert!(generator.generate("p", 10).await.is_err());
        assert_eq!(generator.inner.calls.load(Ordering::SeqCst), 1);
    }
}
