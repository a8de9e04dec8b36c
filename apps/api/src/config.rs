use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{InferenceConfig, DEFAULT_MAX_NEW_TOKENS, MAX_RETRIES_CEILING};

const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/google/flan-t5-large";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub inference: InferenceConfig,
    pub max_new_tokens: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_retries: u32 = parse_env("INFERENCE_MAX_RETRIES", 0)?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            inference: InferenceConfig {
                endpoint_url: std::env::var("HF_MODEL_URL")
                    .unwrap_or_else(|_| DEFAULT_MODEL_URL.to_string()),
                api_token: require_env("HF_API_TOKEN")?,
                timeout: Duration::from_secs(parse_env("INFERENCE_TIMEOUT_SECS", 120)?),
                max_retries: max_retries.min(MAX_RETRIES_CEILING),
            },
            max_new_tokens: parse_env("INFERENCE_MAX_NEW_TOKENS", DEFAULT_MAX_NEW_TOKENS)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
