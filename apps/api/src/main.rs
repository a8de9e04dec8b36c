mod config;
mod db;
mod errors;
mod extraction;
mod interview;
mod llm_client;
mod models;
mod resumes;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::interview::pipeline::QuestionPipeline;
use crate::llm_client::{InferenceClient, RetryingGenerator};
use crate::resumes::storage::UploadStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize upload store
    let storage = UploadStore::open(&config.upload_dir).await?;
    info!("Upload store ready at {}", storage.root().display());

    // Initialize inference client (no retry unless INFERENCE_MAX_RETRIES=1)
    let client = InferenceClient::new(&config.inference)?;
    info!(
        "Inference client initialized (endpoint: {}, timeout: {:?}, retries: {})",
        client.endpoint_url(),
        config.inference.timeout,
        config.inference.max_retries
    );
    let generator = RetryingGenerator::new(client, config.inference.max_retries);
    let pipeline = QuestionPipeline::new(Arc::new(generator), config.max_new_tokens);

    // Build app state
    let state = AppState {
        db,
        storage,
        pipeline,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web frontend has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
