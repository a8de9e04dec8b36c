//! Question pipeline — résumé bytes in, interview questions out.
//!
//! Flow: extract text → build prompt → remote inference → parse questions.
//!
//! Extraction problems are absorbed (the pipeline continues with whatever text
//! it has, possibly none). Inference failures and empty parse results end the
//! run with a `PipelineError` carrying a reason code for the logs.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::extraction::{self, ResumeDocument};
use crate::interview::difficulty::Difficulty;
use crate::interview::parser::parse_questions;
use crate::interview::prompts::build_prompt;
use crate::llm_client::{InferenceError, TextGenerator};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("inference unavailable: {0}")]
    InferenceUnavailable(#[source] InferenceError),

    #[error("no questions parsed from generated text")]
    NoQuestionsParsed,
}

impl PipelineError {
    /// Stable identifier for logs and diagnostics. Never shown to end users.
    pub fn reason_code(&self) -> &'static str {
        match self {
            PipelineError::InferenceUnavailable(_) => "inference_unavailable",
            PipelineError::NoQuestionsParsed => "no_questions_parsed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Extracting,
    Prompting,
    Invoking,
    Parsing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Extracting => "extracting",
            Stage::Prompting => "prompting",
            Stage::Invoking => "invoking",
            Stage::Parsing => "parsing",
        })
    }
}

/// Runs one question-generation pass per call. Holds no per-run state.
#[derive(Clone)]
pub struct QuestionPipeline {
    generator: Arc<dyn TextGenerator>,
    max_new_tokens: u32,
}

impl QuestionPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, max_new_tokens: u32) -> Self {
        Self {
            generator,
            max_new_tokens,
        }
    }

    pub async fn run(
        &self,
        document: ResumeDocument,
        difficulty: Difficulty,
    ) -> Result<Vec<String>, PipelineError> {
        debug!(stage = %Stage::Extracting, format = %document.format, "pipeline stage");
        let text = extract_text(document).await;

        debug!(stage = %Stage::Prompting, %difficulty, text_len = text.len(), "pipeline stage");
        let prompt = build_prompt(&text, difficulty);

        debug!(stage = %Stage::Invoking, prompt_len = prompt.len(), "pipeline stage");
        let raw = self
            .generator
            .generate(&prompt, self.max_new_tokens)
            .await
            .map_err(|e| fail(PipelineError::InferenceUnavailable(e)))?;

        debug!(stage = %Stage::Parsing, raw_len = raw.len(), "pipeline stage");
        let questions = parse_questions(&raw, &prompt);
        if questions.is_empty() {
            return Err(fail(PipelineError::NoQuestionsParsed));
        }

        info!("Generated {} interview questions", questions.len());
        Ok(questions)
    }
}

/// Extraction is CPU-bound and may panic on hostile input, so it runs on the
/// blocking pool. Any failure leaves the pipeline with empty text.
async fn extract_text(document: ResumeDocument) -> String {
    let format = document.format;
    tokio::task::spawn_blocking(move || extraction::extract_or_empty(&document.bytes, format))
        .await
        .unwrap_or_else(|e| {
            warn!("Extraction task for {format} document aborted: {e}");
            String::new()
        })
}

fn fail(err: PipelineError) -> PipelineError {
    error!(reason = err.reason_code(), "Question generation failed: {err}");
    err
}
