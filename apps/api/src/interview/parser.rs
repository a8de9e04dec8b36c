//! Question parsing — turns raw generated text into an ordered list of questions.

use crate::interview::prompts::MAX_QUESTIONS;

/// Parses raw model output into at most `MAX_QUESTIONS` questions.
///
/// Some backends echo the prompt before the completion, so a verbatim prompt
/// prefix is dropped first. The rest is split into lines, trimmed, and blank
/// lines are discarded. Order is preserved; nothing is reordered or deduplicated.
pub fn parse_questions(raw_text: &str, prompt: &str) -> Vec<String> {
    let completion = if prompt.is_empty() {
        raw_text
    } else {
        raw_text.strip_prefix(prompt).unwrap_or(raw_text)
    };

    completion
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_QUESTIONS)
        .map(String::from)
        .collect()
}
