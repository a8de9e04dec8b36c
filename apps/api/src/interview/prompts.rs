// Interview question prompt template.
// Placeholders: {difficulty}, {tone}, {resume_text}.

use crate::interview::difficulty::Difficulty;

/// Upper bound on the number of questions requested from (and accepted from) the model.
pub const MAX_QUESTIONS: usize = 20;

pub const INTERVIEW_PROMPT_TEMPLATE: &str = "Resume:\n{resume_text}\n\n\
You are a professional interviewer conducting a real, engaging interview. \
Based on the resume above, generate a flowing, natural conversation script that includes \
probing, human-like interview questions. \
Focus on detailed questions about projects, challenges, achievements, and lessons learned. \
Tailor the tone for a {difficulty} interview: {tone}. \
Generate up to 20 unique questions, each on a new line.";

/// Builds the interview prompt for `resume_text` at the given difficulty.
///
/// The résumé text is embedded verbatim and substituted last, so braces inside
/// it are never mistaken for placeholders.
pub fn build_prompt(resume_text: &str, difficulty: Difficulty) -> String {
    INTERVIEW_PROMPT_TEMPLATE
        .replace("{difficulty}", difficulty.as_str())
        .replace("{tone}", difficulty.tone())
        .replace("{resume_text}", resume_text)
}
