// Mock interview: résumé → tailored questions, plus answer recording.
// All inference calls go through llm_client — no direct HTTP calls here.

pub mod answers;
pub mod difficulty;
pub mod handlers;
pub mod parser;
pub mod pipeline;
pub mod prompts;
