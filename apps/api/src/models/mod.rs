pub mod answer;
pub mod resume;
