//! Difficulty tiers — map the interview difficulty to the tone asked of the model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Interview difficulty. Only shapes prompt phrasing, never pipeline structure.
///
/// Deserialization goes through `FromStr`, so case and surrounding whitespace
/// are ignored wherever a difficulty is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Tone descriptor embedded in the prompt for this tier.
    pub fn tone(&self) -> &'static str {
        match self {
            Difficulty::Easy => "friendly and general",
            Difficulty::Medium => "balanced",
            Difficulty::Hard => "technical and challenging",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
