//! The learner's self-reported recall for one review.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOutcome {
    Forgot,
    Struggled,
    Easy,
}

impl ReviewOutcome {
    pub const ALL: [ReviewOutcome; 3] = [Self::Forgot, Self::Struggled, Self::Easy];

    /// Map a button number (1 = forgot, 2 = struggled, 3 = easy).
    pub fn from_button(button: u8) -> Option<Self> {
        match button {
            1 => Some(Self::Forgot),
            2 => Some(Self::Struggled),
            3 => Some(Self::Easy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forgot => "forgot",
            Self::Struggled => "struggled",
            Self::Easy => "easy",
        }
    }
}

impl fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown review outcome: {0}")]
pub struct ParseOutcomeError(pub String);

impl FromStr for ReviewOutcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forgot" | "1" => Ok(Self::Forgot),
            "struggled" | "2" => Ok(Self::Struggled),
            "easy" | "3" => Ok(Self::Easy),
            other => Err(ParseOutcomeError(other.to_string())),
        }
    }
}
