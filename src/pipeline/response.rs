//! JSON shapes returned to callers.

use super::error::ProcessError;
use super::process::ProcessOutcome;
use serde::{Deserialize, Serialize};

/// Successful response: ranked words, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordResponse {
    /// Words in rank order.
    pub words: Vec<String>,
    /// Generated letters, present only when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_string: Option<String>,
}

impl From<&ProcessOutcome> for WordResponse {
    fn from(outcome: &ProcessOutcome) -> Self {
        Self {
            words: outcome.words.iter().map(|w| w.word.clone()).collect(),
            letter_string: outcome
                .letter_string
                .as_ref()
                .map(|letters| letters.as_str().to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// `input` or `internal`.
    pub kind: String,
}

impl From<&ProcessError> for ErrorBody {
    fn from(err: &ProcessError) -> Self {
        Self {
            error: err.public_message(),
            kind: err.kind().to_string(),
        }
    }
}

/// Confidence figure shown next to the word at `index` in a result list.
///
/// Starts at 0.95 and drops by 0.03 per position, never below 0.5. It
/// reflects list position only and is not the ranking score.
pub fn display_score(index: usize) -> f64 {
    (0.95 - index as f64 * 0.03).max(0.5)
}
