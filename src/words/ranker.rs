//! Word scoring and top-N selection.
//!
//! The score blends word length and occurrence count, each min-max
//! normalized over the current result set:
//!
//! ```text
//! score = (w_len * norm(length) + w_freq * norm(count)) / (w_len + w_freq)
//! norm(x) = (x - min) / (max - min), or 1.0 when min == max
//! ```
//!
//! Scores therefore stay in [0, 1] whatever the image size. Ordering is
//! score descending, then length descending, then first occurrence
//! ascending, then the word itself.

use super::extractor::WordStat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Invalid ranking settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankingError {
    #[error("length weight must be positive and finite, got {0}")]
    InvalidLengthWeight(f64),
    #[error("frequency weight must be non-negative and finite, got {0}")]
    InvalidFrequencyWeight(f64),
}

/// Relative weight of length and frequency in the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight of normalized word length. Must be positive.
    pub length: f64,
    /// Weight of normalized occurrence count.
    pub frequency: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            length: 0.7,
            frequency: 0.3,
        }
    }
}

impl ScoringWeights {
    /// Ranks by length alone.
    pub fn length_only() -> Self {
        Self {
            length: 1.0,
            frequency: 0.0,
        }
    }

    /// Validates the weights.
    pub fn validate(&self) -> Result<(), RankingError> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(RankingError::InvalidLengthWeight(self.length));
        }
        if !self.frequency.is_finite() || self.frequency < 0.0 {
            return Err(RankingError::InvalidFrequencyWeight(self.frequency));
        }
        Ok(())
    }
}

/// A ranked word with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredWord {
    pub word: String,
    /// Score in [0, 1].
    pub score: f64,
}

/// Observed range of one feature.
#[derive(Debug, Clone, Copy)]
struct Span {
    min: f64,
    max: f64,
}

impl Span {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Self {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |span, v| Self {
                min: span.min.min(v),
                max: span.max.max(v),
            },
        )
    }

    fn normalize(&self, v: f64) -> f64 {
        let width = self.max - self.min;
        if width > 0.0 {
            ((v - self.min) / width).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Scores word stats and selects the best `top_n`.
#[derive(Debug, Clone)]
pub struct WordRanker {
    weights: ScoringWeights,
    top_n: usize,
}

impl WordRanker {
    /// Creates a ranker, rejecting invalid weights.
    pub fn new(weights: ScoringWeights, top_n: usize) -> Result<Self, RankingError> {
        weights.validate()?;
        Ok(Self { weights, top_n })
    }

    /// Returns the weights.
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Returns the maximum number of results.
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Scores every stat, sorts by ranking order and keeps the top N.
    pub fn rank(&self, stats: &[WordStat]) -> Vec<ScoredWord> {
        if stats.is_empty() || self.top_n == 0 {
            return Vec::new();
        }

        let lengths = Span::of(stats.iter().map(|s| s.length as f64));
        let counts = Span::of(stats.iter().map(|s| s.count as f64));
        let total = self.weights.length + self.weights.frequency;

        let mut scored: Vec<(&WordStat, f64)> = stats
            .iter()
            .map(|stat| {
                let blended = self.weights.length * lengths.normalize(stat.length as f64)
                    + self.weights.frequency * counts.normalize(stat.count as f64);
                (stat, (blended / total).clamp(0.0, 1.0))
            })
            .collect();

        scored.sort_by(|(a, sa), (b, sb)| ranking_order(a, *sa, b, *sb));
        scored.truncate(self.top_n);

        scored
            .into_iter()
            .map(|(stat, score)| ScoredWord {
                word: stat.word.clone(),
                score,
            })
            .collect()
    }
}

impl Default for WordRanker {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            top_n: 10,
        }
    }
}

/// Total order: score desc, length desc, first offset asc, word asc.
fn ranking_order(a: &WordStat, score_a: f64, b: &WordStat, score_b: f64) -> Ordering {
    score_b
        .total_cmp(&score_a)
        .then(b.length.cmp(&a.length))
        .then(a.first_offset.cmp(&b.first_offset))
        .then_with(|| a.word.cmp(&b.word))
}
