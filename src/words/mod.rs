//! Word extraction and ranking.
//!
//! [`WordExtractor`] scans a letter string with the shared automaton and
//! aggregates matches into [`WordStat`]s; [`WordRanker`] scores them and
//! keeps the best.

mod extractor;
mod ranker;

pub use extractor::{ExtractedOccurrence, WordExtractor, WordStat};
pub use ranker::{RankingError, ScoredWord, ScoringWeights, WordRanker};
