//! Pixel Words Library
//!
//! Turns an image into a short list of dictionary words. Pixels become
//! letters through a mapping that is reshuffled once per UTC day, and the
//! resulting letter string is scanned for every dictionary word at once.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! imaging → encoding → words (extract → rank)
//!              ↑           ↑
//!           seeding     lexicon
//! ```
//!
//! # Design Principles
//!
//! - **Deterministic per day**: the same image and dictionary give the same
//!   words for the whole UTC day
//! - **Build once, share read-only**: the dictionary automaton is compiled
//!   at startup and never mutated afterwards
//! - **Validate first**: malformed input is rejected before any work starts
//!
//! # Example
//!
//! ```no_run
//! use pixel_words::{
//!     imaging::RgbImage,
//!     lexicon::{Lexicon, LexiconConfig},
//!     pipeline::{FileConfig, ProcessPipeline},
//! };
//! use std::sync::Arc;
//!
//! let lexicon = Arc::new(
//!     Lexicon::from_words(["zebra", "cat", "quartz"], &LexiconConfig::default()).unwrap(),
//! );
//! let pipeline = ProcessPipeline::new(lexicon, &FileConfig::default()).unwrap();
//!
//! let image = RgbImage::from_gray(&[12, 200, 31, 90, 250, 7], 3, 2);
//! let outcome = pipeline.process(&image).unwrap();
//!
//! for word in &outcome.words {
//!     println!("{} ({:.2})", word.word, word.score);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod encoding;
pub mod imaging;
pub mod lexicon;
pub mod metrics;
pub mod pipeline;
pub mod seeding;
pub mod words;

// Re-export commonly used types at crate root
pub use encoding::{LetterString, LetterStringGenerator};
pub use imaging::{GrayscaleSampler, PixelBuffer, RgbImage};
pub use lexicon::{Lexicon, LexiconConfig};
pub use pipeline::{FileConfig, ProcessError, ProcessOutcome, ProcessPipeline};
pub use seeding::{BinAlphabetMapping, DailySeed, DailySeedProvider};
pub use words::{ScoredWord, WordExtractor, WordRanker, WordStat};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
