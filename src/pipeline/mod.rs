//! Request orchestration.
//!
//! A request flows through the stages in a fixed order:
//!
//! ```text
//! RgbImage -> GrayscaleSampler -> PixelBuffer
//!          -> BinAlphabetMapping (today's seed) -> LetterString
//!          -> WordExtractor -> WordStat[] -> WordRanker -> ScoredWord[]
//! ```
//!
//! Input is validated before any stage runs. Failures surface as a
//! [`ProcessError`] and never leave partial results behind.

mod config;
mod error;
mod process;
mod response;

pub use config::{
    ConfigError, EncodingConfig, FileConfig, OutputConfig, RequestOptions, HOST_ENV, PORT_ENV,
};
pub use error::{InputError, ProcessError};
pub use process::{ProcessOutcome, ProcessPipeline};
pub use response::{display_score, ErrorBody, WordResponse};
