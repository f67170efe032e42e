//! Daily seed and letter mapping.
//!
//! The date is the only source of randomness in the pipeline. It is
//! read through a [`Clock`], turned into a [`DailySeed`], and expanded
//! into a [`BinAlphabetMapping`] with a keyed ChaCha20 shuffle.

mod clock;
mod daily;
mod mapping;

pub use clock::{Clock, FixedClock, SystemClock};
pub use daily::{DailySeed, DailySeedProvider};
pub use mapping::{bin_index, BinAlphabetMapping, MappingError, BIN_COUNT};
