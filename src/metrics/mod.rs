//! Prometheus metrics and the optional HTTP front end.
//!
//! [`MetricsRegistry`] is always available so the pipeline can report
//! into it. With the `metrics` feature enabled, [`Server`] exposes the
//! registry together with the image processing endpoint.
//!
//! # Metrics Exposed
//!
//! ## Requests
//! - `pixel_words_requests_processed_total` - Requests that produced a word list
//! - `pixel_words_requests_failed_total{kind}` - Failed requests by error kind
//!
//! ## Throughput
//! - `pixel_words_pixels_total` - Pixels sampled
//! - `pixel_words_letters_total` - Letters generated
//! - `pixel_words_word_occurrences_total` - Dictionary word occurrences found
//! - `pixel_words_ranked_words_total` - Ranked words returned
//! - `pixel_words_last_distinct_words` - Distinct words in the latest request
//!
//! ## State
//! - `pixel_words_dictionary_words` - Words in the loaded dictionary
//! - `pixel_words_automaton_states` - States in the word automaton
//! - `pixel_words_daily_seed` - Seed used by the latest request
//!
//! # Example
//!
//! ```no_run
//! use pixel_words::metrics::{MetricsRegistry, RunSummary};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! registry.record_success(&RunSummary {
//!     pixels: 640 * 480,
//!     letters: 640 * 480,
//!     occurrences: 1_204,
//!     distinct_words: 311,
//!     ranked_words: 10,
//! });
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, RunSummary};
#[cfg(feature = "metrics")]
pub use server::{ProcessQuery, Server, ServerConfig, ServerError};
