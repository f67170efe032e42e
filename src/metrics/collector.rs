//! Metrics collection and registry.

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Summary of one successful pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Pixels sampled.
    pub pixels: u64,
    /// Letters in the generated string.
    pub letters: u64,
    /// Total word occurrences found.
    pub occurrences: u64,
    /// Distinct words found.
    pub distinct_words: u64,
    /// Words returned after ranking.
    pub ranked_words: u64,
}

/// Prometheus metrics registry for pipeline monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    // Request outcomes
    requests_processed: IntCounter,
    requests_failed: IntCounterVec,

    // Throughput
    pixels_total: IntCounter,
    letters_total: IntCounter,
    occurrences_total: IntCounter,
    ranked_words_total: IntCounter,
    last_distinct_words: IntGauge,

    // Process-wide state
    dictionary_words: IntGauge,
    automaton_states: IntGauge,
    daily_seed: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all pipeline metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let requests_processed = IntCounter::new(
            "pixel_words_requests_processed_total",
            "Requests that completed with a ranked word list",
        )?;
        let requests_failed = IntCounterVec::new(
            Opts::new(
                "pixel_words_requests_failed_total",
                "Requests that failed, by error kind",
            ),
            &["kind"],
        )?;

        let pixels_total = IntCounter::new(
            "pixel_words_pixels_total",
            "Pixels sampled across all requests",
        )?;
        let letters_total = IntCounter::new(
            "pixel_words_letters_total",
            "Letters generated across all requests",
        )?;
        let occurrences_total = IntCounter::new(
            "pixel_words_word_occurrences_total",
            "Dictionary word occurrences found across all requests",
        )?;
        let ranked_words_total = IntCounter::new(
            "pixel_words_ranked_words_total",
            "Ranked words returned across all requests",
        )?;
        let last_distinct_words = IntGauge::new(
            "pixel_words_last_distinct_words",
            "Distinct words found by the most recent request",
        )?;

        let dictionary_words = IntGauge::new(
            "pixel_words_dictionary_words",
            "Words in the loaded dictionary",
        )?;
        let automaton_states = IntGauge::new(
            "pixel_words_automaton_states",
            "States in the compiled word automaton",
        )?;
        let daily_seed = IntGauge::new(
            "pixel_words_daily_seed",
            "Seed used by the most recent request",
        )?;

        registry.register(Box::new(requests_processed.clone()))?;
        registry.register(Box::new(requests_failed.clone()))?;
        registry.register(Box::new(pixels_total.clone()))?;
        registry.register(Box::new(letters_total.clone()))?;
        registry.register(Box::new(occurrences_total.clone()))?;
        registry.register(Box::new(ranked_words_total.clone()))?;
        registry.register(Box::new(last_distinct_words.clone()))?;
        registry.register(Box::new(dictionary_words.clone()))?;
        registry.register(Box::new(automaton_states.clone()))?;
        registry.register(Box::new(daily_seed.clone()))?;

        Ok(Self {
            registry,
            requests_processed,
            requests_failed,
            pixels_total,
            letters_total,
            occurrences_total,
            ranked_words_total,
            last_distinct_words,
            dictionary_words,
            automaton_states,
            daily_seed,
        })
    }

    /// Records the loaded lexicon's size.
    pub fn set_lexicon(&self, lexicon: &crate::lexicon::Lexicon) {
        self.dictionary_words.set(lexicon.dictionary().len() as i64);
        self.automaton_states
            .set(lexicon.automaton().state_count() as i64);
    }

    /// Records a successful run.
    pub fn record_success(&self, summary: &RunSummary) {
        self.requests_processed.inc();
        self.pixels_total.inc_by(summary.pixels);
        self.letters_total.inc_by(summary.letters);
        self.occurrences_total.inc_by(summary.occurrences);
        self.ranked_words_total.inc_by(summary.ranked_words);
        self.last_distinct_words.set(summary.distinct_words as i64);
    }

    /// Records a failed run under its error kind.
    pub fn record_failure(&self, kind: &str) {
        self.requests_failed.with_label_values(&[kind]).inc();
    }

    /// Records the seed in use.
    pub fn set_daily_seed(&self, seed: crate::seeding::DailySeed) {
        self.daily_seed.set(seed.value() as i64);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
