//! End-to-end processing of one image.

use super::config::{ConfigError, EncodingConfig, FileConfig, RequestOptions};
use super::error::{InputError, ProcessError};
use crate::encoding::{LetterString, LetterStringGenerator};
use crate::imaging::{GrayscaleSampler, PixelBuffer, RgbImage, CHANNELS};
use crate::lexicon::Lexicon;
use crate::metrics::{MetricsRegistry, RunSummary};
use crate::seeding::{BinAlphabetMapping, Clock, DailySeed, DailySeedProvider, SystemClock};
use crate::words::{ScoredWord, ScoringWeights, WordExtractor, WordRanker};
use std::sync::Arc;
use std::time::Instant;

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Ranked words, best first.
    pub words: Vec<ScoredWord>,
    /// Generated letters, when requested.
    pub letter_string: Option<LetterString>,
    /// Seed behind the mapping; `None` when a mapping was supplied.
    pub seed: Option<DailySeed>,
    /// Pixels sampled.
    pub pixel_count: usize,
    /// Letters generated.
    pub letter_count: usize,
    /// Distinct dictionary words found before ranking.
    pub distinct_words: usize,
}

/// Runs sampling, encoding, extraction and ranking for each request.
///
/// Holds only read-only shared state, so one pipeline can serve many
/// threads at once.
pub struct ProcessPipeline<C = SystemClock> {
    lexicon: Arc<Lexicon>,
    seeds: DailySeedProvider<C>,
    sampler: GrayscaleSampler,
    encoding: EncodingConfig,
    weights: ScoringWeights,
    defaults: RequestOptions,
    /// Configured dictionary minimum; requests may only raise it.
    min_word_length: usize,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl ProcessPipeline<SystemClock> {
    /// Creates a pipeline that seeds from the system clock.
    pub fn new(lexicon: Arc<Lexicon>, config: &FileConfig) -> Result<Self, ConfigError> {
        Self::with_clock(lexicon, config, SystemClock)
    }
}

impl<C: Clock> ProcessPipeline<C> {
    /// Creates a pipeline with an explicit date source.
    pub fn with_clock(
        lexicon: Arc<Lexicon>,
        config: &FileConfig,
        clock: C,
    ) -> Result<Self, ConfigError> {
        config.limits.validate()?;
        config.encoding.validate()?;
        config.ranking.validate()?;

        Ok(Self {
            lexicon,
            seeds: DailySeedProvider::new(clock),
            sampler: GrayscaleSampler::with_parallel_threshold(config.encoding.chunk_pixels),
            encoding: config.encoding.clone(),
            weights: config.ranking,
            defaults: config.limits.clone(),
            min_word_length: config.dictionary.min_word_length,
            metrics: None,
        })
    }

    /// Attaches a metrics registry that every run reports to.
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        metrics.set_lexicon(&self.lexicon);
        self.metrics = Some(metrics);
        self
    }

    /// Returns the default request options.
    pub fn defaults(&self) -> &RequestOptions {
        &self.defaults
    }

    /// Returns the shared lexicon.
    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Returns today's mapping as the pipeline would build it.
    pub fn current_mapping(&self) -> (DailySeed, BinAlphabetMapping) {
        let seed = self.seeds.current();
        (seed, BinAlphabetMapping::from_seed(seed))
    }

    /// Processes an image with the default options.
    pub fn process(&self, image: &RgbImage) -> Result<ProcessOutcome, ProcessError> {
        self.process_with(image, &self.defaults)
    }

    /// Processes an image with request-specific options.
    ///
    /// The daily seed is read after sampling, right before the mapping is
    /// built.
    pub fn process_with(
        &self,
        image: &RgbImage,
        options: &RequestOptions,
    ) -> Result<ProcessOutcome, ProcessError> {
        let started = Instant::now();
        let result = self.validate(image, options).and_then(|()| {
            let pixels = self.sampler.sample(image);
            let seed = self.seeds.current();
            let mapping = BinAlphabetMapping::from_seed(seed);
            if let Some(metrics) = &self.metrics {
                metrics.set_daily_seed(seed);
            }
            self.run_stages(&pixels, &mapping, options).map(|mut outcome| {
                outcome.seed = Some(seed);
                outcome
            })
        });
        self.report(&result, started);
        result
    }

    /// Runs encoding, extraction and ranking over an already sampled buffer
    /// with an explicit mapping.
    pub fn process_pixels(
        &self,
        pixels: &PixelBuffer,
        mapping: &BinAlphabetMapping,
        options: &RequestOptions,
    ) -> Result<ProcessOutcome, ProcessError> {
        let started = Instant::now();
        let result = self
            .check_options(pixels.len() as u64, options)
            .and_then(|()| self.run_stages(pixels, mapping, options));
        self.report(&result, started);
        result
    }

    fn validate(&self, image: &RgbImage, options: &RequestOptions) -> Result<(), ProcessError> {
        if image.is_empty() {
            return Err(InputError::EmptyImage {
                width: image.width(),
                height: image.height(),
            }
            .into());
        }
        if !image.is_valid() {
            return Err(InputError::DimensionMismatch {
                expected: image.pixel_count() * CHANNELS as u64,
                actual: image.data().len(),
            }
            .into());
        }
        self.check_options(image.pixel_count(), options)
    }

    fn check_options(&self, pixels: u64, options: &RequestOptions) -> Result<(), ProcessError> {
        if pixels == 0 {
            return Err(InputError::EmptyImage {
                width: 0,
                height: 0,
            }
            .into());
        }
        if pixels > options.max_pixels {
            return Err(InputError::TooLarge {
                pixels,
                max: options.max_pixels,
            }
            .into());
        }
        if options.min_word_length < self.min_word_length {
            return Err(InputError::MinWordLength {
                requested: options.min_word_length,
                dictionary: self.min_word_length,
            }
            .into());
        }
        Ok(())
    }

    fn run_stages(
        &self,
        pixels: &PixelBuffer,
        mapping: &BinAlphabetMapping,
        options: &RequestOptions,
    ) -> Result<ProcessOutcome, ProcessError> {
        let stage = Instant::now();
        let letters = LetterStringGenerator::new(*mapping)
            .with_max_run_length(self.encoding.max_run_length)
            .with_chunk_pixels(self.encoding.chunk_pixels)
            .generate(pixels);
        if self.encoding.max_run_length.is_none() && letters.len() != pixels.len() {
            return Err(ProcessError::Internal(format!(
                "encoded {} letters for {} pixels",
                letters.len(),
                pixels.len()
            )));
        }
        tracing::debug!(
            letters = letters.len(),
            elapsed_us = stage.elapsed().as_micros() as u64,
            "Generated letter string"
        );

        let stage = Instant::now();
        let extractor = WordExtractor::new(Arc::clone(&self.lexicon))
            .with_chunk_len(self.encoding.scan_chunk_len)
            .with_min_word_length(options.min_word_length);
        let stats = extractor.extract(&letters);
        let occurrences: u64 = stats.iter().map(|s| s.count).sum();
        tracing::debug!(
            distinct_words = stats.len(),
            occurrences,
            elapsed_us = stage.elapsed().as_micros() as u64,
            "Scanned letter string"
        );

        let ranker = WordRanker::new(self.weights, options.top_n)
            .map_err(|e| ProcessError::Internal(e.to_string()))?;
        let words = ranker.rank(&stats);

        if let Some(metrics) = &self.metrics {
            metrics.record_success(&RunSummary {
                pixels: pixels.len() as u64,
                letters: letters.len() as u64,
                occurrences,
                distinct_words: stats.len() as u64,
                ranked_words: words.len() as u64,
            });
        }

        Ok(ProcessOutcome {
            words,
            pixel_count: pixels.len(),
            letter_count: letters.len(),
            distinct_words: stats.len(),
            letter_string: options.include_letter_string.then_some(letters),
            seed: None,
        })
    }

    fn report(&self, result: &Result<ProcessOutcome, ProcessError>, started: Instant) {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(outcome) => tracing::info!(
                pixels = outcome.pixel_count,
                distinct_words = outcome.distinct_words,
                returned = outcome.words.len(),
                elapsed_ms,
                "Image processed"
            ),
            Err(ProcessError::Input(e)) => {
                tracing::info!(error = %e, elapsed_ms, "Image rejected");
            }
            Err(e @ ProcessError::Internal(_)) => {
                tracing::error!(error = %e, elapsed_ms, "Image processing failed");
            }
        }
        if let (Err(e), Some(metrics)) = (result, &self.metrics) {
            metrics.record_failure(e.kind());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconConfig;
    use crate::seeding::FixedClock;

    fn pipeline(words: &[&str]) -> ProcessPipeline<FixedClock> {
        let lexicon = Arc::new(Lexicon::from_words(words, &LexiconConfig::default()).unwrap());
        let clock = FixedClock::from_ymd(2026, 10, 17).unwrap();
        ProcessPipeline::with_clock(lexicon, &FileConfig::default(), clock).unwrap()
    }

    #[test]
    fn test_empty_image_rejected() {
        let p = pipeline(&["cat"]);
        let err = p.process(&RgbImage::new(Vec::new(), 0, 0)).unwrap_err();
        assert!(matches!(err, ProcessError::Input(InputError::EmptyImage { .. })));
    }

    #[test]
    fn test_mismatched_buffer_rejected() {
        let p = pipeline(&["cat"]);
        let err = p.process(&RgbImage::new(vec![0; 5], 2, 1)).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Input(InputError::DimensionMismatch {
                expected: 6,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_too_large_rejected() {
        let p = pipeline(&["cat"]);
        let options = RequestOptions {
            max_pixels: 3,
            ..Default::default()
        };
        let image = RgbImage::from_gray(&[0, 0, 0, 0], 2, 2);
        let err = p.process_with(&image, &options).unwrap_err();
        assert_eq!(err.status_code(), 413);
    }

    #[test]
    fn test_letter_string_optional() {
        let p = pipeline(&["cat"]);
        let image = RgbImage::from_gray(&[10, 90, 170, 250], 2, 2);

        let without = p.process(&image).unwrap();
        assert!(without.letter_string.is_none());
        assert_eq!(without.letter_count, 4);

        let options = RequestOptions {
            include_letter_string: true,
            ..Default::default()
        };
        let with = p.process_with(&image, &options).unwrap();
        assert_eq!(with.letter_string.unwrap().len(), 4);
        assert_eq!(with.seed, Some(DailySeed::from_raw(20_261_017)));
    }

    #[test]
    fn test_long_word_dictionary_accepts_default_request() {
        let p = pipeline(&["zebra", "quartz"]);
        let outcome = p.process(&RgbImage::from_gray(&[0, 64, 128, 255], 2, 2)).unwrap();
        assert_eq!(outcome.letter_count, 4);

        let below = RequestOptions {
            min_word_length: 2,
            ..Default::default()
        };
        let err = p
            .process_with(&RgbImage::from_gray(&[0, 64, 128, 255], 2, 2), &below)
            .unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Input(InputError::MinWordLength {
                requested: 2,
                dictionary: 3
            })
        ));
    }

    #[test]
    fn test_metrics_recorded() {
        let metrics = Arc::new(MetricsRegistry::new().unwrap());
        let p = pipeline(&["cat"]).with_metrics(Arc::clone(&metrics));

        p.process(&RgbImage::from_gray(&[1, 2, 3, 4], 2, 2)).unwrap();
        let _ = p.process(&RgbImage::new(Vec::new(), 0, 0));

        let output = metrics.encode().unwrap();
        assert!(output.contains("pixel_words_requests_processed_total 1"));
        assert!(output.contains("pixel_words_requests_failed_total{kind=\"input\"} 1"));
        assert!(output.contains("pixel_words_daily_seed 20261017"));
    }
}
