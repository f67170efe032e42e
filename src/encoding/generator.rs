//! Pixel-to-letter encoding.
//!
//! Maps every intensity through the day's bin mapping, optionally
//! capping runs of a repeated letter.

use super::letters::LetterString;
use crate::imaging::PixelBuffer;
use crate::seeding::BinAlphabetMapping;
use rayon::prelude::*;

/// Pixels per parallel work unit.
const DEFAULT_CHUNK_PIXELS: usize = 1 << 16;

/// Builds [`LetterString`]s from pixel buffers.
pub struct LetterStringGenerator {
    mapping: BinAlphabetMapping,
    /// Longest allowed run of one letter; `None` keeps every letter.
    max_run_length: Option<usize>,
    chunk_pixels: usize,
}

impl LetterStringGenerator {
    /// Creates a generator for one day's mapping.
    pub fn new(mapping: BinAlphabetMapping) -> Self {
        Self {
            mapping,
            max_run_length: None,
            chunk_pixels: DEFAULT_CHUNK_PIXELS,
        }
    }

    /// Caps runs of the same letter at `limit` letters.
    ///
    /// A limit of zero is treated as one.
    pub fn with_max_run_length(mut self, limit: Option<usize>) -> Self {
        self.max_run_length = limit.map(|l| l.max(1));
        self
    }

    /// Sets the number of pixels per parallel work unit.
    pub fn with_chunk_pixels(mut self, chunk_pixels: usize) -> Self {
        self.chunk_pixels = chunk_pixels.max(1);
        self
    }

    /// Returns the mapping in use.
    pub fn mapping(&self) -> &BinAlphabetMapping {
        &self.mapping
    }

    /// Encodes the buffer in order.
    ///
    /// Without a run cap the output has exactly one letter per pixel.
    pub fn generate(&self, pixels: &PixelBuffer) -> LetterString {
        let intensities = pixels.intensities();
        let mapping = &self.mapping;

        let mut letters: Vec<u8> = if intensities.len() > self.chunk_pixels {
            intensities
                .par_chunks(self.chunk_pixels)
                .flat_map_iter(|chunk| chunk.iter().map(|&v| mapping.letter_for(v)))
                .collect()
        } else {
            intensities.iter().map(|&v| mapping.letter_for(v)).collect()
        };

        if let Some(limit) = self.max_run_length {
            let before = letters.len();
            cap_runs(&mut letters, limit);
            tracing::trace!(
                before,
                after = letters.len(),
                limit,
                "Capped repeated letter runs"
            );
        }

        LetterString::from_letters(letters)
    }
}

/// Truncates every run of identical bytes to at most `limit` bytes, in place.
fn cap_runs(letters: &mut Vec<u8>, limit: usize) {
    let mut write = 0;
    let mut run = 0;
    let mut previous = None;

    for read in 0..letters.len() {
        let current = letters[read];
        if previous == Some(current) {
            run += 1;
        } else {
            previous = Some(current);
            run = 1;
        }
        if run <= limit {
            letters[write] = current;
            write += 1;
        }
    }

    letters.truncate(write);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> BinAlphabetMapping {
        BinAlphabetMapping::from_letters(b"abcdefghijklmnopqrstuvwxyz").unwrap()
    }

    #[test]
    fn test_one_letter_per_pixel() {
        let pixels = PixelBuffer::from_intensities([0.0, 0.04, 0.5, 1.0]);
        let letters = LetterStringGenerator::new(identity()).generate(&pixels);

        assert_eq!(letters.as_str(), "abnz");
        assert_eq!(letters.len(), pixels.len());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pixels = PixelBuffer::from_intensities((0..10_000).map(|i| (i % 97) as f32 / 96.0));

        let sequential = LetterStringGenerator::new(identity()).generate(&pixels);
        let parallel = LetterStringGenerator::new(identity())
            .with_chunk_pixels(7)
            .generate(&pixels);

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_run_cap() {
        let mut letters = b"aaabbbbcaa".to_vec();
        cap_runs(&mut letters, 2);
        assert_eq!(letters, b"aabbcaa");
    }

    #[test]
    fn test_run_cap_through_generator() {
        let pixels = PixelBuffer::from_intensities([0.0; 6]);
        let letters = LetterStringGenerator::new(identity())
            .with_max_run_length(Some(2))
            .generate(&pixels);
        assert_eq!(letters.as_str(), "aa");
    }

    #[test]
    fn test_empty_buffer() {
        let pixels = PixelBuffer::from_intensities(std::iter::empty());
        assert!(LetterStringGenerator::new(identity()).generate(&pixels).is_empty());
    }
}
