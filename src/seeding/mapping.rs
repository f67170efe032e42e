//! Seeded assignment of letters to intensity bins.
//!
//! # Mapping Model
//!
//! The intensity range is split into 26 equal bins; bin `i` covers
//! `[i/26, (i+1)/26)` and the top bin also absorbs `1.0`. Letters are
//! assigned to bins by a Fisher–Yates shuffle of `a..=z` driven by
//! ChaCha20, keyed with:
//!
//! ```text
//! key = BLAKE3(MAPPING_DOMAIN || seed.to_le_bytes())
//! ```
//!
//! Every step is fixed so that other implementations can reproduce
//! the exact permutation for a given day.

use super::daily::DailySeed;
use blake3::Hasher;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use thiserror::Error;

/// Number of intensity bins, one per letter.
pub const BIN_COUNT: usize = 26;

/// Domain separator for deriving the shuffle key.
const MAPPING_DOMAIN: &[u8] = b"pixel-words-daily-mapping-v1";

/// Errors when building a mapping from an explicit letter order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("expected {BIN_COUNT} letters, got {0}")]
    WrongLength(usize),
    #[error("byte {0:#04x} is not a lowercase ascii letter")]
    NotALetter(u8),
    #[error("letter '{0}' appears more than once")]
    Duplicate(char),
}

/// Bijection from bin index to lowercase letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinAlphabetMapping {
    letters: [u8; BIN_COUNT],
}

impl BinAlphabetMapping {
    /// Builds the mapping for a seed.
    ///
    /// Calling this twice with the same seed yields byte-identical
    /// permutations.
    pub fn from_seed(seed: DailySeed) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(MAPPING_DOMAIN);
        hasher.update(&seed.value().to_le_bytes());
        let key: [u8; 32] = *hasher.finalize().as_bytes();

        let mut rng = ChaCha20Rng::from_seed(key);
        let mut letters = alphabet();
        for i in (1..BIN_COUNT).rev() {
            let j = uniform_below(&mut rng, i as u32 + 1) as usize;
            letters.swap(i, j);
        }

        tracing::debug!(
            %seed,
            mapping = %String::from_utf8_lossy(&letters),
            "Built bin alphabet mapping"
        );

        Self { letters }
    }

    /// Builds a mapping from an explicit letter order (bin 0 first).
    pub fn from_letters(order: &[u8]) -> Result<Self, MappingError> {
        if order.len() != BIN_COUNT {
            return Err(MappingError::WrongLength(order.len()));
        }

        let mut seen = [false; BIN_COUNT];
        let mut letters = [0u8; BIN_COUNT];
        for (slot, &letter) in letters.iter_mut().zip(order) {
            if !letter.is_ascii_lowercase() {
                return Err(MappingError::NotALetter(letter));
            }
            let idx = (letter - b'a') as usize;
            if seen[idx] {
                return Err(MappingError::Duplicate(letter as char));
            }
            seen[idx] = true;
            *slot = letter;
        }

        Ok(Self { letters })
    }

    /// Returns the letters in bin order.
    #[inline]
    pub fn letters(&self) -> &[u8; BIN_COUNT] {
        &self.letters
    }

    /// Returns the letter assigned to a bin. Out-of-range bins saturate.
    #[inline]
    pub fn letter_for_bin(&self, bin: usize) -> u8 {
        self.letters[bin.min(BIN_COUNT - 1)]
    }

    /// Maps an intensity to its letter.
    #[inline]
    pub fn letter_for(&self, intensity: f32) -> u8 {
        self.letters[bin_index(intensity)]
    }
}

impl std::fmt::Debug for BinAlphabetMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BinAlphabetMapping")
            .field(&String::from_utf8_lossy(&self.letters))
            .finish()
    }
}

impl std::fmt::Display for BinAlphabetMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.letters))
    }
}

/// Bin index for an intensity.
///
/// `floor(v * 26)`, with `1.0` clamped into the top bin and values at or
/// below zero (or NaN) in bin 0.
#[inline]
pub fn bin_index(intensity: f32) -> usize {
    if intensity.is_nan() || intensity <= 0.0 {
        return 0;
    }
    let bin = (intensity * BIN_COUNT as f32).floor() as usize;
    bin.min(BIN_COUNT - 1)
}

fn alphabet() -> [u8; BIN_COUNT] {
    let mut letters = [0u8; BIN_COUNT];
    for (i, slot) in letters.iter_mut().enumerate() {
        *slot = b'a' + i as u8;
    }
    letters
}

/// Uniform value in `[0, bound)` by rejection sampling on 32-bit draws.
fn uniform_below(rng: &mut impl RngCore, bound: u32) -> u32 {
    debug_assert!(bound > 0);
    // Largest multiple of `bound` that fits, minus one
    let zone = u32::MAX - (u32::MAX - bound + 1) % bound;
    loop {
        let v = rng.next_u32();
        if v <= zone {
            return v % bound;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(letters: &[u8; BIN_COUNT]) -> bool {
        let mut sorted = *letters;
        sorted.sort_unstable();
        sorted == alphabet()
    }

    #[test]
    fn test_same_seed_same_permutation() {
        let seed = DailySeed::from_raw(20_261_017);
        let first = BinAlphabetMapping::from_seed(seed);
        for _ in 0..16 {
            assert_eq!(BinAlphabetMapping::from_seed(seed).letters(), first.letters());
        }
    }

    #[test]
    fn test_known_permutation_for_seed() {
        // Fixed output of the BLAKE3 + ChaCha20 + Fisher-Yates derivation.
        // A change here breaks compatibility with every other implementation.
        let mapping = BinAlphabetMapping::from_seed(DailySeed::from_raw(20_261_017));
        assert_eq!(mapping.to_string(), "nrzwstlafcbjmexukqgyhoidvp");
        assert_eq!(mapping.letter_for_bin(0), b'n');
        assert_eq!(mapping.letter_for_bin(25), b'p');
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = BinAlphabetMapping::from_seed(DailySeed::from_raw(20_261_017));
        let b = BinAlphabetMapping::from_seed(DailySeed::from_raw(20_261_018));
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_mapping_is_bijection() {
        for raw in 20_250_101..20_250_131 {
            let mapping = BinAlphabetMapping::from_seed(DailySeed::from_raw(raw));
            assert!(is_permutation(mapping.letters()), "seed {raw}");
        }
    }

    #[test]
    fn test_bin_boundaries() {
        assert_eq!(bin_index(0.0), 0);
        assert_eq!(bin_index(0.5), 13);
        assert_eq!(bin_index(0.99), 25);
        assert_eq!(bin_index(1.0), 25);
        assert_eq!(bin_index(-1.0), 0);
        assert_eq!(bin_index(f32::NAN), 0);
        assert_eq!(bin_index(7.0), 25);
    }

    #[test]
    fn test_from_letters_validation() {
        assert_eq!(
            BinAlphabetMapping::from_letters(b"abc"),
            Err(MappingError::WrongLength(3))
        );
        assert_eq!(
            BinAlphabetMapping::from_letters(b"aacdefghijklmnopqrstuvwxyz"),
            Err(MappingError::Duplicate('a'))
        );
        assert_eq!(
            BinAlphabetMapping::from_letters(b"Abcdefghijklmnopqrstuvwxyz"),
            Err(MappingError::NotALetter(b'A'))
        );

        let identity = BinAlphabetMapping::from_letters(b"abcdefghijklmnopqrstuvwxyz").unwrap();
        assert_eq!(identity.letter_for(0.0), b'a');
        assert_eq!(identity.letter_for(1.0), b'z');
    }

    #[test]
    fn test_uniform_below_stays_in_range() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        for bound in 1..=26 {
            for _ in 0..100 {
                assert!(uniform_below(&mut rng, bound) < bound);
            }
        }
    }
}
