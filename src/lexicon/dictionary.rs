//! Word list loading and normalization.
//!
//! Entries are trimmed and lowercased, then checked against the
//! lowercase ascii alphabet. Length limits are applied here so the
//! automaton never sees words that could not be reported.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the word list.
///
/// All of these are startup-time configuration failures.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dictionary contains no usable words")]
    Empty,
    #[error("dictionary line {line}: entry {entry:?} is not lowercase a-z")]
    InvalidEntry { line: usize, entry: String },
    #[error("dictionary has {count} words, limit is {limit}")]
    TooManyWords { count: usize, limit: usize },
    #[error("invalid dictionary settings: {0}")]
    InvalidConfig(String),
    #[error("failed to compile word automaton: {0}")]
    Automaton(#[from] super::automaton::AutomatonError),
}

/// Dictionary loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// Word list path, one word per line.
    pub path: Option<PathBuf>,
    /// Words shorter than this are dropped.
    pub min_word_length: usize,
    /// Words longer than this are dropped; `None` keeps all lengths.
    pub max_word_length: Option<usize>,
    /// Upper bound on the number of words after normalization.
    pub max_words: usize,
    /// Fail on entries outside a-z instead of skipping them.
    pub strict: bool,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            path: None,
            min_word_length: 3,
            max_word_length: Some(10),
            max_words: 2_000_000,
            strict: false,
        }
    }
}

impl LexiconConfig {
    /// Validates the length and size limits.
    pub fn validate(&self) -> Result<(), LexiconError> {
        if self.min_word_length == 0 {
            return Err(LexiconError::InvalidConfig(
                "min_word_length must be at least 1".into(),
            ));
        }
        if let Some(max) = self.max_word_length {
            if max < self.min_word_length {
                return Err(LexiconError::InvalidConfig(format!(
                    "max_word_length {max} is below min_word_length {}",
                    self.min_word_length
                )));
            }
        }
        if self.max_words == 0 {
            return Err(LexiconError::InvalidConfig(
                "max_words must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn accepts_length(&self, len: usize) -> bool {
        len >= self.min_word_length && self.max_word_length.map_or(true, |max| len <= max)
    }
}

/// Counters describing what normalization did to the source list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Non-blank lines read.
    pub entries: usize,
    /// Entries rejected for characters outside a-z.
    pub invalid: usize,
    /// Entries outside the configured length range.
    pub out_of_range: usize,
    /// Entries that repeated an earlier word.
    pub duplicates: usize,
}

/// Normalized, deduplicated, sorted word list.
pub struct Dictionary {
    words: Vec<String>,
    min_len: usize,
    max_len: usize,
    fingerprint: [u8; 32],
    report: LoadReport,
}

impl Dictionary {
    /// Loads a word list from a file.
    pub fn from_file(path: impl AsRef<Path>, config: &LexiconConfig) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = std::io::BufReader::new(file);

        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line.map_err(|source| LexiconError::Io {
                path: path.to_path_buf(),
                source,
            })?);
        }

        let dictionary = Self::from_words(lines, config)?;
        tracing::info!(
            path = %path.display(),
            words = dictionary.len(),
            fingerprint = %dictionary.fingerprint_hex(),
            "Dictionary loaded"
        );
        Ok(dictionary)
    }

    /// Loads a word list from in-memory entries.
    pub fn from_words<I, S>(entries: I, config: &LexiconConfig) -> Result<Self, LexiconError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        config.validate()?;

        let mut report = LoadReport::default();
        let mut words = BTreeSet::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let trimmed = entry.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            report.entries += 1;

            let word = trimmed.to_lowercase();
            if !word.bytes().all(|b| b.is_ascii_lowercase()) {
                if config.strict {
                    return Err(LexiconError::InvalidEntry {
                        line: index + 1,
                        entry: trimmed.to_string(),
                    });
                }
                report.invalid += 1;
                continue;
            }
            if !config.accepts_length(word.len()) {
                report.out_of_range += 1;
                continue;
            }
            if !words.insert(word) {
                report.duplicates += 1;
            }
        }

        if words.is_empty() {
            return Err(LexiconError::Empty);
        }
        if words.len() > config.max_words {
            return Err(LexiconError::TooManyWords {
                count: words.len(),
                limit: config.max_words,
            });
        }
        if report.invalid > 0 {
            tracing::warn!(
                skipped = report.invalid,
                "Skipped dictionary entries outside a-z"
            );
        }

        let words: Vec<String> = words.into_iter().collect();
        let min_len = words.iter().map(String::len).min().unwrap_or(0);
        let max_len = words.iter().map(String::len).max().unwrap_or(0);

        let mut hasher = Sha256::new();
        for word in &words {
            hasher.update(word.as_bytes());
            hasher.update(b"\n");
        }
        let mut fingerprint = [0u8; 32];
        fingerprint.copy_from_slice(&hasher.finalize());

        tracing::debug!(
            entries = report.entries,
            kept = words.len(),
            out_of_range = report.out_of_range,
            duplicates = report.duplicates,
            "Normalized dictionary"
        );

        Ok(Self {
            words,
            min_len,
            max_len,
            fingerprint,
            report,
        })
    }

    /// Returns the words in sorted order.
    #[inline]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns the word with the given index.
    #[inline]
    pub fn word(&self, index: usize) -> &str {
        &self.words[index]
    }

    /// Returns true if the word is in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.words
            .binary_search_by(|w| w.as_str().cmp(word))
            .is_ok()
    }

    /// Number of words.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false for a loaded dictionary.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Length of the shortest word.
    #[inline]
    pub fn min_word_length(&self) -> usize {
        self.min_len
    }

    /// Length of the longest word.
    #[inline]
    pub fn max_word_length(&self) -> usize {
        self.max_len
    }

    /// SHA-256 over the normalized list; identifies the data version.
    #[inline]
    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }

    /// Fingerprint as lowercase hex.
    pub fn fingerprint_hex(&self) -> String {
        self.fingerprint
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Normalization counters.
    #[inline]
    pub fn report(&self) -> LoadReport {
        self.report
    }
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("words", &self.words.len())
            .field("min_len", &self.min_len)
            .field("max_len", &self.max_len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config() -> LexiconConfig {
        LexiconConfig::default()
    }

    #[test]
    fn test_normalizes_and_dedups() {
        let dict = Dictionary::from_words(["  Cat ", "cat", "DOG", "", "bird"], &config()).unwrap();

        assert_eq!(dict.words(), &["bird", "cat", "dog"]);
        assert!(dict.contains("cat"));
        assert!(!dict.contains("Cat"));
        assert_eq!(dict.report().duplicates, 1);
        assert_eq!(dict.report().entries, 4);
    }

    #[test]
    fn test_length_limits() {
        let dict = Dictionary::from_words(["at", "cat", "elephantine"], &config()).unwrap();

        assert_eq!(dict.words(), &["cat"]);
        assert_eq!(dict.report().out_of_range, 2);
    }

    #[test]
    fn test_unbounded_max_length() {
        let cfg = LexiconConfig {
            max_word_length: None,
            ..config()
        };
        let dict = Dictionary::from_words(["elephantine"], &cfg).unwrap();
        assert_eq!(dict.max_word_length(), 11);
    }

    #[test]
    fn test_invalid_entries_skipped_by_default() {
        let dict = Dictionary::from_words(["don't", "naïve", "cat"], &config()).unwrap();
        assert_eq!(dict.words(), &["cat"]);
        assert_eq!(dict.report().invalid, 2);
    }

    #[test]
    fn test_invalid_entries_fatal_when_strict() {
        let cfg = LexiconConfig {
            strict: true,
            ..config()
        };
        let err = Dictionary::from_words(["cat", "don't"], &cfg).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidEntry { line: 2, .. }));
    }

    #[test]
    fn test_empty_dictionary_rejected() {
        assert!(matches!(
            Dictionary::from_words(Vec::<String>::new(), &config()),
            Err(LexiconError::Empty)
        ));
        assert!(matches!(
            Dictionary::from_words(["a", "an"], &config()),
            Err(LexiconError::Empty)
        ));
    }

    #[test]
    fn test_word_limit() {
        let cfg = LexiconConfig {
            max_words: 1,
            ..config()
        };
        assert!(matches!(
            Dictionary::from_words(["cat", "dog"], &cfg),
            Err(LexiconError::TooManyWords { count: 2, limit: 1 })
        ));
    }

    #[test]
    fn test_invalid_config() {
        let cfg = LexiconConfig {
            min_word_length: 5,
            max_word_length: Some(4),
            ..config()
        };
        assert!(matches!(
            Dictionary::from_words(["house"], &cfg),
            Err(LexiconError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = Dictionary::from_words(["cat", "dog"], &config()).unwrap();
        let b = Dictionary::from_words(["DOG", "cat"], &config()).unwrap();
        let c = Dictionary::from_words(["cat", "cow"], &config()).unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint_hex().len(), 64);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "apple\nBanana\ncherry pie\n").unwrap();

        let dict = Dictionary::from_file(file.path(), &config()).unwrap();
        assert_eq!(dict.words(), &["apple", "banana"]);
    }

    #[test]
    fn test_missing_file() {
        let err = Dictionary::from_file("/nonexistent/words.txt", &config()).unwrap_err();
        assert!(matches!(err, LexiconError::Io { .. }));
    }
}
