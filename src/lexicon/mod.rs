//! Process-wide dictionary and compiled word automaton.
//!
//! A [`Lexicon`] is built once at startup and shared read-only between
//! requests behind an `Arc`. Nothing in it is mutated after
//! construction, so any number of concurrent scans can use it.

mod automaton;
mod dictionary;

pub use automaton::{Automaton, AutomatonError, Match, ALPHABET};
pub use dictionary::{Dictionary, LexiconConfig, LexiconError, LoadReport};

use std::sync::Arc;

/// Environment variable that overrides the configured dictionary path.
pub const DICTIONARY_PATH_ENV: &str = "DICTIONARY_PATH";

/// Dictionary together with its compiled automaton.
pub struct Lexicon {
    dictionary: Dictionary,
    automaton: Automaton,
}

impl Lexicon {
    /// Compiles the automaton for a loaded dictionary.
    ///
    /// Pattern ids equal dictionary word indices.
    pub fn build(dictionary: Dictionary) -> Result<Self, LexiconError> {
        let automaton = Automaton::build(dictionary.words())?;

        tracing::info!(
            words = dictionary.len(),
            states = automaton.state_count(),
            table_bytes = automaton.heap_bytes(),
            "Word automaton ready"
        );

        Ok(Self {
            dictionary,
            automaton,
        })
    }

    /// Builds a lexicon from in-memory words.
    pub fn from_words<I, S>(words: I, config: &LexiconConfig) -> Result<Self, LexiconError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(Dictionary::from_words(words, config)?)
    }

    /// Loads the dictionary named by the configuration and compiles it.
    ///
    /// The `DICTIONARY_PATH` environment variable takes precedence over
    /// the configured path.
    pub fn load(config: &LexiconConfig) -> Result<Arc<Self>, LexiconError> {
        let path = std::env::var_os(DICTIONARY_PATH_ENV)
            .map(Into::into)
            .or_else(|| config.path.clone())
            .ok_or_else(|| {
                LexiconError::InvalidConfig(format!(
                    "no dictionary path configured (set [dictionary].path or {DICTIONARY_PATH_ENV})"
                ))
            })?;

        let dictionary = Dictionary::from_file(&path, config)?;
        Ok(Arc::new(Self::build(dictionary)?))
    }

    /// Returns the dictionary.
    #[inline]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Returns the automaton.
    #[inline]
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Returns the word for a pattern id.
    #[inline]
    pub fn word(&self, pattern: u32) -> &str {
        self.dictionary.word(pattern as usize)
    }
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("dictionary", &self.dictionary)
            .field("automaton", &self.automaton)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_ids_are_word_indices() {
        let lexicon = Lexicon::from_words(["zebra", "apple", "mango"], &LexiconConfig::default())
            .unwrap();

        let matches = lexicon.automaton().find_all(b"xxmangoxx");
        assert_eq!(matches.len(), 1);
        assert_eq!(lexicon.word(matches[0].pattern), "mango");
    }

    #[test]
    fn test_max_pattern_len_matches_dictionary() {
        let lexicon =
            Lexicon::from_words(["cat", "horse", "dog"], &LexiconConfig::default()).unwrap();
        assert_eq!(
            lexicon.automaton().max_pattern_len(),
            lexicon.dictionary().max_word_length()
        );
    }
}
