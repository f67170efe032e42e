//! Dictionary word extraction from letter strings.
//!
//! # Chunked Scanning
//!
//! Long strings are cut into chunks that are scanned in parallel. Each
//! chunk owns a nominal range `[start, end)` but scans up to
//! `end + longest_word - 1`, so a word straddling the boundary is still
//! seen. A match is kept only by the chunk whose nominal range holds its
//! start offset, which makes every `(word, offset)` pair count once.

use crate::encoding::LetterString;
use crate::lexicon::{Lexicon, Match};
use rayon::prelude::*;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

/// Letters per chunk before scanning switches to parallel.
const DEFAULT_CHUNK_LEN: usize = 1 << 18;

/// One occurrence of a dictionary word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedOccurrence<'a> {
    /// The matched word.
    pub word: &'a str,
    /// Offset of the first letter.
    pub start: usize,
    /// Word length in letters.
    pub length: usize,
}

/// All occurrences of one word, aggregated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordStat {
    /// The word.
    pub word: String,
    /// Number of occurrences, overlapping ones included.
    pub count: u64,
    /// Word length in letters.
    pub length: usize,
    /// Offset of the earliest occurrence.
    pub first_offset: usize,
}

/// Per-pattern tally while scanning.
#[derive(Debug, Clone, Copy)]
struct Tally {
    count: u64,
    first_offset: usize,
}

/// A nominal range plus the end of its scan window.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Chunk {
    owned: Range<usize>,
    scan_end: usize,
}

/// Finds dictionary words in letter strings.
pub struct WordExtractor {
    lexicon: Arc<Lexicon>,
    chunk_len: usize,
    min_word_length: usize,
}

impl WordExtractor {
    /// Creates an extractor over a shared lexicon.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            chunk_len: DEFAULT_CHUNK_LEN,
            min_word_length: 0,
        }
    }

    /// Sets the chunk length for parallel scanning.
    pub fn with_chunk_len(mut self, chunk_len: usize) -> Self {
        self.chunk_len = chunk_len.max(1);
        self
    }

    /// Ignores words shorter than `min_word_length`.
    ///
    /// This only narrows what the dictionary already admits.
    pub fn with_min_word_length(mut self, min_word_length: usize) -> Self {
        self.min_word_length = min_word_length;
        self
    }

    /// Returns the shared lexicon.
    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Lists every occurrence, ordered by start offset then length.
    pub fn occurrences<'a>(&'a self, letters: &LetterString) -> Vec<ExtractedOccurrence<'a>> {
        let text = letters.as_bytes();
        let chunks = self.plan(text.len());

        let collect = |chunk: &Chunk| {
            let mut found = Vec::new();
            self.scan_chunk(text, chunk, |m| found.push(m));
            found
        };
        let mut matches: Vec<Match> = if chunks.len() > 1 {
            chunks.par_iter().flat_map_iter(collect).collect()
        } else {
            chunks.iter().flat_map(collect).collect()
        };
        matches.sort_unstable_by_key(|m| (m.start, m.len(), m.pattern));

        matches
            .into_iter()
            .map(|m| ExtractedOccurrence {
                word: self.lexicon.word(m.pattern),
                start: m.start,
                length: m.len(),
            })
            .collect()
    }

    /// Aggregates occurrences into one [`WordStat`] per distinct word.
    ///
    /// Stats are ordered by first offset, longer words first on ties.
    pub fn extract(&self, letters: &LetterString) -> Vec<WordStat> {
        let text = letters.as_bytes();
        let chunks = self.plan(text.len());

        let tally_chunk = |chunk: &Chunk| {
            let mut tallies: HashMap<u32, Tally> = HashMap::new();
            self.scan_chunk(text, chunk, |m| {
                tallies
                    .entry(m.pattern)
                    .and_modify(|t| {
                        t.count += 1;
                        t.first_offset = t.first_offset.min(m.start);
                    })
                    .or_insert(Tally {
                        count: 1,
                        first_offset: m.start,
                    });
            });
            tallies
        };

        let tallies = if chunks.len() > 1 {
            chunks
                .par_iter()
                .map(tally_chunk)
                .reduce(HashMap::new, merge_tallies)
        } else {
            chunks
                .iter()
                .map(tally_chunk)
                .fold(HashMap::new(), merge_tallies)
        };

        let mut stats: Vec<WordStat> = tallies
            .into_iter()
            .map(|(pattern, tally)| WordStat {
                word: self.lexicon.word(pattern).to_string(),
                count: tally.count,
                length: self.lexicon.automaton().pattern_len(pattern),
                first_offset: tally.first_offset,
            })
            .collect();
        stats.sort_unstable_by(|a, b| {
            a.first_offset
                .cmp(&b.first_offset)
                .then(b.length.cmp(&a.length))
                .then_with(|| a.word.cmp(&b.word))
        });

        tracing::debug!(
            letters = text.len(),
            chunks = chunks.len(),
            distinct_words = stats.len(),
            "Extracted dictionary words"
        );

        stats
    }

    /// Splits `len` letters into scan chunks.
    fn plan(&self, len: usize) -> Vec<Chunk> {
        let overlap = self.lexicon.automaton().max_pattern_len().saturating_sub(1);
        let mut chunks = Vec::with_capacity(len / self.chunk_len + 1);
        let mut start: usize = 0;
        loop {
            let end = start.saturating_add(self.chunk_len).min(len);
            chunks.push(Chunk {
                owned: start..end,
                scan_end: (end + overlap).min(len),
            });
            if end >= len {
                break;
            }
            start = end;
        }
        chunks
    }

    fn scan_chunk(&self, text: &[u8], chunk: &Chunk, mut on_match: impl FnMut(Match)) {
        let base = chunk.owned.start;
        let window = &text[base..chunk.scan_end];
        self.lexicon.automaton().for_each_match(window, |m| {
            let start = base + m.start;
            if start < chunk.owned.end && m.len() >= self.min_word_length {
                on_match(Match {
                    start,
                    end: base + m.end,
                    pattern: m.pattern,
                });
            }
        });
        tracing::trace!(
            start = chunk.owned.start,
            end = chunk.owned.end,
            scan_end = chunk.scan_end,
            "Scanned chunk"
        );
    }
}

fn merge_tallies(mut into: HashMap<u32, Tally>, from: HashMap<u32, Tally>) -> HashMap<u32, Tally> {
    for (pattern, tally) in from {
        into.entry(pattern)
            .and_modify(|t| {
                t.count += tally.count;
                t.first_offset = t.first_offset.min(tally.first_offset);
            })
            .or_insert(tally);
    }
    into
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconConfig;

    fn lexicon(words: &[&str]) -> Arc<Lexicon> {
        let config = LexiconConfig {
            max_word_length: None,
            ..Default::default()
        };
        Arc::new(Lexicon::from_words(words, &config).unwrap())
    }

    fn letters(text: &str) -> LetterString {
        LetterString::new(text).unwrap()
    }

    #[test]
    fn test_finds_word_at_known_offset() {
        let extractor = WordExtractor::new(lexicon(&["cat"]));
        let text = letters("qqqqqqqqqqcatqqqqq");

        let found = extractor.occurrences(&text);
        assert_eq!(
            found,
            vec![ExtractedOccurrence {
                word: "cat",
                start: 10,
                length: 3
            }]
        );
    }

    #[test]
    fn test_overlaps_are_distinct_stats() {
        let extractor = WordExtractor::new(lexicon(&["ard", "dvark", "aardvark"]));
        let stats = extractor.extract(&letters("aardvark"));

        let words: Vec<&str> = stats.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, vec!["aardvark", "ard", "dvark"]);
        assert!(stats.iter().all(|s| s.count == 1));
    }

    #[test]
    fn test_counts_and_first_offset() {
        let extractor = WordExtractor::new(lexicon(&["art", "start", "cart"]));
        let stats = extractor.extract(&letters("startcartart"));

        let art = stats.iter().find(|s| s.word == "art").unwrap();
        assert_eq!(art.count, 3);
        assert_eq!(art.first_offset, 2);
        assert_eq!(art.length, 3);

        let cart = stats.iter().find(|s| s.word == "cart").unwrap();
        assert_eq!(cart.count, 1);
        assert_eq!(cart.first_offset, 5);
    }

    #[test]
    fn test_chunked_scan_matches_single_pass() {
        let lex = lexicon(&["abc", "bcd", "cdab", "dabcd", "aaa"]);
        let text: String = "abcdabcdaaaabcdabcaaadabcd".repeat(20);
        let text = letters(&text);

        let single = WordExtractor::new(Arc::clone(&lex));
        let reference_stats = single.extract(&text);
        let reference_occ = single.occurrences(&text);

        for chunk_len in [1, 2, 3, 5, 7, 64] {
            let chunked = WordExtractor::new(Arc::clone(&lex)).with_chunk_len(chunk_len);
            assert_eq!(chunked.extract(&text), reference_stats, "chunk_len {chunk_len}");
            assert_eq!(chunked.occurrences(&text), reference_occ, "chunk_len {chunk_len}");
        }
    }

    #[test]
    fn test_boundary_straddling_word() {
        let extractor = WordExtractor::new(lexicon(&["house"])).with_chunk_len(4);
        let stats = extractor.extract(&letters("xxhousexx"));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].first_offset, 2);
        assert_eq!(stats[0].count, 1);
    }

    #[test]
    fn test_min_word_length_filter() {
        let extractor =
            WordExtractor::new(lexicon(&["art", "start"])).with_min_word_length(4);
        let stats = extractor.extract(&letters("start"));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].word, "start");
    }

    #[test]
    fn test_no_matches_and_empty_input() {
        let extractor = WordExtractor::new(lexicon(&["cat"]));
        assert!(extractor.extract(&letters("xzqq")).is_empty());
        assert!(extractor.extract(&letters("")).is_empty());
        assert!(extractor.occurrences(&letters("")).is_empty());
    }

    #[test]
    fn test_plan_covers_input() {
        let extractor = WordExtractor::new(lexicon(&["abcd"])).with_chunk_len(4);
        let chunks = extractor.plan(10);

        assert_eq!(
            chunks,
            vec![
                Chunk { owned: 0..4, scan_end: 7 },
                Chunk { owned: 4..8, scan_end: 10 },
                Chunk { owned: 8..10, scan_end: 10 },
            ]
        );
    }

    #[test]
    fn test_unbounded_chunk_len_is_single_chunk() {
        let extractor = WordExtractor::new(lexicon(&["cat"])).with_chunk_len(usize::MAX);
        assert_eq!(
            extractor.plan(10),
            vec![Chunk { owned: 0..10, scan_end: 10 }]
        );

        let stats = extractor.extract(&letters("xcatxxcatx"));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].first_offset, 1);
    }
}
