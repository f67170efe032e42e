//! Aho–Corasick automaton over the lowercase alphabet.
//!
//! # Layout
//!
//! States live in flat vectors indexed by state id. Each state owns a
//! dense 26-entry transition row; failure transitions are folded into
//! the rows at build time, so scanning never follows a failure link.
//! Two extra columns drive match reporting:
//!
//! - `terminal[s]`: the pattern that ends exactly at `s`, if any
//! - `output[s]`: the nearest proper suffix state that is terminal
//!
//! Scanning is one table lookup per input byte plus one step per
//! reported match.

use std::collections::VecDeque;

/// Size of the input alphabet (`a..=z`).
pub const ALPHABET: usize = 26;

const ROOT: u32 = 0;
const NONE: u32 = u32::MAX;

/// One pattern occurrence in a haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Match {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
    /// Index of the pattern in build order.
    pub pattern: u32,
}

impl Match {
    /// Length of the matched pattern.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; patterns are never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Errors raised while compiling patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutomatonError {
    #[error("pattern {index} is empty")]
    EmptyPattern { index: usize },
    #[error("pattern {index} contains byte {byte:#04x} outside a-z")]
    InvalidByte { index: usize, byte: u8 },
    #[error("automaton exceeds {limit} states")]
    TooManyStates { limit: usize },
}

/// Compiled multi-pattern matcher.
pub struct Automaton {
    transitions: Vec<[u32; ALPHABET]>,
    terminal: Vec<u32>,
    output: Vec<u32>,
    pattern_lens: Vec<u32>,
    max_pattern_len: usize,
}

impl Automaton {
    /// Compiles the patterns. Pattern ids are their positions in the input.
    ///
    /// Every pattern must be non-empty and consist of `a..=z` only.
    /// Duplicate patterns are allowed; the last one wins the terminal slot.
    pub fn build<I, P>(patterns: I) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut automaton = Self {
            transitions: vec![[NONE; ALPHABET]],
            terminal: vec![NONE],
            output: vec![NONE],
            pattern_lens: Vec::new(),
            max_pattern_len: 0,
        };

        for (index, pattern) in patterns.into_iter().enumerate() {
            automaton.insert(index, pattern.as_ref())?;
        }
        automaton.link();

        tracing::debug!(
            states = automaton.state_count(),
            patterns = automaton.pattern_count(),
            max_pattern_len = automaton.max_pattern_len,
            "Compiled word automaton"
        );

        Ok(automaton)
    }

    fn insert(&mut self, index: usize, pattern: &[u8]) -> Result<(), AutomatonError> {
        if pattern.is_empty() {
            return Err(AutomatonError::EmptyPattern { index });
        }

        let mut state = ROOT;
        for &byte in pattern {
            let c = letter_index(byte).ok_or(AutomatonError::InvalidByte { index, byte })?;
            let next = self.transitions[state as usize][c];
            state = if next == NONE {
                let id = self.push_state()?;
                self.transitions[state as usize][c] = id;
                id
            } else {
                next
            };
        }

        let id = self.pattern_lens.len() as u32;
        self.pattern_lens.push(pattern.len() as u32);
        self.terminal[state as usize] = id;
        self.max_pattern_len = self.max_pattern_len.max(pattern.len());
        Ok(())
    }

    fn push_state(&mut self) -> Result<u32, AutomatonError> {
        let id = self.transitions.len();
        if id >= NONE as usize {
            return Err(AutomatonError::TooManyStates {
                limit: NONE as usize,
            });
        }
        self.transitions.push([NONE; ALPHABET]);
        self.terminal.push(NONE);
        self.output.push(NONE);
        Ok(id as u32)
    }

    /// Breadth-first pass computing failure and output links.
    fn link(&mut self) {
        let mut failure = vec![ROOT; self.transitions.len()];
        let mut queue = VecDeque::new();

        for c in 0..ALPHABET {
            let child = self.transitions[ROOT as usize][c];
            if child == NONE {
                self.transitions[ROOT as usize][c] = ROOT;
            } else {
                failure[child as usize] = ROOT;
                queue.push_back(child);
            }
        }

        while let Some(state) = queue.pop_front() {
            let s = state as usize;
            let fail = failure[s] as usize;
            for c in 0..ALPHABET {
                let child = self.transitions[s][c];
                if child == NONE {
                    // Parents are processed first, so this row is complete
                    self.transitions[s][c] = self.transitions[fail][c];
                    continue;
                }

                let child_fail = self.transitions[fail][c];
                failure[child as usize] = child_fail;
                self.output[child as usize] = if self.terminal[child_fail as usize] != NONE {
                    child_fail
                } else {
                    self.output[child_fail as usize]
                };
                queue.push_back(child);
            }
        }
    }

    /// Reports every occurrence of every pattern in `haystack`.
    ///
    /// Overlapping occurrences are all reported. Matches ending at the same
    /// position come longest first. Bytes outside `a..=z` reset the scan.
    pub fn for_each_match(&self, haystack: &[u8], mut on_match: impl FnMut(Match)) {
        let mut state = ROOT;
        for (i, &byte) in haystack.iter().enumerate() {
            let Some(c) = letter_index(byte) else {
                state = ROOT;
                continue;
            };
            state = self.transitions[state as usize][c];

            let mut hit = if self.terminal[state as usize] != NONE {
                state
            } else {
                self.output[state as usize]
            };
            while hit != NONE {
                let pattern = self.terminal[hit as usize];
                let len = self.pattern_lens[pattern as usize] as usize;
                on_match(Match {
                    start: i + 1 - len,
                    end: i + 1,
                    pattern,
                });
                hit = self.output[hit as usize];
            }
        }
    }

    /// Collects all matches in scan order.
    pub fn find_all(&self, haystack: &[u8]) -> Vec<Match> {
        let mut matches = Vec::new();
        self.for_each_match(haystack, |m| matches.push(m));
        matches
    }

    /// Length of the pattern with the given id.
    #[inline]
    pub fn pattern_len(&self, pattern: u32) -> usize {
        self.pattern_lens[pattern as usize] as usize
    }

    /// Number of compiled patterns.
    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.pattern_lens.len()
    }

    /// Number of states, including the root.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    /// Length of the longest pattern.
    #[inline]
    pub fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }

    /// Approximate heap footprint of the tables in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.transitions.len() * std::mem::size_of::<[u32; ALPHABET]>()
            + (self.terminal.len() + self.output.len() + self.pattern_lens.len())
                * std::mem::size_of::<u32>()
    }
}

impl std::fmt::Debug for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automaton")
            .field("states", &self.state_count())
            .field("patterns", &self.pattern_count())
            .field("max_pattern_len", &self.max_pattern_len)
            .finish()
    }
}

#[inline]
fn letter_index(byte: u8) -> Option<usize> {
    byte.is_ascii_lowercase().then(|| (byte - b'a') as usize)
}
