//! Letter string type produced by the encoder.

/// Sequence of lowercase ascii letters, one per encoded pixel.
///
/// Built once per request and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LetterString {
    text: String,
}

impl LetterString {
    /// Wraps a string, returning `None` unless it is entirely `a..=z`.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.bytes().all(|b| b.is_ascii_lowercase()) {
            Some(Self { text })
        } else {
            None
        }
    }

    /// Builds a letter string from bytes already known to be `a..=z`.
    pub(crate) fn from_letters(letters: Vec<u8>) -> Self {
        debug_assert!(letters.iter().all(u8::is_ascii_lowercase));
        Self {
            text: letters.into_iter().map(char::from).collect(),
        }
    }

    /// Returns the letters as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the letters as bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Returns the number of letters.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consumes the letter string, returning the inner `String`.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Splits the letters into display lines of at most `width` letters.
    pub fn lines(&self, width: usize) -> impl Iterator<Item = &str> {
        let width = width.max(1);
        // Always ascii, so every byte offset is a char boundary
        (0..self.text.len())
            .step_by(width)
            .map(move |start| &self.text[start..(start + width).min(self.text.len())])
    }
}

impl std::fmt::Display for LetterString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::fmt::Debug for LetterString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const PREVIEW: usize = 32;
        let preview = &self.text[..self.text.len().min(PREVIEW)];
        f.debug_struct("LetterString")
            .field("len", &self.text.len())
            .field("preview", &preview)
            .finish()
    }
}
