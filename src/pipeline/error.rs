//! Request failure taxonomy.

use thiserror::Error;

/// Problems with the submitted image or request options.
///
/// These are the caller's fault and never take the process down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no image provided")]
    MissingImage,
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("pixel buffer has {actual} bytes, expected {expected} for the given dimensions")]
    DimensionMismatch { expected: u64, actual: usize },
    #[error("image too large: {pixels} pixels exceeds limit of {max}")]
    TooLarge { pixels: u64, max: u64 },
    #[error("min_word_length {requested} is below the dictionary minimum {dictionary}")]
    MinWordLength { requested: usize, dictionary: usize },
}

/// Failure of one pipeline run.
///
/// A run either completes or returns one of these; partial results are
/// never handed out.
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProcessError {
    /// HTTP status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ProcessError::Input(InputError::TooLarge { .. }) => 413,
            ProcessError::Input(_) => 400,
            ProcessError::Internal(_) => 500,
        }
    }

    /// Short machine-readable category.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessError::Input(_) => "input",
            ProcessError::Internal(_) => "internal",
        }
    }

    /// Message safe to show callers. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ProcessError::Input(e) => e.to_string(),
            ProcessError::Internal(_) => "internal error while processing image".to_string(),
        }
    }
}
