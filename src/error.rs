//! Error types for seams.

/// Errors that can abort a chunking or pipeline invocation.
///
/// Per-chunk transform failures are not errors here: they are recovered
/// inside the pipeline and reported through
/// [`ChunkStatus::FellBack`](crate::ChunkStatus::FellBack).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid token budget (must be > 0).
    #[error("invalid token budget: {0} (must be > 0)")]
    InvalidBudget(usize),

    /// Minimum overlap exceeds the maximum overlap.
    #[error("min overlap {min} exceeds max overlap {max}")]
    OverlapBounds {
        /// The requested minimum overlap, in characters.
        min: usize,
        /// The configured maximum overlap, in characters.
        max: usize,
    },

    /// The token counter could not process a piece of text.
    #[error("tokenizer '{counter}' failed: {message}")]
    Tokenizer {
        /// Name of the counter that failed.
        counter: String,
        /// What went wrong.
        message: String,
    },

    /// A tokenizer backend could not be loaded.
    #[error("failed to load tokenizer: {0}")]
    TokenizerLoad(String),

    /// Parallel execution was requested but could not be set up.
    #[error("parallel execution unavailable: {0}")]
    Parallel(String),
}

/// Result type for seams operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single [`Transform`](crate::Transform) call.
///
/// Never fatal to a pipeline run: the chunk's original text is used instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    /// Create a transform error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for TransformError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for TransformError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
