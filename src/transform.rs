//! The per-chunk transformation capability.
//!
//! A [`Transform`] is whatever rewrites a chunk: usually a remote language
//! model cleaning extracted text, sometimes a local normaliser. The pipeline
//! treats it as a black box that may fail. A failure never aborts the run;
//! the chunk's original text is used in its place.
//!
//! Timeouts and retries belong to the transform, not to the pipeline. Wrap a
//! flaky transform in [`Retry`] to get a bounded number of attempts before
//! the pipeline falls back.
//!
//! ```rust
//! use seams::{Transform, TransformError};
//!
//! let upper = |text: &str| -> Result<String, TransformError> { Ok(text.to_uppercase()) };
//! assert_eq!(upper.transform("abc").unwrap(), "ABC");
//! ```

use std::time::Duration;

use crate::TransformError;

/// Rewrites one chunk of text.
///
/// Implementations must be safe to call from several threads at once when
/// the pipeline runs in parallel mode. Each call is independent.
pub trait Transform: Send + Sync {
    /// Transform `text`.
    ///
    /// # Errors
    ///
    /// Any failure; the pipeline substitutes the input text.
    fn transform(&self, text: &str) -> Result<String, TransformError>;
}

impl<F> Transform for F
where
    F: Fn(&str) -> Result<String, TransformError> + Send + Sync,
{
    fn transform(&self, text: &str) -> Result<String, TransformError> {
        self(text)
    }
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transform for Identity {
    fn transform(&self, text: &str) -> Result<String, TransformError> {
        Ok(text.to_string())
    }
}

/// Re-invokes an inner transform until it succeeds or attempts run out.
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use seams::{Retry, Transform, TransformError};
///
/// let calls = AtomicUsize::new(0);
/// let flaky = |text: &str| -> Result<String, TransformError> {
///     if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///         Err(TransformError::new("busy"))
///     } else {
///         Ok(text.to_string())
///     }
/// };
///
/// let retry = Retry::new(flaky, 3);
/// assert_eq!(retry.transform("ok").unwrap(), "ok");
/// ```
#[derive(Debug, Clone)]
pub struct Retry<T> {
    inner: T,
    max_attempts: usize,
    pause: Duration,
}

impl<T: Transform> Retry<T> {
    /// Allow up to `max_attempts` calls (at least one).
    #[must_use]
    pub fn new(inner: T, max_attempts: usize) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            pause: Duration::ZERO,
        }
    }

    /// Sleep for `pause` between attempts.
    #[must_use]
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// The attempt limit.
    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

impl<T: Transform> Transform for Retry<T> {
    fn transform(&self, text: &str) -> Result<String, TransformError> {
        let mut attempt = 1;
        loop {
            match self.inner.transform(text) {
                Ok(out) => return Ok(out),
                Err(e) if attempt < self.max_attempts => {
                    tracing::debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "transform failed, retrying: {e}"
                    );
                    if !self.pause.is_zero() {
                        std::thread::sleep(self.pause);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
