//! Token budget configuration.
//!
//! ## The Problem
//!
//! The transformation service downstream accepts a bounded number of tokens
//! per request. Every chunk has to fit, but packing as much as possible into
//! each chunk keeps the number of (slow, rate-limited) calls down.
//!
//! `TokenBudget` is the single number the assembler packs against:
//!
//! ```text
//! max_tokens = 8
//!
//! buffer (5) + "\n\n" + paragraph (2)  -> 7 tokens, fits
//! buffer (7) + "\n\n" + paragraph (3)  -> 10 tokens, flush and start over
//! ```
//!
//! Token counts are measured on the joined text, not summed, because BPE
//! tokenizers merge across the seam.

use crate::{Error, Result};

/// Maximum number of tokens a chunk may hold.
///
/// # Examples
///
/// ```rust
/// use seams::TokenBudget;
///
/// let budget = TokenBudget::new(512).unwrap();
/// assert_eq!(budget.max_tokens(), 512);
/// assert!(budget.fits(512));
/// assert!(!budget.fits(513));
///
/// assert!(TokenBudget::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    max_tokens: usize,
}

impl TokenBudget {
    /// Create a budget.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBudget`] if `max_tokens == 0`.
    pub const fn new(max_tokens: usize) -> Result<Self> {
        if max_tokens == 0 {
            Err(Error::InvalidBudget(max_tokens))
        } else {
            Ok(Self { max_tokens })
        }
    }

    /// The maximum tokens per chunk.
    #[must_use]
    pub const fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Whether a chunk of `tokens` tokens is within budget.
    #[must_use]
    pub const fn fits(&self, tokens: usize) -> bool {
        tokens <= self.max_tokens
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        // Leaves room for prompt and completion in an 8k-context model.
        Self { max_tokens: 4096 }
    }
}

impl TryFrom<usize> for TokenBudget {
    type Error = Error;

    fn try_from(max_tokens: usize) -> Result<Self> {
        Self::new(max_tokens)
    }
}
