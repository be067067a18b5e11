//! Token counting.
//!
//! The assembler only needs one capability from a tokenizer: how many tokens
//! does this text cost? [`TokenCounter`] is that capability.
//!
//! ## Backends
//!
//! | Counter | Feature | Unit |
//! |---------|---------|------|
//! | [`CharCounter`] | - | Unicode scalar values |
//! | [`WordCounter`] | - | Whitespace-separated words |
//! | `TiktokenCounter` | `tiktoken` | OpenAI BPE tokens (`cl100k_base` etc.) |
//! | `HfCounter` | `hf` | HuggingFace `tokenizer.json` tokens |
//!
//! A counter must be deterministic within a run: the same text always costs
//! the same number of tokens.
//!
//! ## Failure
//!
//! Some tokenizers reject input. A failed count is fatal for the chunking
//! call that made it, unless the counter is wrapped in a
//! [`FallbackCounter`], which degrades to a character count instead.

use std::sync::Arc;

use crate::Result;

/// Counts tokens in text for one encoding scheme.
///
/// ```rust
/// use seams::{TokenCounter, WordCounter};
///
/// let counter = WordCounter;
/// assert_eq!(counter.count("three small words").unwrap(), 3);
/// ```
pub trait TokenCounter: Send + Sync {
    /// Identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Count the tokens in `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenizer`](crate::Error::Tokenizer) if the
    /// tokenizer cannot process `text`.
    fn count(&self, text: &str) -> Result<usize>;
}

impl<C: TokenCounter + ?Sized> TokenCounter for &C {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn count(&self, text: &str) -> Result<usize> {
        (**self).count(text)
    }
}

impl<C: TokenCounter + ?Sized> TokenCounter for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn count(&self, text: &str) -> Result<usize> {
        (**self).count(text)
    }
}

impl<C: TokenCounter + ?Sized> TokenCounter for Arc<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn count(&self, text: &str) -> Result<usize> {
        (**self).count(text)
    }
}

/// One token per Unicode scalar value.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCounter;

impl TokenCounter for CharCounter {
    fn name(&self) -> &str {
        "chars"
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(text.chars().count())
    }
}

/// One token per whitespace-separated word.
///
/// Useful when reasoning about budgets by hand: `"a b\n\nc"` is 3 tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn name(&self) -> &str {
        "words"
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

/// Wraps a counter and falls back to a character count when it fails.
///
/// ```rust
/// use seams::{Error, FallbackCounter, TokenCounter};
///
/// struct Picky;
///
/// impl TokenCounter for Picky {
///     fn name(&self) -> &str { "picky" }
///     fn count(&self, _text: &str) -> seams::Result<usize> {
///         Err(Error::Tokenizer { counter: "picky".into(), message: "no".into() })
///     }
/// }
///
/// let counter = FallbackCounter::new(Picky);
/// assert_eq!(counter.count("abc").unwrap(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct FallbackCounter<C> {
    inner: C,
}

impl<C: TokenCounter> FallbackCounter<C> {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped counter.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: TokenCounter> TokenCounter for FallbackCounter<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn count(&self, text: &str) -> Result<usize> {
        match self.inner.count(text) {
            Ok(n) => Ok(n),
            Err(e) => {
                let fallback = text.chars().count();
                tracing::warn!(
                    counter = self.inner.name(),
                    fallback,
                    "token count failed, using character count: {e}"
                );
                Ok(fallback)
            }
        }
    }
}

#[cfg(feature = "tiktoken")]
pub use self::bpe::{BpeEncoding, TiktokenCounter};

#[cfg(feature = "tiktoken")]
mod bpe {
    use tiktoken_rs::CoreBPE;

    use super::TokenCounter;
    use crate::{Error, Result};

    /// A tiktoken byte-pair encoding.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub enum BpeEncoding {
        /// GPT-4 / GPT-3.5-turbo.
        #[default]
        Cl100kBase,
        /// GPT-4o and o-series models.
        O200kBase,
        /// Codex and text-davinci-002/003.
        P50kBase,
        /// GPT-3 models such as davinci.
        R50kBase,
    }

    impl BpeEncoding {
        /// Canonical encoding name.
        #[must_use]
        pub const fn as_str(self) -> &'static str {
            match self {
                Self::Cl100kBase => "cl100k_base",
                Self::O200kBase => "o200k_base",
                Self::P50kBase => "p50k_base",
                Self::R50kBase => "r50k_base",
            }
        }
    }

    /// Token counter backed by tiktoken.
    pub struct TiktokenCounter {
        name: String,
        bpe: CoreBPE,
    }

    impl TiktokenCounter {
        /// Load a BPE encoding.
        ///
        /// # Errors
        ///
        /// Returns [`Error::TokenizerLoad`] if the encoding tables cannot be built.
        pub fn new(encoding: BpeEncoding) -> Result<Self> {
            let bpe = match encoding {
                BpeEncoding::Cl100kBase => tiktoken_rs::cl100k_base(),
                BpeEncoding::O200kBase => tiktoken_rs::o200k_base(),
                BpeEncoding::P50kBase => tiktoken_rs::p50k_base(),
                BpeEncoding::R50kBase => tiktoken_rs::r50k_base(),
            }
            .map_err(|e| Error::TokenizerLoad(e.to_string()))?;

            Ok(Self {
                name: encoding.as_str().to_string(),
                bpe,
            })
        }

        /// Load the encoding tiktoken associates with a model name.
        ///
        /// # Errors
        ///
        /// Returns [`Error::TokenizerLoad`] for unknown models.
        pub fn for_model(model: &str) -> Result<Self> {
            let bpe = tiktoken_rs::get_bpe_from_model(model)
                .map_err(|e| Error::TokenizerLoad(format!("{model}: {e}")))?;
            Ok(Self {
                name: model.to_string(),
                bpe,
            })
        }
    }

    impl TokenCounter for TiktokenCounter {
        fn name(&self) -> &str {
            &self.name
        }

        fn count(&self, text: &str) -> Result<usize> {
            Ok(self.bpe.encode_ordinary(text).len())
        }
    }

    impl std::fmt::Debug for TiktokenCounter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("TiktokenCounter")
                .field("name", &self.name)
                .finish_non_exhaustive()
        }
    }

}

#[cfg(feature = "hf")]
pub use self::hf::HfCounter;

#[cfg(feature = "hf")]
mod hf {
    use std::path::Path;

    use super::TokenCounter;
    use crate::{Error, Result};

    /// Token counter backed by a HuggingFace `tokenizer.json`.
    pub struct HfCounter {
        name: String,
        tokenizer: tokenizers::Tokenizer,
    }

    impl HfCounter {
        /// Wrap an already-loaded tokenizer.
        #[must_use]
        pub fn new(name: impl Into<String>, tokenizer: tokenizers::Tokenizer) -> Self {
            Self {
                name: name.into(),
                tokenizer,
            }
        }

        /// Load a tokenizer from a `tokenizer.json` file.
        ///
        /// # Errors
        ///
        /// Returns [`Error::TokenizerLoad`] if the file cannot be read or parsed.
        pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref();
            let tokenizer = tokenizers::Tokenizer::from_file(path)
                .map_err(|e| Error::TokenizerLoad(format!("{}: {e}", path.display())))?;
            Ok(Self::new(path.display().to_string(), tokenizer))
        }
    }

    impl TokenCounter for HfCounter {
        fn name(&self) -> &str {
            &self.name
        }

        fn count(&self, text: &str) -> Result<usize> {
            self.tokenizer
                .encode(text, false)
                .map(|encoding| encoding.len())
                .map_err(|e| Error::Tokenizer {
                    counter: self.name.clone(),
                    message: e.to_string(),
                })
        }
    }

    impl std::fmt::Debug for HfCounter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("HfCounter")
                .field("name", &self.name)
                .finish_non_exhaustive()
        }
    }

}
