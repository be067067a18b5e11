//! # seams
//!
//! Token-bounded chunking and overlap-aware re-merging for documents that
//! are too long for a single call to a length-limited text service.
//!
//! ## The Problem
//!
//! A language model that cleans up extracted PDF text accepts a few thousand
//! tokens per request. A paper has tens of thousands. The text has to be cut
//! into pieces, each piece sent through the model, and the results glued back
//! into one document.
//!
//! Each of those steps can go wrong:
//!
//! - Cutting mid-sentence hands the model a fragment it will "repair"
//! - Cutting by characters ignores what the model actually counts: tokens
//! - The model may echo the tail of the previous piece, duplicating text
//! - The model may fail, and one failed call must not lose the whole paper
//!
//! ## The Pipeline
//!
//! ```text
//! raw text
//!    │
//!    ▼
//! BoundarySplitter ──▶ paragraphs (blank-line separated)
//!    │
//!    ▼
//! ChunkAssembler  ──▶ chunks, each <= max_tokens
//!    │                (oversized paragraphs fall back to sentences)
//!    ▼
//! Transform       ──▶ one call per chunk; failure keeps the original
//!    │
//!    ▼
//! OverlapMerger   ──▶ one document, duplicated seams collapsed
//! ```
//!
//! ### Splitting
//!
//! Paragraphs are the preferred unit. Only a paragraph that alone exceeds the
//! budget is cut into sentences, after `.` `!` `?` or their full-width forms.
//!
//! ### Packing
//!
//! Greedy first-fit: keep appending paragraphs (joined by `"\n\n"`) while the
//! token count of the joined text stays within budget, then start a new
//! chunk. A single sentence larger than the budget becomes its own chunk,
//! whole. Content is never dropped to satisfy the budget.
//!
//! ```text
//! max_tokens = 5 (words)
//!
//! "a b\n\nc d\n\ne f\n\ng"
//!
//! Chunk 0: "a b\n\nc d"   4 tokens
//! Chunk 1: "e f\n\ng"     3 tokens
//! ```
//!
//! ### Merging
//!
//! Consecutive transformed chunks are joined after removing the longest
//! exact suffix/prefix overlap (bounded by `max_overlap_chars`):
//!
//! ```text
//! "The quick brown fox" + " brown fox jumps"  =>  "The quick brown fox jumps"
//! "abc" + "xyz"                                =>  "abcxyz"
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use seams::{ChunkAssembler, Pipeline, TokenBudget, TransformError, WordCounter};
//!
//! let text = "First paragraph of the paper.\n\nSecond paragraph.";
//!
//! let assembler = ChunkAssembler::new(WordCounter, TokenBudget::new(512).unwrap());
//! let clean = |chunk: &str| -> Result<String, TransformError> {
//!     // call a model here
//!     Ok(chunk.replace("\n\n", " "))
//! };
//!
//! let output = Pipeline::new(assembler, clean).run(text).unwrap();
//! assert_eq!(output.text, "First paragraph of the paper. Second paragraph.");
//! assert!(!output.is_degraded());
//! ```
//!
//! ## Token Counters
//!
//! | Counter | Feature | Notes |
//! |---------|---------|-------|
//! | `CharCounter` | - | Unicode scalar values |
//! | `WordCounter` | - | Whitespace-separated words |
//! | `TiktokenCounter` | `tiktoken` | `cl100k_base` and friends |
//! | `HfCounter` | `hf` | Any HuggingFace `tokenizer.json` |
//!
//! ## Parallel Transforms
//!
//! With the `parallel` feature, [`Execution::Parallel`] fans transform calls
//! out over a rayon pool. Results are gathered back in chunk order before
//! merging, so the output matches a sequential run.

mod assembler;
mod budget;
mod chunk;
mod error;
mod merge;
mod pipeline;
mod preprocess;
mod segment;
mod splitter;
mod tokenizer;
mod transform;

pub use assembler::{assemble, ChunkAssembler, PARAGRAPH_SEPARATOR};
pub use budget::TokenBudget;
pub use chunk::Chunk;
pub use error::{Error, Result, TransformError};
pub use merge::{merge, OverlapMerger, Seam, DEFAULT_MAX_OVERLAP_CHARS};
pub use pipeline::{
    run, ChunkOutcome, ChunkStatus, Execution, Pipeline, PipelineConfig, PipelineOutput,
};
pub use preprocess::strip_references;
pub use segment::{Segment, SegmentKind};
pub use splitter::{split, BoundarySplitter, SentenceRule};
pub use tokenizer::{CharCounter, FallbackCounter, TokenCounter, WordCounter};
pub use transform::{Identity, Retry, Transform};

#[cfg(feature = "tiktoken")]
pub use tokenizer::{BpeEncoding, TiktokenCounter};

#[cfg(feature = "hf")]
pub use tokenizer::HfCounter;

/// Turns text into an ordered sequence of budget-bounded chunks.
///
/// [`ChunkAssembler`] is the standard implementation. The pipeline accepts
/// any chunker, so callers with their own segmentation can plug it in:
///
/// ```rust
/// use seams::{Chunk, Chunker, Identity, Pipeline};
///
/// /// One chunk per line.
/// struct Lines;
///
/// impl Chunker for Lines {
///     fn chunk(&self, text: &str) -> seams::Result<Vec<Chunk>> {
///         let mut offset = 0;
///         Ok(text
///             .split_inclusive('\n')
///             .enumerate()
///             .map(|(index, line)| {
///                 let start = offset;
///                 offset += line.len();
///                 Chunk {
///                     text: line.to_string(),
///                     start,
///                     end: offset,
///                     index,
///                     token_count: line.split_whitespace().count(),
///                     segments: 1,
///                     oversized: false,
///                 }
///             })
///             .collect())
///     }
/// }
///
/// let output = Pipeline::new(Lines, Identity).run("a\nb\n").unwrap();
/// assert_eq!(output.text, "a\nb\n");
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks, in source order.
    ///
    /// # Errors
    ///
    /// Returns an error if token counting fails.
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>>;
}
