//! The split → transform → merge pipeline.
//!
//! ## Data Flow
//!
//! ```text
//! text ──▶ preprocess ──▶ chunk ──▶ transform (per chunk) ──▶ merge ──▶ text
//!          (optional)     (split +    (fallible, order       (overlap
//!                          assemble)   restored by index)      collapse)
//! ```
//!
//! ## Failure Policy
//!
//! A transform failure is local to its chunk: the chunk's original text is
//! merged in its place and the failure is recorded in the
//! [`PipelineOutput`]. The run itself only fails when the token counter
//! fails, or when parallel execution cannot be set up.
//!
//! Empty or whitespace-only input is not an error either. It yields an empty
//! output without calling the transform.
//!
//! ## Execution
//!
//! Chunks are independent, so [`Execution::Parallel`] may transform them on
//! a thread pool (feature `parallel`). Results are collected by chunk index
//! before merging, so the output is identical to a sequential run.

use std::borrow::Cow;

use crate::{
    merge::DEFAULT_MAX_OVERLAP_CHARS, strip_references, Chunk, ChunkAssembler, Chunker, Error,
    OverlapMerger, Result, Seam, TokenBudget, TokenCounter, Transform, TransformError,
};

/// How transform calls are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    /// One chunk at a time, in order.
    #[default]
    Sequential,
    /// Fan out over a thread pool; requires the `parallel` feature.
    Parallel {
        /// Worker threads; `0` lets the pool pick.
        threads: usize,
    },
}

/// Pipeline settings that are not part of chunking.
///
/// ```rust
/// use seams::{Execution, PipelineConfig};
///
/// let config = PipelineConfig::new()
///     .with_max_overlap_chars(50)
///     .with_strip_references(true)
///     .with_execution(Execution::Sequential);
///
/// assert_eq!(config.merger().max_overlap_chars(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    merger: OverlapMerger,
    strip_references: bool,
    execution: Execution,
}

impl PipelineConfig {
    /// Defaults: 100-character overlap window, references kept, sequential.
    #[must_use]
    pub fn new() -> Self {
        Self {
            merger: OverlapMerger::new(DEFAULT_MAX_OVERLAP_CHARS),
            strip_references: false,
            execution: Execution::Sequential,
        }
    }

    /// Search overlaps up to `max_overlap_chars` long (minimum resets to 1).
    #[must_use]
    pub fn with_max_overlap_chars(mut self, max_overlap_chars: usize) -> Self {
        self.merger = OverlapMerger::new(max_overlap_chars);
        self
    }

    /// Use a fully configured merger.
    #[must_use]
    pub fn with_merger(mut self, merger: OverlapMerger) -> Self {
        self.merger = merger;
        self
    }

    /// Cut the input at its references section before chunking.
    #[must_use]
    pub fn with_strip_references(mut self, strip: bool) -> Self {
        self.strip_references = strip;
        self
    }

    /// Choose sequential or parallel transform calls.
    #[must_use]
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// The overlap merger.
    #[must_use]
    pub fn merger(&self) -> &OverlapMerger {
        &self.merger
    }

    /// Whether the references section is stripped.
    #[must_use]
    pub fn strip_references(&self) -> bool {
        self.strip_references
    }

    /// The execution mode.
    #[must_use]
    pub fn execution(&self) -> Execution {
        self.execution
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkStatus {
    /// The transform succeeded; its output was merged.
    Transformed,
    /// The transform failed; the original chunk text was merged instead.
    FellBack(TransformError),
}

/// Per-chunk record of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOutcome {
    /// Chunk index.
    pub index: usize,
    /// Tokens in the chunk sent to the transform.
    pub tokens: usize,
    /// Whether the chunk was emitted whole despite exceeding the budget.
    pub oversized: bool,
    /// Transform result.
    pub status: ChunkStatus,
}

impl ChunkOutcome {
    /// Whether the transform failed for this chunk.
    #[must_use]
    pub fn fell_back(&self) -> bool {
        matches!(self.status, ChunkStatus::FellBack(_))
    }
}

/// Result of [`Pipeline::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    /// The merged document.
    pub text: String,
    /// One outcome per chunk, in order.
    pub chunks: Vec<ChunkOutcome>,
    /// One seam per chunk after the first.
    pub seams: Vec<Seam>,
}

impl PipelineOutput {
    /// Whether the input held no content at all.
    #[must_use]
    pub fn is_empty_input(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunks whose transform failed.
    pub fn failures(&self) -> impl Iterator<Item = &ChunkOutcome> {
        self.chunks.iter().filter(|c| c.fell_back())
    }

    /// Whether any chunk fell back to its original text.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Chunks text, transforms each chunk, and merges the results.
///
/// ## Example
///
/// ```rust
/// use seams::{ChunkAssembler, Pipeline, TokenBudget, TransformError, WordCounter};
///
/// let assembler = ChunkAssembler::new(WordCounter, TokenBudget::new(3).unwrap());
/// let shout = |text: &str| -> Result<String, TransformError> { Ok(text.to_uppercase()) };
///
/// let output = Pipeline::new(assembler, shout)
///     .run("one two\n\nthree four")
///     .unwrap();
///
/// assert_eq!(output.chunks.len(), 2);
/// assert_eq!(output.text, "ONE TWOTHREE FOUR");
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline<K, T> {
    chunker: K,
    transform: T,
    config: PipelineConfig,
}

impl<K: Chunker, T: Transform> Pipeline<K, T> {
    /// Create a pipeline with the default configuration.
    #[must_use]
    pub fn new(chunker: K, transform: T) -> Self {
        Self {
            chunker,
            transform,
            config: PipelineConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The chunker.
    #[must_use]
    pub fn chunker(&self) -> &K {
        &self.chunker
    }

    /// Run the pipeline over `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenizer`] if chunking fails to count tokens, or
    /// [`Error::Parallel`] if parallel execution is requested but unavailable.
    /// Transform failures are never errors; see [`PipelineOutput::failures`].
    pub fn run(&self, text: &str) -> Result<PipelineOutput> {
        let text = if self.config.strip_references {
            strip_references(text)
        } else {
            Cow::Borrowed(text)
        };

        let chunks = self.chunker.chunk(&text)?;
        if chunks.is_empty() {
            tracing::info!("input has no content, nothing to transform");
            return Ok(PipelineOutput::default());
        }
        tracing::info!(
            chunks = chunks.len(),
            bytes = text.len(),
            "transforming chunks"
        );

        let results = self.transform_all(&chunks)?;

        let mut texts = Vec::with_capacity(chunks.len());
        let mut outcomes = Vec::with_capacity(chunks.len());
        for (chunk, result) in chunks.into_iter().zip(results) {
            let status = match result {
                Ok(transformed) => {
                    texts.push(transformed);
                    ChunkStatus::Transformed
                }
                Err(e) => {
                    tracing::warn!(
                        chunk = chunk.index,
                        "transform failed, keeping original text: {e}"
                    );
                    texts.push(chunk.text);
                    ChunkStatus::FellBack(e)
                }
            };
            outcomes.push(ChunkOutcome {
                index: chunk.index,
                tokens: chunk.token_count,
                oversized: chunk.oversized,
                status,
            });
        }

        let (text, seams) = self.config.merger.merge_with_seams(&texts);
        let output = PipelineOutput {
            text,
            chunks: outcomes,
            seams,
        };
        tracing::info!(
            chunks = output.chunks.len(),
            failures = output.failures().count(),
            bytes = output.text.len(),
            "pipeline finished"
        );
        Ok(output)
    }

    /// Transform every chunk, returning results in chunk order.
    fn transform_all(
        &self,
        chunks: &[Chunk],
    ) -> Result<Vec<std::result::Result<String, TransformError>>> {
        match self.config.execution {
            Execution::Sequential => Ok(chunks.iter().map(|c| self.transform_one(c)).collect()),
            Execution::Parallel { threads } => self.transform_parallel(chunks, threads),
        }
    }

    #[cfg(feature = "parallel")]
    fn transform_parallel(
        &self,
        chunks: &[Chunk],
        threads: usize,
    ) -> Result<Vec<std::result::Result<String, TransformError>>> {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::Parallel(e.to_string()))?;

        // par_iter().collect() keeps input order regardless of completion order
        Ok(pool.install(|| chunks.par_iter().map(|c| self.transform_one(c)).collect()))
    }

    #[cfg(not(feature = "parallel"))]
    #[allow(clippy::unused_self)]
    fn transform_parallel(
        &self,
        _chunks: &[Chunk],
        _threads: usize,
    ) -> Result<Vec<std::result::Result<String, TransformError>>> {
        Err(Error::Parallel(
            "built without the `parallel` feature".to_string()
        ))
    }

    fn transform_one(&self, chunk: &Chunk) -> std::result::Result<String, TransformError> {
        tracing::debug!(
            chunk = chunk.index,
            tokens = chunk.token_count,
            "transforming chunk"
        );
        let result = self.transform.transform(&chunk.text);
        if let Ok(out) = &result {
            tracing::debug!(
                chunk = chunk.index,
                in_bytes = chunk.len(),
                out_bytes = out.len(),
                "chunk transformed"
            );
        }
        result
    }
}

/// Run the full pipeline with default settings and return only the text.
///
/// ```rust
/// use seams::{Identity, WordCounter};
///
/// let out = seams::run("Alpha beta.\n\nGamma.", 2, WordCounter, Identity, 100).unwrap();
/// assert_eq!(out, "Alpha beta.Gamma.");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidBudget`] if `max_tokens == 0`, or
/// [`Error::Tokenizer`] if a token count fails.
pub fn run<C, T>(
    text: &str,
    max_tokens: usize,
    counter: C,
    transform: T,
    max_overlap_chars: usize,
) -> Result<String>
where
    C: TokenCounter,
    T: Transform,
{
    let assembler = ChunkAssembler::new(counter, TokenBudget::new(max_tokens)?);
    let config = PipelineConfig::new().with_max_overlap_chars(max_overlap_chars);
    Ok(Pipeline::new(assembler, transform)
        .with_config(config)
        .run(text)?
        .text)
}
