//! Property-based tests for chunking and merging.
//!
//! These tests verify the pipeline's key invariants:
//! - Budget: every chunk fits, except a lone oversized sentence
//! - Coverage: identity transform loses no content
//! - Ordered: chunk spans follow the source
//! - Fallback: a failing transform behaves like identity
//! - Merge: output starts with the first chunk and ends with the last

use proptest::prelude::*;
use seams::{
    merge, Chunk, ChunkAssembler, Chunker, CharCounter, Identity, OverlapMerger, Pipeline,
    PipelineConfig, TokenBudget, TokenCounter, TransformError, WordCounter,
};

// =============================================================================
// Test Generators
// =============================================================================

/// Paragraphs of unique words `w0 w1 ...`, some ending in a period.
///
/// Unique words mean no two chunks can share a boundary by coincidence:
/// chunks end in a digit or `.`, and start with `w` or a space.
fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), 1..25), 1..8).prop_map(
        |paragraphs| {
            let mut n = 0;
            paragraphs
                .iter()
                .map(|ends| {
                    ends.iter()
                        .map(|&period| {
                            n += 1;
                            if period {
                                format!("w{n}.")
                            } else {
                                format!("w{n}")
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        },
    )
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn chunker(max_tokens: usize) -> ChunkAssembler<WordCounter> {
    ChunkAssembler::new(WordCounter, TokenBudget::new(max_tokens).unwrap())
}

// =============================================================================
// Invariant Helpers
// =============================================================================

/// Every chunk fits, or is a single oversized segment.
fn within_budget(chunks: &[Chunk], max_tokens: usize) -> bool {
    chunks.iter().all(|c| {
        if c.oversized {
            c.segments == 1 && c.token_count > max_tokens
        } else {
            c.token_count <= max_tokens
        }
    })
}

/// Spans are increasing and do not overlap.
fn spans_ordered(chunks: &[Chunk]) -> bool {
    chunks
        .windows(2)
        .all(|w| w[0].end <= w[1].start && w[0].start < w[1].start)
}

// =============================================================================
// Chunk Assembly
// =============================================================================

proptest! {
    #[test]
    fn chunks_respect_budget(text in document(), max_tokens in 1usize..20) {
        let chunks = chunker(max_tokens).chunk(&text).unwrap();
        prop_assert!(within_budget(&chunks, max_tokens));
    }

    #[test]
    fn recorded_token_counts_are_accurate(text in document(), max_tokens in 1usize..20) {
        for chunk in chunker(max_tokens).chunk(&text).unwrap() {
            prop_assert_eq!(WordCounter.count(&chunk.text).unwrap(), chunk.token_count);
        }
    }

    #[test]
    fn chunks_are_ordered(text in document(), max_tokens in 1usize..20) {
        let chunks = chunker(max_tokens).chunk(&text).unwrap();
        prop_assert!(spans_ordered(&chunks));
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn chunks_cover_content(text in document(), max_tokens in 1usize..20) {
        let chunks = chunker(max_tokens).chunk(&text).unwrap();
        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
        prop_assert_eq!(strip_whitespace(&joined), strip_whitespace(&text));
    }

    #[test]
    fn char_budget_respected(text in document(), max_tokens in 5usize..200) {
        let assembler = ChunkAssembler::new(CharCounter, TokenBudget::new(max_tokens).unwrap());
        let chunks = assembler.chunk(&text).unwrap();
        prop_assert!(within_budget(&chunks, max_tokens));
    }
}

// =============================================================================
// Pipeline
// =============================================================================

proptest! {
    #[test]
    fn identity_pipeline_preserves_content(text in document(), max_tokens in 1usize..20) {
        let output = Pipeline::new(chunker(max_tokens), Identity).run(&text).unwrap();
        prop_assert_eq!(strip_whitespace(&output.text), strip_whitespace(&text));
    }

    #[test]
    fn failing_transform_matches_identity(text in document(), max_tokens in 1usize..20) {
        let failing = |_: &str| -> Result<String, TransformError> { Err("unavailable".into()) };

        let identity = Pipeline::new(chunker(max_tokens), Identity).run(&text).unwrap();
        let fallback = Pipeline::new(chunker(max_tokens), failing).run(&text).unwrap();

        prop_assert_eq!(&fallback.text, &identity.text);
        prop_assert_eq!(fallback.failures().count(), fallback.chunks.len());
    }

    #[test]
    fn overlap_window_irrelevant_without_shared_boundaries(
        text in document(),
        max_tokens in 1usize..20,
        window in 0usize..200,
    ) {
        let config = PipelineConfig::new().with_max_overlap_chars(window);
        let windowed = Pipeline::new(chunker(max_tokens), Identity)
            .with_config(config)
            .run(&text)
            .unwrap();
        let plain = Pipeline::new(chunker(max_tokens), Identity).run(&text).unwrap();
        prop_assert_eq!(windowed.text, plain.text);
    }
}

// =============================================================================
// Merging
// =============================================================================

proptest! {
    #[test]
    fn merge_keeps_both_ends(a in "[ab ]{0,30}", b in "[ab ]{0,30}", window in 0usize..40) {
        let merged = merge(&[a.as_str(), b.as_str()], window);
        prop_assert!(merged.starts_with(&a));
        prop_assert!(merged.ends_with(&b));
        prop_assert!(merged.len() <= a.len() + b.len());
    }

    #[test]
    fn merge_without_window_concatenates(chunks in prop::collection::vec("[a-c]{0,10}", 0..6)) {
        let merged = merge(&chunks, 0);
        prop_assert_eq!(merged, chunks.concat());
    }

    #[test]
    fn merge_collapses_known_overlap(
        head in "[a-z]{1,10}",
        shared in "[A-Z]{1,10}",
        tail in "[0-9]{1,10}",
    ) {
        // head/shared/tail use disjoint alphabets, so `shared` is the only overlap
        let left = format!("{head}{shared}");
        let right = format!("{shared}{tail}");
        let merger = OverlapMerger::new(20);
        prop_assert_eq!(merger.overlap(&left, &right), shared.len());
        prop_assert_eq!(merger.merge(&[left, right]), format!("{head}{shared}{tail}"));
    }

    #[test]
    fn merge_seam_count(chunks in prop::collection::vec("[a-c]{0,10}", 1..6)) {
        let (_, seams) = OverlapMerger::default().merge_with_seams(&chunks);
        prop_assert_eq!(seams.len(), chunks.len() - 1);
    }
}

// =============================================================================
// Consistency Tests
// =============================================================================

#[test]
fn chunking_is_deterministic() {
    let text = "Alpha beta gamma. Delta epsilon.\n\nZeta eta theta iota kappa.";
    let a = chunker(4).chunk(text).unwrap();
    let b = chunker(4).chunk(text).unwrap();
    assert_eq!(a, b);
}
