//! Greedy token-bounded chunk assembly.
//!
//! ## The Algorithm
//!
//! Paragraphs are packed first-fit into a running buffer:
//!
//! ```text
//! for each paragraph p:
//!     if count(p) > max:
//!         flush buffer
//!         for each sentence s of p:       <- same packing, no separator
//!             pack(s)
//!     else:
//!         if count(buffer + "\n\n" + p) <= max: append
//!         else: flush buffer, buffer = p
//! flush buffer
//! ```
//!
//! The buffer is not flushed after the last sentence of a split paragraph:
//! the next paragraph may still join it.
//!
//! ## No Look-Ahead
//!
//! Packing is strictly greedy. A chunk is closed as soon as the next segment
//! does not fit, even when a smarter split would balance chunk sizes better.
//! That keeps chunk boundaries predictable from the input alone.
//!
//! ## Token Counts Are Measured, Not Summed
//!
//! `count(a + "\n\n" + b)` is what gets compared against the budget, not
//! `count(a) + count(b)`. BPE tokenizers merge across the join, and the
//! separator itself may cost tokens.

use crate::{
    BoundarySplitter, Chunk, Chunker, Result, Segment, SegmentKind, SentenceRule, TokenBudget,
    TokenCounter,
};

/// Separator between paragraphs packed into the same chunk.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Packs segments into chunks that fit a [`TokenBudget`].
///
/// ## Example
///
/// ```rust
/// use seams::{ChunkAssembler, Chunker, TokenBudget, WordCounter};
///
/// let assembler = ChunkAssembler::new(WordCounter, TokenBudget::new(4).unwrap());
/// let chunks = assembler.chunk("One two.\n\nThree four.\n\nFive.").unwrap();
///
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0].text, "One two.\n\nThree four.");
/// assert_eq!(chunks[1].text, "Five.");
/// ```
#[derive(Debug, Clone)]
pub struct ChunkAssembler<C> {
    counter: C,
    budget: TokenBudget,
    splitter: BoundarySplitter,
}

impl<C: TokenCounter> ChunkAssembler<C> {
    /// Create an assembler that measures with `counter` against `budget`.
    #[must_use]
    pub fn new(counter: C, budget: TokenBudget) -> Self {
        Self {
            counter,
            budget,
            splitter: BoundarySplitter::new(),
        }
    }

    /// Use a different rule for cutting oversized paragraphs into sentences.
    #[must_use]
    pub fn with_sentence_rule(mut self, rule: SentenceRule) -> Self {
        self.splitter = self.splitter.with_sentence_rule(rule);
        self
    }

    /// The token budget.
    #[must_use]
    pub fn budget(&self) -> TokenBudget {
        self.budget
    }

    /// The token counter.
    #[must_use]
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// The boundary splitter used for paragraphs and sentences.
    #[must_use]
    pub fn splitter(&self) -> &BoundarySplitter {
        &self.splitter
    }

    /// Pack paragraphs into chunks.
    ///
    /// Whitespace-only paragraphs are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenizer`](crate::Error::Tokenizer) if any count fails.
    pub fn assemble(&self, paragraphs: &[Segment]) -> Result<Vec<Chunk>> {
        let mut buffer = ChunkBuffer::default();
        let mut chunks = Vec::new();

        for paragraph in paragraphs.iter().filter(|p| !p.is_blank()) {
            let tokens = self.counter.count(&paragraph.text)?;

            if self.budget.fits(tokens) {
                self.pack(
                    &mut buffer,
                    &mut chunks,
                    paragraph,
                    PARAGRAPH_SEPARATOR,
                    Some(tokens),
                )?;
                continue;
            }

            tracing::debug!(
                paragraph = paragraph.index,
                tokens,
                max_tokens = self.budget.max_tokens(),
                "paragraph exceeds budget, splitting into sentences"
            );
            buffer.flush_into(&mut chunks);
            for sentence in self.splitter.sentences(paragraph) {
                self.pack(&mut buffer, &mut chunks, &sentence, "", None)?;
            }
        }

        buffer.flush_into(&mut chunks);
        Ok(chunks)
    }

    /// Offer one segment to the buffer, flushing first if it does not fit.
    fn pack(
        &self,
        buffer: &mut ChunkBuffer,
        chunks: &mut Vec<Chunk>,
        segment: &Segment,
        separator: &str,
        known_tokens: Option<usize>,
    ) -> Result<()> {
        if !buffer.is_empty() && !buffer.oversized {
            let candidate = buffer.joined(separator, &segment.text);
            let tokens = self.counter.count(&candidate)?;
            if self.budget.fits(tokens) {
                buffer.extend(candidate, segment, tokens);
                return Ok(());
            }
        }

        buffer.flush_into(chunks);
        let tokens = match known_tokens {
            Some(tokens) => tokens,
            None => self.counter.count(&segment.text)?,
        };
        let oversized = !self.budget.fits(tokens);
        if oversized {
            tracing::warn!(
                start = segment.start,
                tokens,
                max_tokens = self.budget.max_tokens(),
                "single sentence exceeds budget, emitting it whole"
            );
        }
        buffer.start(segment, tokens, oversized);
        Ok(())
    }
}

impl<C: TokenCounter> Chunker for ChunkAssembler<C> {
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        self.assemble(&self.splitter.paragraphs(text))
    }
}

/// The "current chunk" accumulator, local to one `assemble` call.
#[derive(Debug, Default)]
struct ChunkBuffer {
    text: String,
    start: usize,
    end: usize,
    tokens: usize,
    segments: usize,
    oversized: bool,
}

impl ChunkBuffer {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn joined(&self, separator: &str, next: &str) -> String {
        let mut candidate = String::with_capacity(self.text.len() + separator.len() + next.len());
        candidate.push_str(&self.text);
        candidate.push_str(separator);
        candidate.push_str(next);
        candidate
    }

    fn start(&mut self, segment: &Segment, tokens: usize, oversized: bool) {
        self.text.clone_from(&segment.text);
        self.start = segment.start;
        self.end = segment.end;
        self.tokens = tokens;
        self.segments = 1;
        self.oversized = oversized;
    }

    fn extend(&mut self, joined: String, segment: &Segment, tokens: usize) {
        self.text = joined;
        self.end = segment.end;
        self.tokens = tokens;
        self.segments += 1;
    }

    fn flush_into(&mut self, chunks: &mut Vec<Chunk>) {
        if self.is_empty() {
            return;
        }
        let buffer = std::mem::take(self);
        let chunk = Chunk {
            index: chunks.len(),
            text: buffer.text,
            start: buffer.start,
            end: buffer.end,
            token_count: buffer.tokens,
            segments: buffer.segments,
            oversized: buffer.oversized,
        };
        tracing::debug!(
            index = chunk.index,
            bytes = chunk.len(),
            tokens = chunk.token_count,
            segments = chunk.segments,
            "chunk assembled"
        );
        chunks.push(chunk);
    }
}

/// Pack standalone paragraphs into chunk texts.
///
/// Offsets are computed as if the paragraphs had been joined with
/// [`PARAGRAPH_SEPARATOR`].
///
/// ```rust
/// use seams::WordCounter;
///
/// let chunks = seams::assemble(&["a b", "c", "d e f"], 3, WordCounter).unwrap();
/// assert_eq!(chunks, vec!["a b\n\nc".to_string(), "d e f".to_string()]);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidBudget`](crate::Error::InvalidBudget) if
/// `max_tokens == 0`, or [`Error::Tokenizer`](crate::Error::Tokenizer) if a
/// count fails.
pub fn assemble<C: TokenCounter>(
    paragraphs: &[&str],
    max_tokens: usize,
    counter: C,
) -> Result<Vec<String>> {
    let mut offset = 0;
    let segments: Vec<Segment> = paragraphs
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let start = offset;
            offset += text.len() + PARAGRAPH_SEPARATOR.len();
            Segment::new(*text, start, start + text.len(), index, SegmentKind::Paragraph)
        })
        .collect();

    let assembler = ChunkAssembler::new(counter, TokenBudget::new(max_tokens)?);
    Ok(assembler
        .assemble(&segments)?
        .into_iter()
        .map(|chunk| chunk.text)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CharCounter, Error, WordCounter};

    fn assembler(max_tokens: usize) -> ChunkAssembler<WordCounter> {
        ChunkAssembler::new(WordCounter, TokenBudget::new(max_tokens).unwrap())
    }

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_packs_paragraphs_greedily() {
        let chunks = assembler(5).chunk("a b\n\nc d\n\ne f\n\ng").unwrap();
        assert_eq!(texts(&chunks), vec!["a b\n\nc d", "e f\n\ng"]);
        assert_eq!(chunks[0].segments, 2);
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn test_single_chunk_when_everything_fits() {
        let chunks = assembler(100).chunk("One.\n\nTwo.\n\nThree.").unwrap();
        assert_eq!(texts(&chunks), vec!["One.\n\nTwo.\n\nThree."]);
    }

    #[test]
    fn test_exact_fit() {
        let chunks = assembler(2).chunk("a\n\nb").unwrap();
        assert_eq!(texts(&chunks), vec!["a\n\nb"]);
        assert_eq!(chunks[0].token_count, 2);
    }

    #[test]
    fn test_oversized_paragraph_splits_into_sentences() {
        let text = "w1 w2. w3 w4. w5 w6.";
        let chunks = assembler(4).chunk(text).unwrap();
        assert_eq!(texts(&chunks), vec!["w1 w2. w3 w4.", " w5 w6."]);
        assert!(chunks.iter().all(|c| c.token_count <= 4));
    }

    #[test]
    fn test_buffer_flushed_before_oversized_paragraph() {
        let text = "lead\n\nw1 w2 w3. w4 w5 w6.";
        let chunks = assembler(4).chunk(text).unwrap();
        assert_eq!(texts(&chunks), vec!["lead", "w1 w2 w3.", " w4 w5 w6."]);
    }

    #[test]
    fn test_sentence_buffer_carries_into_next_paragraph() {
        let text = "w1 w2 w3. w4 w5.\n\nw6";
        let chunks = assembler(3).chunk(text).unwrap();
        assert_eq!(texts(&chunks), vec!["w1 w2 w3.", " w4 w5.\n\nw6"]);
    }

    #[test]
    fn test_oversized_sentence_is_own_chunk() {
        let text = "tiny\n\none two three four five six.\n\nend";
        let chunks = assembler(4).chunk(text).unwrap();
        assert_eq!(
            texts(&chunks),
            vec!["tiny", "one two three four five six.", "end"]
        );
        assert!(!chunks[0].oversized);
        assert!(chunks[1].oversized);
        assert_eq!(chunks[1].token_count, 6);
        assert!(!chunks[2].oversized);
    }

    #[test]
    fn test_oversized_sentence_between_sentences() {
        let text = "a. b c d e f g. h.";
        let chunks = assembler(3).chunk(text).unwrap();
        assert_eq!(texts(&chunks), vec!["a.", " b c d e f g.", " h."]);
        assert!(chunks[1].oversized);
    }

    #[test]
    fn test_no_terminal_punctuation_oversized() {
        let text = "x ".repeat(50);
        let chunks = assembler(10).chunk(&text).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
        assert!(chunks[0].oversized);
    }

    #[test]
    fn test_spans_cover_source() {
        let text = "One two.\n\n\nThree.\n\nFour five six.";
        let chunks = assembler(3).chunk(text).unwrap();
        assert_eq!(chunks[0].start, 0);
        assert_eq!(&text[chunks[0].span()], "One two.\n\n\nThree.");
        assert_eq!(chunks[0].text, "One two.\n\nThree.");
        assert_eq!(&text[chunks.last().unwrap().span()], "Four five six.");
    }

    #[test]
    fn test_empty_input() {
        assert!(assembler(5).chunk("").unwrap().is_empty());
        assert!(assembler(5).chunk(" \n\n\t").unwrap().is_empty());
    }

    #[test]
    fn test_char_budget() {
        let assembler = ChunkAssembler::new(CharCounter, TokenBudget::new(10).unwrap());
        let chunks = assembler.chunk("abcd\n\nefgh\n\nij").unwrap();
        // "abcd\n\nefgh" is exactly 10 chars
        assert_eq!(texts(&chunks), vec!["abcd\n\nefgh", "ij"]);
    }

    #[test]
    fn test_tokenizer_error_propagates() {
        struct Broken;
        impl TokenCounter for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn count(&self, _text: &str) -> Result<usize> {
                Err(Error::Tokenizer {
                    counter: "broken".into(),
                    message: "bad input".into(),
                })
            }
        }

        let assembler = ChunkAssembler::new(Broken, TokenBudget::new(5).unwrap());
        assert!(matches!(
            assembler.chunk("text"),
            Err(Error::Tokenizer { .. })
        ));
    }

    #[test]
    fn test_free_fn() {
        let chunks = assemble(&["a b", "", "c d"], 2, WordCounter).unwrap();
        assert_eq!(chunks, vec!["a b".to_string(), "c d".to_string()]);
        assert!(matches!(
            assemble(&["a"], 0, WordCounter),
            Err(Error::InvalidBudget(0))
        ));
    }
}
