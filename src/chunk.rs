//! The Chunk type: a budget-bounded run of segments.

/// A contiguous run of one or more segments, sized for one transform call.
///
/// Paragraphs inside a chunk are joined by a blank line (`"\n\n"`); sentences
/// cut from the same paragraph are joined with nothing, since each sentence
/// already carries its leading whitespace.
///
/// ## The Oversized Escape Hatch
///
/// `token_count <= max_tokens` holds for every chunk except one kind: a
/// single sentence that alone exceeds the budget. It is emitted as its own
/// chunk, whole, with `oversized` set. Nothing is ever truncated.
///
/// ```text
/// max_tokens = 4
///
/// "Tiny.\n\nOne two three four five six."
///
/// Chunk 0: "Tiny."                              tokens: 1
/// Chunk 1: "One two three four five six."      tokens: 6  oversized
/// ```
///
/// ## Offsets
///
/// `start..end` is the byte range of the source text the chunk was packed
/// from. `text` can differ from `&source[start..end]` where blank-line runs
/// were normalised to a single `"\n\n"` or whitespace-only sentences dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The packed text.
    pub text: String,
    /// Byte offset of the first segment in the source text.
    pub start: usize,
    /// Byte offset just past the last segment in the source text.
    pub end: usize,
    /// Zero-based position of this chunk in the sequence.
    pub index: usize,
    /// Token count of `text` as measured by the assembler's counter.
    pub token_count: usize,
    /// Number of segments packed into this chunk.
    pub segments: usize,
    /// Whether this chunk is a single sentence that exceeds the budget.
    pub oversized: bool,
}

impl Chunk {
    /// Length of the chunk text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the chunk has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte span of this chunk in the source text.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl AsRef<str> for Chunk {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ index: {}, span: {}..{}, tokens: {}, segments: {}{} }}",
            self.index,
            self.start,
            self.end,
            self.token_count,
            self.segments,
            if self.oversized { ", oversized" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let chunk = Chunk {
            text: "abc".into(),
            start: 4,
            end: 7,
            index: 2,
            token_count: 1,
            segments: 1,
            oversized: true,
        };
        assert_eq!(
            chunk.to_string(),
            "Chunk { index: 2, span: 4..7, tokens: 1, segments: 1, oversized }"
        );
        assert_eq!(chunk.span(), 4..7);
        assert_eq!(chunk.len(), 3);
    }
}
