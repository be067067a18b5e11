//! The Segment type: a paragraph or sentence cut from the source text.

/// Granularity of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Text between two blank-line boundaries.
    Paragraph,
    /// Text ending in sentence-terminal punctuation, cut from an oversized paragraph.
    Sentence,
}

/// A contiguous slice of the source text, used as the packing atom.
///
/// ## Byte Offsets
///
/// `start` and `end` are byte offsets into the text the segment was cut
/// from, matching Rust's string slicing semantics:
///
/// ```rust
/// use seams::{Segment, SegmentKind};
///
/// let text = "Intro.\n\nBody text.";
/// let seg = Segment::new("Body text.", 8, 18, 1, SegmentKind::Paragraph);
///
/// assert_eq!(&text[seg.span()], "Body text.");
/// ```
///
/// Sentences produced from a paragraph keep offsets into the original
/// document, not into the paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The segment text, verbatim.
    pub text: String,
    /// Byte offset where this segment starts in the source text.
    pub start: usize,
    /// Byte offset where this segment ends (exclusive) in the source text.
    pub end: usize,
    /// Zero-based ordinal among segments of the same split.
    pub index: usize,
    /// Paragraph or sentence.
    pub kind: SegmentKind,
}

impl Segment {
    /// Create a new segment.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        start: usize,
        end: usize,
        index: usize,
        kind: SegmentKind,
    ) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
            kind,
        }
    }

    /// Length of the segment in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the segment has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the segment holds only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The byte span of this segment in the source text.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl AsRef<str> for Segment {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Segment {{ index: {}, kind: {:?}, span: {}..{}, len: {} }}",
            self.index,
            self.kind,
            self.start,
            self.end,
            self.len()
        )
    }
}
