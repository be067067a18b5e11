//! Boundary splitting: paragraphs first, sentences on demand.
//!
//! ## Paragraphs
//!
//! A paragraph boundary is a run of two or more consecutive line breaks
//! (`\n` or `\r\n`). A line holding only spaces or tabs is content, not a
//! boundary, so it stays inside the paragraph around it.
//!
//! ```text
//! "Intro.\n\nBody one.\n\n\nBody two.\n \nStill two."
//!        ^^^^         ^^^^^^
//!        boundary     boundary (longer runs collapse)
//!
//! => ["Intro.", "Body one.", "Body two.\n \nStill two."]
//! ```
//!
//! Paragraph text is kept verbatim. Only paragraphs that are entirely
//! whitespace are discarded.
//!
//! ## Sentences
//!
//! Sentences are only needed when a paragraph alone overflows the token
//! budget. The default rule cuts after every sentence-terminal mark
//! (`.` `!` `?` and the full-width `。` `！` `？`), keeping the mark with the
//! sentence it ends:
//!
//! ```text
//! "One. Two! Three"  =>  ["One.", " Two!", " Three"]
//! ```
//!
//! Leading whitespace stays with the following sentence, so concatenating the
//! sentences reproduces the paragraph byte for byte (minus whitespace-only
//! pieces, which are dropped).
//!
//! The punctuation rule is crude on purpose: "Dr. Smith" becomes two
//! sentences. That only matters for how an oversized paragraph is packed,
//! never for what ends up in the output. [`SentenceRule::Unicode`] swaps in
//! UAX #29 sentence bounds for callers who want abbreviation handling.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Segment, SegmentKind};

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n){2,}").expect("blank-line pattern is valid"));

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?。！？]").expect("sentence-end pattern is valid"));

/// How an oversized paragraph is cut into sentences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SentenceRule {
    /// Cut after every `.` `!` `?` `。` `！` `？`.
    #[default]
    Punctuation,
    /// Unicode Standard Annex #29 sentence boundaries.
    Unicode,
}

/// Splits text into paragraph and sentence [`Segment`]s.
///
/// Pure and deterministic; never fails. Text without blank lines is a single
/// paragraph.
///
/// ## Example
///
/// ```rust
/// use seams::BoundarySplitter;
///
/// let splitter = BoundarySplitter::new();
/// let paragraphs = splitter.paragraphs("First.\n\nSecond. Third.");
///
/// assert_eq!(paragraphs.len(), 2);
/// assert_eq!(paragraphs[1].text, "Second. Third.");
///
/// let sentences = splitter.sentences(&paragraphs[1]);
/// assert_eq!(sentences[0].text, "Second.");
/// assert_eq!(sentences[1].text, " Third.");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundarySplitter {
    rule: SentenceRule,
}

impl BoundarySplitter {
    /// Create a splitter using the punctuation sentence rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different sentence rule.
    #[must_use]
    pub fn with_sentence_rule(mut self, rule: SentenceRule) -> Self {
        self.rule = rule;
        self
    }

    /// The configured sentence rule.
    #[must_use]
    pub fn sentence_rule(&self) -> SentenceRule {
        self.rule
    }

    /// Split text on blank-line boundaries.
    ///
    /// Whitespace-only paragraphs are dropped; indices are assigned to the
    /// paragraphs that remain.
    #[must_use]
    pub fn paragraphs(&self, text: &str) -> Vec<Segment> {
        let mut paragraphs = Vec::new();
        let mut start = 0;

        for boundary in BLANK_LINE.find_iter(text) {
            push_piece(
                &mut paragraphs,
                &text[start..boundary.start()],
                start,
                SegmentKind::Paragraph,
            );
            start = boundary.end();
        }
        push_piece(
            &mut paragraphs,
            &text[start..],
            start,
            SegmentKind::Paragraph,
        );

        paragraphs
    }

    /// Split one paragraph into sentences.
    ///
    /// Offsets stay relative to the paragraph's source document.
    #[must_use]
    pub fn sentences(&self, paragraph: &Segment) -> Vec<Segment> {
        let text = paragraph.text.as_str();
        let mut sentences = Vec::new();

        match self.rule {
            SentenceRule::Punctuation => {
                let mut start = 0;
                for mark in SENTENCE_END.find_iter(text) {
                    push_piece(
                        &mut sentences,
                        &text[start..mark.end()],
                        paragraph.start + start,
                        SegmentKind::Sentence,
                    );
                    start = mark.end();
                }
                push_piece(
                    &mut sentences,
                    &text[start..],
                    paragraph.start + start,
                    SegmentKind::Sentence,
                );
            }
            SentenceRule::Unicode => {
                for (offset, sentence) in text.split_sentence_bound_indices() {
                    push_piece(
                        &mut sentences,
                        sentence,
                        paragraph.start + offset,
                        SegmentKind::Sentence,
                    );
                }
            }
        }

        sentences
    }
}

fn push_piece(out: &mut Vec<Segment>, piece: &str, start: usize, kind: SegmentKind) {
    if piece.trim().is_empty() {
        return;
    }
    let index = out.len();
    out.push(Segment::new(piece, start, start + piece.len(), index, kind));
}

/// Split text into paragraphs with the default splitter.
///
/// ```rust
/// let paragraphs = seams::split("a\n\n\n\nb");
/// assert_eq!(paragraphs.len(), 2);
/// ```
#[must_use]
pub fn split(text: &str) -> Vec<Segment> {
    BoundarySplitter::new().paragraphs(text)
}
