//! Overlap-aware merging of transformed chunks.
//!
//! ## The Problem
//!
//! Transformed chunks are concatenated back into one document. When the
//! transform echoes trailing context, or callers feed it overlapping windows,
//! adjacent outputs repeat text at the seam:
//!
//! ```text
//! chunk 0: "The quick brown fox"
//! chunk 1:            " brown fox jumps"
//!                      ^^^^^^^^^^ repeated
//!
//! merged:  "The quick brown fox jumps"
//! ```
//!
//! ## The Algorithm
//!
//! For each next chunk, find the longest suffix of the merged text so far
//! that equals a prefix of the chunk, trying lengths from
//! `min(max_overlap_chars, len(merged), len(chunk))` down to
//! `min_overlap_chars`. Append only what follows the overlap. With no
//! overlap, append the chunk as is. No separator is ever inserted.
//!
//! Lengths are counted in Unicode scalar values, so a seam never splits a
//! multi-byte character.
//!
//! ## Exact Match Only
//!
//! A transform that paraphrases the boundary defeats detection and the two
//! chunks are simply concatenated. That is an accepted limitation: fuzzy
//! matching could delete content that merely looks similar.
//!
//! ## Cost
//!
//! Each seam costs at most `max_overlap_chars` comparisons of at most
//! `max_overlap_chars` characters. With the default of 100 that is small
//! next to the transform call that produced the chunk.

use crate::{Error, Result};

/// Default overlap search window, in characters.
pub const DEFAULT_MAX_OVERLAP_CHARS: usize = 100;

/// One join performed by the merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seam {
    /// Index of the chunk joined onto the merged text.
    pub index: usize,
    /// Characters collapsed at this join (0 for plain concatenation).
    pub overlap_chars: usize,
}

/// Merges an ordered sequence of texts, collapsing exact overlaps.
///
/// ## Example
///
/// ```rust
/// use seams::OverlapMerger;
///
/// let merger = OverlapMerger::new(20);
/// assert_eq!(
///     merger.merge(&["The quick brown fox", " brown fox jumps"]),
///     "The quick brown fox jumps"
/// );
/// assert_eq!(merger.merge(&["abc", "xyz"]), "abcxyz");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapMerger {
    max_overlap_chars: usize,
    min_overlap_chars: usize,
}

impl OverlapMerger {
    /// Create a merger that searches overlaps up to `max_overlap_chars` long.
    ///
    /// `0` disables overlap detection entirely.
    #[must_use]
    pub const fn new(max_overlap_chars: usize) -> Self {
        Self {
            max_overlap_chars,
            min_overlap_chars: 1,
        }
    }

    /// Ignore overlaps shorter than `min_overlap_chars`.
    ///
    /// Short overlaps are often coincidence: a chunk ending in `"."` and the
    /// next starting with `"."`. Raising the minimum trades missed short
    /// seams for fewer false collapses. Values below 1 are treated as 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OverlapBounds`] if the minimum exceeds the maximum.
    pub fn with_min_overlap(self, min_overlap_chars: usize) -> Result<Self> {
        if min_overlap_chars > self.max_overlap_chars {
            return Err(Error::OverlapBounds {
                min: min_overlap_chars,
                max: self.max_overlap_chars,
            });
        }
        Ok(Self {
            min_overlap_chars: min_overlap_chars.max(1),
            ..self
        })
    }

    /// The longest overlap searched, in characters.
    #[must_use]
    pub const fn max_overlap_chars(&self) -> usize {
        self.max_overlap_chars
    }

    /// The shortest overlap accepted, in characters.
    #[must_use]
    pub const fn min_overlap_chars(&self) -> usize {
        self.min_overlap_chars
    }

    /// Length in characters of the longest suffix of `left` that is a prefix
    /// of `right`, within the configured bounds. `0` if there is none.
    ///
    /// ```rust
    /// use seams::OverlapMerger;
    ///
    /// let merger = OverlapMerger::new(10);
    /// assert_eq!(merger.overlap("abcab", "abx"), 2);
    /// assert_eq!(merger.overlap("abc", "xyz"), 0);
    /// ```
    #[must_use]
    pub fn overlap(&self, left: &str, right: &str) -> usize {
        self.find_overlap(left, right).map_or(0, |(chars, _)| chars)
    }

    /// Returns `(chars, bytes)` of the overlap, `bytes` measured in `right`.
    fn find_overlap(&self, left: &str, right: &str) -> Option<(usize, usize)> {
        // suffix_starts[k] is where the (k+1)-char suffix of `left` begins
        let suffix_starts: Vec<usize> = left
            .char_indices()
            .rev()
            .take(self.max_overlap_chars)
            .map(|(i, _)| i)
            .collect();
        // prefix_ends[k] is where the (k+1)-char prefix of `right` ends
        let prefix_ends: Vec<usize> = right
            .char_indices()
            .take(self.max_overlap_chars)
            .map(|(i, c)| i + c.len_utf8())
            .collect();

        let limit = suffix_starts.len().min(prefix_ends.len());
        if limit < self.min_overlap_chars {
            return None;
        }

        (self.min_overlap_chars..=limit).rev().find_map(|len| {
            let suffix = &left[suffix_starts[len - 1]..];
            let prefix_end = prefix_ends[len - 1];
            (suffix == &right[..prefix_end]).then_some((len, prefix_end))
        })
    }

    /// Merge texts in order.
    ///
    /// Returns an empty string for an empty sequence.
    #[must_use]
    pub fn merge<S: AsRef<str>>(&self, chunks: &[S]) -> String {
        self.merge_with_seams(chunks).0
    }

    /// Merge texts in order, reporting every join.
    ///
    /// There is one [`Seam`] per chunk after the first.
    #[must_use]
    pub fn merge_with_seams<S: AsRef<str>>(&self, chunks: &[S]) -> (String, Vec<Seam>) {
        let Some((first, rest)) = chunks.split_first() else {
            return (String::new(), Vec::new());
        };

        let capacity = chunks.iter().map(|c| c.as_ref().len()).sum();
        let mut merged = String::with_capacity(capacity);
        merged.push_str(first.as_ref());
        let mut seams = Vec::with_capacity(rest.len());

        for (offset, chunk) in rest.iter().enumerate() {
            let chunk = chunk.as_ref();
            let index = offset + 1;

            let overlap_chars = match self.find_overlap(&merged, chunk) {
                Some((chars, bytes)) => {
                    tracing::debug!(chunk = index, overlap_chars = chars, "collapsed overlap");
                    merged.push_str(&chunk[bytes..]);
                    chars
                }
                None => {
                    tracing::debug!(chunk = index, "no overlap, concatenating");
                    merged.push_str(chunk);
                    0
                }
            };
            seams.push(Seam {
                index,
                overlap_chars,
            });
        }

        (merged, seams)
    }
}

impl Default for OverlapMerger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OVERLAP_CHARS)
    }
}

/// Merge texts with a default minimum overlap of one character.
///
/// ```rust
/// assert_eq!(seams::merge(&["hello wor", "world"], 100), "hello world");
/// ```
#[must_use]
pub fn merge<S: AsRef<str>>(chunks: &[S], max_overlap_chars: usize) -> String {
    OverlapMerger::new(max_overlap_chars).merge(chunks)
}
