//! Optional cleanup applied before chunking.
//!
//! Text extracted from academic papers ends in a bibliography that is
//! expensive to send through a transform and rarely wanted in the output.
//! [`strip_references`] cuts it off.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

// Not preceded by a letter; anything may follow.
static REFERENCES_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z])(references)").expect("references pattern is valid")
});

/// Drop everything from the first `REFERENCES` heading onward.
///
/// The marker matches in any case, so "References", "REFERENCES" and
/// "references" all count. It must not follow an ASCII letter, which keeps
/// "preferences" intact, but it may touch digits, punctuation or CJK text:
/// `"REFERENCES1. Smith"` and `"参考文献References"` are both cut. Text
/// without a marker is returned borrowed and unchanged.
///
/// ```rust
/// use seams::strip_references;
///
/// let text = "Body of the paper.\n\nREFERENCES\n[1] Someone, 2020.";
/// assert_eq!(strip_references(text), "Body of the paper.\n\n");
///
/// let text = "User preferences matter.";
/// assert_eq!(strip_references(text), text);
/// ```
#[must_use]
pub fn strip_references(text: &str) -> Cow<'_, str> {
    match REFERENCES_MARKER
        .captures(text)
        .and_then(|captures| captures.get(1))
    {
        Some(marker) => {
            tracing::info!(
                removed_bytes = text.len() - marker.start(),
                "stripped references section"
            );
            Cow::Owned(text[..marker.start()].to_string())
        }
        None => Cow::Borrowed(text),
    }
}
