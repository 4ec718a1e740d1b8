//! Reading-time estimation

use crate::content::ContentBlock;

/// Assumed reading speed in words per minute
const WORDS_PER_MINUTE: usize = 200;

/// Estimate the reading time of a post's content, in whole minutes.
///
/// Words are the segments produced by splitting headings and body fragment
/// texts on single space characters. Runs of spaces and non-space whitespace
/// are deliberately not normalized, so `"a  b"` counts three words; this
/// mirrors the counting behavior the rendered output is expected to match.
/// A post with no content blocks yields 0 minutes.
pub fn reading_time(content: &[ContentBlock]) -> usize {
    let total_words: usize = content
        .iter()
        .map(|block| {
            let heading_words = block.heading.split(' ').count();
            let body_words: usize = block
                .body
                .iter()
                .map(|fragment| fragment.text.split(' ').count())
                .sum();
            heading_words + body_words
        })
        .sum();

    total_words.div_ceil(WORDS_PER_MINUTE)
}
