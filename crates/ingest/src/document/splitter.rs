//! Sentence splitting.
//!
//! A sentence ends at any run of `.`, `!` or `?`. The terminal punctuation is
//! consumed, each fragment is trimmed and empty fragments are dropped.
//! Decimal numbers and abbreviations are split like any other full stop.

use gist_core::{index_sentences, Sentence};

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split `text` into trimmed, non-empty sentences in reading order.
///
/// A run such as `?!` or `...` acts as a single delimiter: the empty
/// fragments between its characters are discarded. Text without terminal
/// punctuation yields the whole trimmed text, or nothing if it is blank.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(is_terminal)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Same as [`split_sentences`], with 0-based positions attached.
pub fn split_indexed(text: &str) -> Vec<Sentence> {
    index_sentences(split_sentences(text))
}
