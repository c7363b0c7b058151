use serde::{Deserialize, Serialize};

/// 0-based position of a sentence in the source text.
pub type SentenceIndex = usize;

/// A single sentence produced by the splitter.
///
/// The index is the only ordering key used when a summary is reassembled,
/// so it always refers to the position in the full split output, never to a
/// position in some filtered subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub index: SentenceIndex,
    pub text: String,
}

impl Sentence {
    pub fn new(index: SentenceIndex, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Character count (not bytes), used by the length gates.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Wrap plain strings into indexed sentences, preserving order.
pub fn index_sentences<I, S>(texts: I) -> Vec<Sentence>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(i, t)| Sentence::new(i, t))
        .collect()
}
