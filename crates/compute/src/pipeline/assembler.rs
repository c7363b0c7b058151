use gist_core::Sentence;

/// Join sentence texts with `". "` and close with a final period.
pub fn join_with_period<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = texts.into_iter().collect::<Vec<_>>().join(". ");
    format!("{joined}.")
}

/// Restore reading order and render the selected sentences as one summary.
pub fn assemble(mut selected: Vec<Sentence>) -> String {
    selected.sort_by_key(|s| s.index);
    join_with_period(selected.iter().map(|s| s.text.as_str()))
}

/// Degraded-mode summary: the first `count` sentences, in order.
pub fn leading_sentences(sentences: &[Sentence], count: usize) -> String {
    join_with_period(sentences.iter().take(count).map(|s| s.text.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gist_core::index_sentences;

    #[test]
    fn assemble_sorts_by_original_index() {
        let selected = vec![
            Sentence::new(4, "Fifth"),
            Sentence::new(0, "First"),
            Sentence::new(2, "Third"),
        ];
        assert_eq!(assemble(selected), "First. Third. Fifth.");
    }

    #[test]
    fn single_sentence_gets_trailing_period() {
        assert_eq!(assemble(vec![Sentence::new(3, "Alone")]), "Alone.");
    }

    #[test]
    fn leading_sentences_takes_prefix() {
        let sentences = index_sentences(["One", "Two", "Three", "Four"]);
        assert_eq!(leading_sentences(&sentences, 2), "One. Two.");
        assert_eq!(leading_sentences(&sentences, 10), "One. Two. Three. Four.");
    }
}
