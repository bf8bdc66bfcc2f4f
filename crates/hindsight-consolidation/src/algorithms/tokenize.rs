//! Lexical normalization for token-overlap similarity.

use std::collections::BTreeSet;

/// Lowercase, drop apostrophes ("don't" → "dont"), split on anything that is
/// not alphanumeric, and remove stop words and single characters.
pub fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(['\'', '’'], "")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 1 && !is_stop_word(w))
        .map(str::to_string)
        .collect()
}

/// Distinct tokens, ordered.
pub fn token_set(text: &str) -> BTreeSet<String> {
    tokens(text).into_iter().collect()
}

/// Number of whitespace-separated words, before any filtering.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// Negations ("not", "dont", "never") are deliberately kept: they carry the
// meaning of a correction.
fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the"
            | "and"
            | "for"
            | "are"
            | "but"
            | "you"
            | "all"
            | "can"
            | "was"
            | "our"
            | "has"
            | "have"
            | "been"
            | "from"
            | "this"
            | "that"
            | "with"
            | "will"
            | "its"
            | "into"
            | "an"
            | "is"
            | "it"
            | "of"
            | "on"
            | "in"
            | "to"
            | "be"
            | "so"
            | "at"
            | "or"
            | "as"
            | "me"
            | "my"
            | "we"
            | "please"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apostrophes_are_folded() {
        assert_eq!(tokens("Don't"), vec!["dont"]);
        assert_eq!(tokens("don’t"), vec!["dont"]);
    }

    #[test]
    fn punctuation_splits_tokens() {
        assert_eq!(
            tokens("don't use try/except pass"),
            vec!["dont", "use", "try", "except", "pass"]
        );
    }

    #[test]
    fn stop_words_and_single_chars_are_dropped() {
        assert_eq!(tokens("use Y in the module"), vec!["use", "module"]);
    }

    #[test]
    fn negations_survive() {
        assert!(tokens("that is not right").contains(&"not".to_string()));
    }

    #[test]
    fn word_count_counts_raw_words() {
        assert_eq!(word_count("  looks   good to me "), 4);
        assert_eq!(word_count(""), 0);
    }
}
