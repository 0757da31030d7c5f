//! Tokenizer
//!
//! Lowercases and splits text on non-alphanumeric boundaries. The same
//! tokenizer is used for documents, queries and word counting, so a word
//! counted on a page and a term matched in the index agree on what a
//! "word" is.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of Unicode alphabetic or numeric characters.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Alphabetic}\p{N}]+").expect("token pattern is a valid regex")
});

/// A token with its byte span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lowercased term
    pub term: String,
    /// Byte offset where the token starts
    pub start: usize,
    /// Byte offset one past the token end
    pub end: usize,
}

/// A whole-word match found by [`find_word`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMatch {
    /// Byte offset of the first matched token
    pub start: usize,
    /// Byte offset one past the last matched token
    pub end: usize,
}

/// Tokenize text into lowercase terms.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Tokenize text, keeping byte spans into the original string.
pub fn tokenize_with_spans(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| Token {
            term: m.as_str().to_lowercase(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Find every whole-word, case-insensitive occurrence of `word` in `text`.
///
/// `word` may span several tokens ("data science"); it then matches the same
/// token sequence. Matches do not overlap.
pub fn find_word(text: &str, word: &str) -> Vec<WordMatch> {
    let needle = tokenize(word);
    if needle.is_empty() {
        return Vec::new();
    }

    let tokens = tokenize_with_spans(text);
    let mut matches = Vec::new();
    let mut i = 0;

    while i + needle.len() <= tokens.len() {
        let window = &tokens[i..i + needle.len()];
        if window.iter().zip(&needle).all(|(t, n)| t.term == *n) {
            matches.push(WordMatch {
                start: window[0].start,
                end: window[needle.len() - 1].end,
            });
            i += needle.len();
        } else {
            i += 1;
        }
    }

    matches
}

/// Count whole-word, case-insensitive occurrences of `word` in `text`.
pub fn count_word(text: &str, word: &str) -> usize {
    find_word(text, word).len()
}
