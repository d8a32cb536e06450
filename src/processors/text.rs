//! OCR text tokenization and keyword scoring.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::domain::KeywordLexicon;

static WORD_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w").expect("valid regex"));

/// True when the text contains at least one word character.
pub fn has_word_content(text: &str) -> bool {
    WORD_CHAR.is_match(text)
}

/// Lowercases, splits on whitespace and keeps purely alphabetic tokens
/// longer than one character.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() > 1 && token.chars().all(char::is_alphabetic))
        .map(str::to_string)
        .collect()
}

/// Fraction of lexicon entries present among `tokens`.
///
/// Returns `(matched, fraction)`; an empty lexicon yields `(0, 0.0)`.
pub fn keyword_match_fraction(tokens: &[String], lexicon: &KeywordLexicon) -> (usize, f32) {
    if lexicon.is_empty() {
        return (0, 0.0);
    }
    let token_set: HashSet<String> = tokens.iter().cloned().collect();
    let matched = lexicon.count_matches(&token_set);
    (matched, matched as f32 / lexicon.len() as f32)
}
