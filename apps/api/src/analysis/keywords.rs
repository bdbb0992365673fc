//! Résumé keyword extraction: the most frequent meaningful words of a text.
//!
//! Deliberately simpler than the normalizer: whitespace split, punctuation trim,
//! no lemmatization. Used to auto-detect search terms for job matching.

use crate::analysis::normalizer::{count_in_order, Normalizer};

pub const DEFAULT_TOP_KEYWORDS: usize = 10;

/// Words shorter than this many characters are never keywords.
const MIN_KEYWORD_CHARS: usize = 4;

/// Returns up to `top_n` keywords, most frequent first; equal counts keep
/// the order of first occurrence.
pub fn top_keywords(normalizer: &Normalizer, text: &str, top_n: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let words = lowered
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS)
        .filter(|w| w.chars().all(char::is_alphabetic))
        .filter(|w| !normalizer.is_stop_word(w))
        .map(String::from);

    let mut counts = count_in_order(words);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(top_n).map(|(word, _)| word).collect()
}
