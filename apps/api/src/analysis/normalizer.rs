//! Text Normalizer: turns raw text into a sequence of clean lemma tokens.
//!
//! Pipeline: lower-case → Unicode word segmentation (UAX #29) → clitic split
//! → alphabetic filter → stop-word filter → lemmatization → stop-word filter on
//! the lemma.
//!
//! Configuration is an immutable `NormalizerConfig` value owned by each
//! `Normalizer`, so normalizers for different languages can coexist.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::lemmatizer::lemmatize;
use crate::analysis::stop_words::ENGLISH_STOP_WORDS;
use crate::errors::AnalysisError;

/// Share of non-whitespace characters that may be control or replacement
/// characters before a text is rejected as undecodable garbage.
pub const DEFAULT_MAX_GARBAGE_RATIO: f64 = 0.3;

/// Trailing pieces of "team's", "we're", "don't" and the like.
const CLITICS: &[&str] = &["s", "t", "re", "ve", "ll", "d", "m"];

#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    pub stop_words: HashSet<String>,
    pub lemmatize: bool,
    pub max_garbage_ratio: f64,
}

impl NormalizerConfig {
    pub fn english() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            lemmatize: true,
            max_garbage_ratio: DEFAULT_MAX_GARBAGE_RATIO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn english() -> Self {
        Self::new(NormalizerConfig::english())
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.config.stop_words.contains(word)
    }

    /// Returns every surviving lemma in text order, duplicates retained.
    ///
    /// Empty or whitespace-only text yields an empty sequence. Text the
    /// tokenizer cannot meaningfully process fails with `AnalysisError`.
    pub fn normalize(&self, text: &str) -> Result<Vec<String>, AnalysisError> {
        self.check_processable(text)?;

        let lowered = text.to_lowercase();
        let tokens: Vec<String> = lowered
            .unicode_words()
            .flat_map(split_clitics)
            .filter(|word| !word.is_empty() && word.chars().all(char::is_alphabetic))
            .filter(|word| !self.is_stop_word(word))
            .map(|word| {
                if self.config.lemmatize {
                    lemmatize(word)
                } else {
                    word.to_string()
                }
            })
            .filter(|lemma| !self.is_stop_word(lemma))
            .collect();

        debug!(chars = text.len(), tokens = tokens.len(), "normalized text");
        Ok(tokens)
    }

    /// Unique tokens of `text`, for membership checks.
    pub fn token_set(&self, text: &str) -> Result<HashSet<String>, AnalysisError> {
        Ok(self.normalize(text)?.into_iter().collect())
    }

    /// Token counts of `text`, in order of first occurrence.
    pub fn token_frequencies(&self, text: &str) -> Result<Vec<(String, usize)>, AnalysisError> {
        Ok(count_in_order(self.normalize(text)?))
    }

    fn check_processable(&self, text: &str) -> Result<(), AnalysisError> {
        if text.contains('\0') {
            return Err(AnalysisError::UnprocessableText(
                "text contains NUL bytes".to_string(),
            ));
        }

        let (total, garbage) = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .fold((0usize, 0usize), |(total, garbage), c| {
                let bad = c.is_control() || c == char::REPLACEMENT_CHARACTER;
                (total + 1, garbage + usize::from(bad))
            });

        if total > 0 && garbage as f64 / total as f64 > self.config.max_garbage_ratio {
            return Err(AnalysisError::UnprocessableText(format!(
                "{garbage} of {total} characters are control or replacement characters"
            )));
        }
        Ok(())
    }
}

/// UAX #29 keeps apostrophes inside a word, so "team's" arrives as one word.
/// Splits it into its pieces and drops a trailing clitic, keeping the stem:
/// "team's" → ["team"], "don't" → ["do"], "rock'n'roll" → ["rock", "n", "roll"].
fn split_clitics(word: &str) -> Vec<&str> {
    let mut pieces: Vec<&str> = word.split(|c: char| c == '\'' || c == '\u{2019}').collect();
    if pieces.len() < 2 {
        return pieces;
    }

    let last = pieces[pieces.len() - 1];
    if CLITICS.contains(&last) {
        pieces.pop();
    }
    if last == "t" {
        if let Some(stem) = pieces.pop() {
            let stem = match stem.strip_suffix('n') {
                Some("ca") => "can",
                Some("wo") => "will",
                Some("sha") => "shall",
                Some(negated) => negated,
                None => stem,
            };
            pieces.push(stem);
        }
    }
    pieces
}

/// Decodes raw bytes as UTF-8 text, the only encoding the engine accepts.
pub fn decode_text(bytes: &[u8]) -> Result<&str, AnalysisError> {
    std::str::from_utf8(bytes).map_err(|e| AnalysisError::InvalidEncoding(e.to_string()))
}

/// Counts items while keeping the order in which each was first seen.
pub(crate) fn count_in_order<I>(items: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for item in items {
        match index.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_drops_stop_words_numbers_and_punctuation() {
        let normalizer = Normalizer::english();
        let tokens = normalizer
            .normalize("Looking for a Python developer with 5+ years, Docker and Kubernetes!")
            .unwrap();
        assert_eq!(
            tokens,
            vec!["look", "python", "developer", "year", "docker", "kubernetes"]
        );
    }

    #[test]
    fn test_normalize_keeps_duplicates_in_text_order() {
        let tokens = Normalizer::english()
            .normalize("Rust services. Rust tooling.")
            .unwrap();
        assert_eq!(tokens, vec!["rust", "service", "rust", "tool"]);
    }

    #[test]
    fn test_empty_text_yields_no_tokens() {
        let normalizer = Normalizer::english();
        assert!(normalizer.normalize("").unwrap().is_empty());
        assert!(normalizer.normalize("   \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_only_stop_words_yields_no_tokens() {
        assert!(Normalizer::english()
            .normalize("and the of with")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_nul_bytes_are_rejected() {
        let err = Normalizer::english().normalize("resume\0text").unwrap_err();
        assert!(matches!(err, AnalysisError::UnprocessableText(_)));
    }

    #[test]
    fn test_binary_garbage_is_rejected() {
        let garbage: String = "\u{1}\u{2}\u{3}\u{FFFD}\u{FFFD}ab".to_string();
        let err = Normalizer::english().normalize(&garbage).unwrap_err();
        assert!(matches!(err, AnalysisError::UnprocessableText(_)));
    }

    #[test]
    fn test_lemmatization_can_be_disabled() {
        let normalizer = Normalizer::new(NormalizerConfig {
            lemmatize: false,
            ..NormalizerConfig::english()
        });
        assert_eq!(normalizer.normalize("Built APIs").unwrap(), vec!["built", "apis"]);
    }

    #[test]
    fn test_custom_stop_words_coexist_with_english() {
        let custom = Normalizer::new(NormalizerConfig {
            stop_words: ["python".to_string()].into_iter().collect(),
            ..NormalizerConfig::english()
        });
        let english = Normalizer::english();

        assert_eq!(custom.normalize("the python").unwrap(), vec!["the"]);
        assert_eq!(english.normalize("the python").unwrap(), vec!["python"]);
    }

    #[test]
    fn test_token_frequencies_first_occurrence_order() {
        let freqs = Normalizer::english()
            .token_frequencies("docker python docker sql python docker")
            .unwrap();
        assert_eq!(
            freqs,
            vec![
                ("docker".to_string(), 3),
                ("python".to_string(), 2),
                ("sql".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_possessives_keep_their_stem() {
        let normalizer = Normalizer::english();
        assert_eq!(
            normalizer.normalize("Lead the team's Kubernetes platform").unwrap(),
            vec!["lead", "team", "kubernetes", "platform"]
        );
        assert_eq!(
            normalizer
                .normalize("Experience with Google\u{2019}s cloud and Docker's runtime")
                .unwrap(),
            vec!["experience", "google", "cloud", "docker", "runtime"]
        );
    }

    #[test]
    fn test_contractions_drop_the_clitic() {
        assert_eq!(
            Normalizer::english()
                .normalize("Teams shouldn't ignore Rust's safety")
                .unwrap(),
            vec!["team", "ignore", "rust", "safety"]
        );
        assert_eq!(split_clitics("don't"), vec!["do"]);
        assert_eq!(split_clitics("can\u{2019}t"), vec!["can"]);
        assert_eq!(split_clitics("we're"), vec!["we"]);
        assert_eq!(split_clitics("rock'n'roll"), vec!["rock", "n", "roll"]);
    }

    #[test]
    fn test_decode_text_rejects_invalid_utf8() {
        assert_eq!(decode_text(b"plain text").unwrap(), "plain text");
        let err = decode_text(&[0x66, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidEncoding(_)));
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(text in "\\PC{0,200}") {
            let normalizer = Normalizer::english();
            prop_assert_eq!(normalizer.normalize(&text), normalizer.normalize(&text));
        }

        #[test]
        fn prop_tokens_are_alphabetic_lowercase_non_stop_words(text in "[A-Za-z0-9 ,.'-]{0,200}") {
            let normalizer = Normalizer::english();
            for token in normalizer.normalize(&text).unwrap() {
                prop_assert!(token.chars().all(char::is_alphabetic));
                prop_assert_eq!(token.to_lowercase(), token.clone());
                prop_assert!(!normalizer.is_stop_word(&token));
            }
        }
    }
}
