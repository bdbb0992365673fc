//! Similarity Scorer: TF-IDF vectors over a two-document corpus, compared by cosine.
//!
//! The corpus is exactly the pair being compared, so IDF only separates terms
//! shared by both texts (df = 2) from terms unique to one (df = 1). Scores are a
//! relative pairwise signal, not calibrated against any external text statistics.
//!
//! Vectorization:
//! - lower-case, terms are runs of two or more word characters
//! - TF = raw count
//! - IDF = ln((1 + n) / (1 + df)) + 1, with n = 2
//! - vectors are L2-normalized; cosine is clamped to [0, 1]

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

const CORPUS_SIZE: f64 = 2.0;

fn term_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("term pattern is a valid regex"))
}

/// Raw term counts of one document, ordered by term for deterministic summation.
fn term_counts(text: &str) -> BTreeMap<String, f64> {
    let lowered = text.to_lowercase();
    let mut counts = BTreeMap::new();
    for term in term_pattern().find_iter(&lowered) {
        *counts.entry(term.as_str().to_string()).or_insert(0.0) += 1.0;
    }
    counts
}

fn idf(document_frequency: f64) -> f64 {
    ((1.0 + CORPUS_SIZE) / (1.0 + document_frequency)).ln() + 1.0
}

/// TF-IDF weights of both documents over their joint vocabulary.
fn tfidf_pair(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> (Vec<f64>, Vec<f64>) {
    let mut vocabulary: Vec<&String> = a.keys().chain(b.keys()).collect();
    vocabulary.sort();
    vocabulary.dedup();

    vocabulary
        .into_iter()
        .map(|term| {
            let tf_a = a.get(term).copied().unwrap_or(0.0);
            let tf_b = b.get(term).copied().unwrap_or(0.0);
            let df = f64::from(u8::from(tf_a > 0.0) + u8::from(tf_b > 0.0));
            let weight = idf(df);
            (tf_a * weight, tf_b * weight)
        })
        .unzip()
}

fn norm(vector: &[f64]) -> f64 {
    vector.iter().map(|w| w * w).sum::<f64>().sqrt()
}

/// Lexical similarity of two texts in [0, 1].
///
/// Empty or whitespace-only input, or input without any term of two or more
/// word characters, scores 0.0. Self-similarity is therefore 1.0 only for text
/// holding at least one such term: `similarity("a", "a")` is 0.0.
pub fn similarity(text_a: &str, text_b: &str) -> f64 {
    if text_a.trim().is_empty() || text_b.trim().is_empty() {
        return 0.0;
    }

    let counts_a = term_counts(text_a);
    let counts_b = term_counts(text_b);
    let (vec_a, vec_b) = tfidf_pair(&counts_a, &counts_b);

    let (norm_a, norm_b) = (norm(&vec_a), norm(&vec_b));
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let dot: f64 = vec_a.iter().zip(&vec_b).map(|(x, y)| x * y).sum();
    let score = (dot / (norm_a * norm_b)).clamp(0.0, 1.0);
    debug!(
        terms_a = counts_a.len(),
        terms_b = counts_b.len(),
        score,
        "computed similarity"
    );
    score
}

/// Score as a percentage rounded to two decimals (`0.73456` → `73.46`).
pub fn to_percent(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}
