//! Keyword Gap Analyzer: which job-description vocabulary the résumé already
//! covers, and which it is missing, ranked by how often the job mentions it.
//!
//! The résumé contributes a membership set; the job description contributes a
//! frequency table. Both the ranked report and the plain matched/missing sets
//! are derived from the same two collections so they always agree.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::normalizer::Normalizer;
use crate::errors::AnalysisError;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 20;

pub const FULL_COVERAGE_MESSAGE: &str =
    "Your resume already covers the job description's vocabulary. No missing keywords found.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingKeyword {
    pub keyword: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGapReport {
    /// Job tokens found in the résumé, in job first-occurrence order.
    pub matched: Vec<String>,
    /// Job tokens absent from the résumé, most frequent first; ties keep
    /// first-occurrence order.
    pub missing: Vec<MissingKeyword>,
}

/// Matched and missing vocabulary as two unranked, alphabetically ordered sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatchSets {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
}

impl KeywordMatchSets {
    /// Comma-separated rendering of one set, e.g. for colour-coded display.
    pub fn render(words: &BTreeSet<String>) -> String {
        words.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl KeywordGapReport {
    /// Partitions the job vocabulary by membership in the résumé token set.
    pub fn from_tokens(resume_tokens: &HashSet<String>, job_frequencies: &[(String, usize)]) -> Self {
        let mut matched = Vec::new();
        let mut missing = Vec::new();

        for (token, frequency) in job_frequencies {
            if resume_tokens.contains(token) {
                matched.push(token.clone());
            } else {
                missing.push(MissingKeyword {
                    keyword: token.clone(),
                    frequency: *frequency,
                });
            }
        }

        // sort_by is stable, so equal frequencies keep first-occurrence order.
        missing.sort_by(|a, b| b.frequency.cmp(&a.frequency));

        Self { matched, missing }
    }

    pub fn is_fully_covered(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn match_sets(&self) -> KeywordMatchSets {
        KeywordMatchSets {
            matched: self.matched.iter().cloned().collect(),
            missing: self.missing.iter().map(|m| m.keyword.clone()).collect(),
        }
    }

    /// Markdown list of the top `limit` missing keywords with their counts, or
    /// an explicit full-coverage message when nothing is missing.
    pub fn suggestions(&self, limit: usize) -> String {
        let mut out = String::from("### Ranked Missing Keywords (Most Important First)\n\n");

        if self.is_fully_covered() {
            out.push_str(FULL_COVERAGE_MESSAGE);
            return out;
        }

        for missing in self.missing.iter().take(limit) {
            let times = if missing.frequency == 1 { "time" } else { "times" };
            out.push_str(&format!(
                "- **{}** (mentioned {} {times})\n",
                missing.keyword, missing.frequency
            ));
        }
        out.push_str("\nTry incorporating the above keywords to better align your resume.");
        out
    }
}

pub fn analyze_gaps(
    normalizer: &Normalizer,
    resume_text: &str,
    job_text: &str,
) -> Result<KeywordGapReport, AnalysisError> {
    let resume_tokens = normalizer.token_set(resume_text)?;
    let job_frequencies = normalizer.token_frequencies(job_text)?;
    let report = KeywordGapReport::from_tokens(&resume_tokens, &job_frequencies);
    debug!(
        matched = report.matched.len(),
        missing = report.missing.len(),
        "analyzed keyword gaps"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RESUME: &str = "Summary\nBuilt APIs using Python.\nSkills\nPython, SQL, Docker";
    const JOB: &str = "Looking for a Python developer with Docker and Kubernetes experience.";

    fn keywords(report: &KeywordGapReport) -> Vec<&str> {
        report.missing.iter().map(|m| m.keyword.as_str()).collect()
    }

    #[test]
    fn test_missing_contains_kubernetes_but_not_resume_terms() {
        let report = analyze_gaps(&Normalizer::english(), RESUME, JOB).unwrap();
        let missing = keywords(&report);

        assert!(missing.contains(&"kubernetes"));
        assert!(!missing.contains(&"python"));
        assert!(!missing.contains(&"docker"));
        assert_eq!(report.matched, vec!["python", "docker"]);
    }

    #[test]
    fn test_missing_ranked_by_job_frequency_with_stable_ties() {
        let report = analyze_gaps(
            &Normalizer::english(),
            "python",
            "kafka terraform kafka python grpc terraform kafka",
        )
        .unwrap();
        assert_eq!(
            report.missing,
            vec![
                MissingKeyword { keyword: "kafka".to_string(), frequency: 3 },
                MissingKeyword { keyword: "terraform".to_string(), frequency: 2 },
                MissingKeyword { keyword: "grpc".to_string(), frequency: 1 },
            ]
        );
    }

    #[test]
    fn test_resume_frequency_does_not_matter() {
        let once = analyze_gaps(&Normalizer::english(), "rust", "rust rust rust").unwrap();
        let many = analyze_gaps(&Normalizer::english(), "rust rust rust rust", "rust rust rust").unwrap();
        assert_eq!(once, many);
        assert!(once.is_fully_covered());
    }

    #[test]
    fn test_identical_texts_are_fully_covered() {
        let report = analyze_gaps(&Normalizer::english(), JOB, JOB).unwrap();
        assert!(report.missing.is_empty());
        assert!(report.suggestions(DEFAULT_SUGGESTION_LIMIT).contains(FULL_COVERAGE_MESSAGE));
    }

    #[test]
    fn test_suggestions_list_counts_and_respect_limit() {
        let report = KeywordGapReport {
            matched: vec![],
            missing: vec![
                MissingKeyword { keyword: "kafka".to_string(), frequency: 3 },
                MissingKeyword { keyword: "grpc".to_string(), frequency: 1 },
            ],
        };

        let text = report.suggestions(DEFAULT_SUGGESTION_LIMIT);
        assert!(text.contains("- **kafka** (mentioned 3 times)"));
        assert!(text.contains("- **grpc** (mentioned 1 time)"));
        assert!(text.find("kafka").unwrap() < text.find("grpc").unwrap());

        let limited = report.suggestions(1);
        assert!(limited.contains("kafka"));
        assert!(!limited.contains("grpc"));
    }

    #[test]
    fn test_suggestions_cap_at_twenty_by_default() {
        let missing = (0..25)
            .map(|i| MissingKeyword {
                keyword: format!("term{i}"),
                frequency: 25 - i,
            })
            .collect();
        let text = KeywordGapReport { matched: vec![], missing }.suggestions(DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(text.matches("- **").count(), 20);
    }

    #[test]
    fn test_match_sets_are_sorted_and_rendered() {
        let sets = analyze_gaps(&Normalizer::english(), RESUME, JOB)
            .unwrap()
            .match_sets();
        assert_eq!(KeywordMatchSets::render(&sets.matched), "docker, python");
        assert_eq!(
            KeywordMatchSets::render(&sets.missing),
            "developer, experience, kubernetes, look"
        );
    }

    #[test]
    fn test_possessive_job_terms_are_counted() {
        let report = analyze_gaps(
            &Normalizer::english(),
            "Python developer",
            "Own the company's Terraform infrastructure. Terraform's modules.",
        )
        .unwrap();
        assert_eq!(
            report.missing,
            vec![
                MissingKeyword { keyword: "terraform".to_string(), frequency: 2 },
                MissingKeyword { keyword: "company".to_string(), frequency: 1 },
                MissingKeyword { keyword: "infrastructure".to_string(), frequency: 1 },
                MissingKeyword { keyword: "module".to_string(), frequency: 1 },
            ]
        );
    }

    #[test]
    fn test_tokenizer_failure_propagates() {
        let err = analyze_gaps(&Normalizer::english(), "bad\0resume", JOB).unwrap_err();
        assert!(matches!(err, AnalysisError::UnprocessableText(_)));
    }

    proptest! {
        #[test]
        fn prop_matched_and_missing_partition_job_tokens(
            resume in "[a-z ,.]{0,200}",
            job in "[a-z ,.]{0,200}",
        ) {
            let normalizer = Normalizer::english();
            let report = analyze_gaps(&normalizer, &resume, &job).unwrap();
            let sets = report.match_sets();
            let job_tokens: BTreeSet<String> = normalizer.token_set(&job).unwrap().into_iter().collect();

            prop_assert!(sets.matched.is_disjoint(&sets.missing));
            let union: BTreeSet<String> = sets.matched.union(&sets.missing).cloned().collect();
            prop_assert_eq!(union, job_tokens);
        }

        #[test]
        fn prop_missing_is_sorted_by_descending_frequency(
            resume in "[a-z ]{0,100}",
            job in "[a-z ]{0,300}",
        ) {
            let report = analyze_gaps(&Normalizer::english(), &resume, &job).unwrap();
            for pair in report.missing.windows(2) {
                prop_assert!(pair[0].frequency >= pair[1].frequency);
            }
        }
    }
}
