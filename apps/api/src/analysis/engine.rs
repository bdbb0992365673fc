//! Match engine: composes normalizer, segmenter, scorer and gap analyzer into
//! one report per (résumé, job description) pair.
//!
//! Every artifact of a report is computed from the same two `Document`
//! snapshots, so section scores, overall score and gaps never disagree about
//! the text they describe.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::analysis::gaps::{
    self, KeywordGapReport, KeywordMatchSets, DEFAULT_SUGGESTION_LIMIT,
};
use crate::analysis::normalizer::Normalizer;
use crate::analysis::segmenter::{Section, Segmenter, SegmenterConfig};
use crate::analysis::similarity::{self, to_percent};
use crate::config::Config;
use crate::errors::AnalysisError;

pub const DEFAULT_MATCH_THRESHOLD_PERCENT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    Resume,
    JobDescription,
}

/// Immutable text with a logical role. Cloning shares the text.
#[derive(Debug, Clone)]
pub struct Document {
    role: DocumentRole,
    text: Arc<str>,
}

impl Document {
    pub fn resume(text: impl Into<Arc<str>>) -> Self {
        Self {
            role: DocumentRole::Resume,
            text: text.into(),
        }
    }

    pub fn job_description(text: impl Into<Arc<str>>) -> Self {
        Self {
            role: DocumentRole::JobDescription,
            text: text.into(),
        }
    }

    pub fn role(&self) -> DocumentRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub match_threshold_percent: f64,
    pub suggestion_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            match_threshold_percent: DEFAULT_MATCH_THRESHOLD_PERCENT,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            match_threshold_percent: config.match_threshold_percent,
            suggestion_limit: config.suggestion_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub label: String,
    pub body: String,
    pub score: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub sections: Vec<SectionScore>,
    pub overall_score: f64,
    pub overall_percent: f64,
    pub below_threshold: bool,
    pub advisory: Option<String>,
    pub gaps: KeywordGapReport,
    pub suggestions: String,
    pub match_sets: KeywordMatchSets,
}

#[derive(Debug, Clone)]
pub struct MatchEngine {
    normalizer: Normalizer,
    segmenter: Segmenter,
    options: EngineOptions,
}

impl MatchEngine {
    pub fn new(normalizer: Normalizer, segmenter: Segmenter, options: EngineOptions) -> Self {
        Self {
            normalizer,
            segmenter,
            options,
        }
    }

    pub fn english(options: EngineOptions) -> Self {
        Self::new(Normalizer::english(), Segmenter::english(), options)
    }

    /// English engine with the thresholds and repeat policy from `config`.
    pub fn from_config(config: &Config) -> Self {
        let segmenter_config =
            SegmenterConfig::english().with_repeat_policy(config.segment_repeat_policy);
        Self {
            segmenter: Segmenter::new(segmenter_config),
            ..Self::english(EngineOptions::from(config))
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn segment(&self, resume_text: &str) -> Vec<Section> {
        self.segmenter.segment(resume_text)
    }

    pub fn similarity(&self, text_a: &str, text_b: &str) -> f64 {
        similarity::similarity(text_a, text_b)
    }

    pub fn analyze_gaps(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<KeywordGapReport, AnalysisError> {
        gaps::analyze_gaps(&self.normalizer, resume_text, job_text)
    }

    pub fn suggestions(&self, report: &KeywordGapReport) -> String {
        report.suggestions(self.options.suggestion_limit)
    }

    /// Scores each résumé section against the job text. Empty sections score 0.
    pub fn section_scores(&self, resume_text: &str, job_text: &str) -> Vec<SectionScore> {
        self.segment(resume_text)
            .into_iter()
            .map(|Section { label, body }| {
                let score = if body.is_empty() {
                    0.0
                } else {
                    self.similarity(&body, job_text)
                };
                SectionScore {
                    label,
                    body,
                    score,
                    percent: to_percent(score),
                }
            })
            .collect()
    }

    /// Full analysis of one résumé against one job description.
    #[instrument(
        skip_all,
        fields(resume_chars = resume.text().len(), job_chars = job.text().len())
    )]
    pub fn analyze(
        &self,
        resume: &Document,
        job: &Document,
    ) -> Result<AnalysisReport, AnalysisError> {
        debug_assert_eq!(resume.role(), DocumentRole::Resume);
        debug_assert_eq!(job.role(), DocumentRole::JobDescription);

        let (resume_text, job_text) = (resume.text(), job.text());

        let gaps = self.analyze_gaps(resume_text, job_text)?;
        let sections = self.section_scores(resume_text, job_text);
        let overall_score = self.similarity(resume_text, job_text);
        let overall_percent = to_percent(overall_score);

        let below_threshold = overall_percent < self.options.match_threshold_percent;
        let advisory = below_threshold.then(|| {
            format!(
                "The match is below {}%. Consider improving your resume.",
                self.options.match_threshold_percent
            )
        });

        debug!(
            overall_percent,
            sections = sections.len(),
            missing = gaps.missing.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            sections,
            overall_score,
            overall_percent,
            below_threshold,
            advisory,
            suggestions: self.suggestions(&gaps),
            match_sets: gaps.match_sets(),
            gaps,
        })
    }
}
