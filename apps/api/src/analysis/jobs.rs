//! Job ranking: scores job postings against a résumé and orders them by fit.
//!
//! Postings come from external job boards; fetching them is the caller's job.
//! This module only filters, scores and labels them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::similarity::{similarity, to_percent};
use crate::config::Config;

pub const DEFAULT_MIN_SCORE: f64 = 0.2;

const SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Unreserved characters stay literal; spaces pass through and become `+`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub redirect_url: String,
    #[serde(default)]
    pub source: String,
    /// Publication timestamp as reported by the job board, any common format.
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct RankOptions {
    pub min_score: f64,
    pub desired_locations: Vec<String>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            desired_locations: Vec::new(),
        }
    }
}

impl From<&Config> for RankOptions {
    fn from(config: &Config) -> Self {
        Self {
            min_score: config.job_min_score,
            desired_locations: config.desired_locations.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJob {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub score: f64,
    pub score_percent: f64,
    pub apply_url: String,
    pub posted: Option<String>,
}

/// Keeps postings whose location mentions any desired location. Falls back to
/// every posting when no locations are configured or none match.
pub fn filter_by_location(postings: Vec<JobPosting>, desired: &[String]) -> Vec<JobPosting> {
    if desired.is_empty() {
        return postings;
    }
    let desired: Vec<String> = desired.iter().map(|d| d.to_lowercase()).collect();
    let matching: Vec<JobPosting> = postings
        .iter()
        .filter(|posting| {
            let location = posting.location.to_lowercase();
            desired.iter().any(|d| location.contains(d.as_str()))
        })
        .cloned()
        .collect();

    if matching.is_empty() {
        postings
    } else {
        matching
    }
}

/// Scores postings against the résumé, best first, dropping those below
/// `options.min_score`. Equal scores keep input order.
pub fn rank_jobs(
    resume_text: &str,
    postings: Vec<JobPosting>,
    options: &RankOptions,
    now: DateTime<Utc>,
) -> Vec<RankedJob> {
    let total = postings.len();
    let candidates = filter_by_location(postings, &options.desired_locations);
    let considered = candidates.len();

    let mut scored: Vec<(JobPosting, f64)> = candidates
        .into_iter()
        .map(|posting| {
            let score = similarity(resume_text, &posting.description);
            (posting, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let ranked: Vec<RankedJob> = scored
        .into_iter()
        .filter(|(_, score)| *score >= options.min_score)
        .map(|(posting, score)| RankedJob {
            apply_url: apply_url(&posting),
            posted: posting_age_label(&posting.created, now),
            score,
            score_percent: to_percent(score),
            posting,
        })
        .collect();

    debug!(total, considered, ranked = ranked.len(), "ranked job postings");
    ranked
}

/// The posting's own URL, or a web search for "<title> job" when it has none.
pub fn apply_url(posting: &JobPosting) -> String {
    if !posting.redirect_url.trim().is_empty() {
        return posting.redirect_url.clone();
    }
    format!("{SEARCH_URL}{}+job", encode_query(&posting.title))
}

fn encode_query(text: &str) -> String {
    utf8_percent_encode(text, QUERY_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
}

/// Parses the timestamp formats job boards commonly emit. Naive times are UTC.
pub fn parse_posting_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Human posting age ("Posted: Today", "Posted: 2 weeks ago"), or `None`
/// when the timestamp cannot be parsed. Future dates count as today.
pub fn posting_age_label(created: &str, now: DateTime<Utc>) -> Option<String> {
    let posted = parse_posting_date(created)?;
    let days = (now - posted).num_days().max(0);

    let label = match days {
        0 => "Posted: Today".to_string(),
        1 => "Posted: Yesterday".to_string(),
        2..=6 => format!("Posted: {days} days ago"),
        7..=29 => plural_ago(days / 7, "week"),
        _ => plural_ago(days / 30, "month"),
    };
    Some(label)
}

fn plural_ago(count: i64, unit: &str) -> String {
    let suffix = if count > 1 { "s" } else { "" };
    format!("Posted: {count} {unit}{suffix} ago")
}
