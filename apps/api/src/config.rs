use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::analysis::segmenter::RepeatPolicy;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Overall match percentage below which the report carries an advisory.
    pub match_threshold_percent: f64,
    /// How many ranked missing keywords the suggestion text lists.
    pub suggestion_limit: usize,
    /// Minimum similarity (0..1) a job posting needs to appear in a ranking.
    pub job_min_score: f64,
    pub desired_locations: Vec<String>,
    /// What the segmenter does with a heading seen a second time.
    pub segment_repeat_policy: RepeatPolicy,
    pub cache_capacity: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            match_threshold_percent: parse_env("MATCH_THRESHOLD_PERCENT", 70.0)?,
            suggestion_limit: parse_env("SUGGESTION_LIMIT", 20)?,
            job_min_score: parse_env("JOB_MIN_SCORE", 0.2)?,
            desired_locations: std::env::var("DESIRED_LOCATIONS")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
            segment_repeat_policy: match std::env::var("SEGMENT_REPEAT_POLICY") {
                Ok(raw) => parse_repeat_policy(&raw)?,
                Err(_) => RepeatPolicy::default(),
            },
            cache_capacity: parse_env("CACHE_CAPACITY", 256)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            match_threshold_percent: 70.0,
            suggestion_limit: 20,
            job_min_score: 0.2,
            desired_locations: Vec::new(),
            segment_repeat_policy: RepeatPolicy::default(),
            cache_capacity: 256,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_repeat_policy(raw: &str) -> Result<RepeatPolicy> {
    match raw.trim().to_lowercase().as_str() {
        "append" => Ok(RepeatPolicy::Append),
        "reset" => Ok(RepeatPolicy::Reset),
        other => bail!("SEGMENT_REPEAT_POLICY must be 'append' or 'reset', got '{other}'"),
    }
}
