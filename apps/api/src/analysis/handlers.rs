//! Axum route handlers for the Analysis and Jobs APIs.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::contact::{extract_contact, ContactInfo};
use crate::analysis::engine::{AnalysisReport, Document};
use crate::analysis::gaps::{KeywordGapReport, KeywordMatchSets};
use crate::analysis::jobs::{rank_jobs, JobPosting, RankOptions, RankedJob};
use crate::analysis::keywords::{top_keywords, DEFAULT_TOP_KEYWORDS};
use crate::analysis::normalizer::decode_text;
use crate::analysis::segmenter::Section;
use crate::analysis::similarity::to_percent;
use crate::errors::AppError;
use crate::extract::extract_pdf_text;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

#[derive(Debug, Deserialize)]
pub struct SectionsRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct SectionsResponse {
    pub sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarityRequest {
    pub text_a: String,
    pub text_b: String,
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub score: f64,
    pub percent: f64,
}

#[derive(Debug, Serialize)]
pub struct GapsResponse {
    pub report: KeywordGapReport,
    pub suggestions: String,
    pub match_sets: KeywordMatchSets,
    /// Comma-separated renderings of `match_sets`, keyed "matched" / "missing".
    pub rendered: BTreeMap<&'static str, String>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    pub text: String,
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct RankJobsRequest {
    pub resume_text: String,
    pub jobs: Vec<JobPosting>,
    pub min_score: Option<f64>,
    pub desired_locations: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RankJobsResponse {
    /// Search terms auto-detected from the résumé.
    pub keywords: Vec<String>,
    pub jobs: Vec<RankedJob>,
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

async fn run_analysis(
    state: &AppState,
    resume_text: String,
    job_text: String,
) -> Result<AnalysisResponse, AppError> {
    let resume = Document::resume(resume_text);
    let job = Document::job_description(job_text);

    let report = state
        .cache
        .get_or_compute(resume.text(), job.text(), || state.engine.analyze(&resume, &job))
        .await?;

    let response = AnalysisResponse {
        analysis_id: Uuid::new_v4(),
        analyzed_at: Utc::now(),
        report: (*report).clone(),
    };
    info!(
        analysis_id = %response.analysis_id,
        overall_percent = response.report.overall_percent,
        missing = response.report.gaps.missing.len(),
        "analysis served"
    );
    Ok(response)
}

/// POST /api/v1/analysis
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    require_text("resume_text", &req.resume_text)?;
    require_text("job_text", &req.job_text)?;
    Ok(Json(run_analysis(&state, req.resume_text, req.job_text).await?))
}

/// POST /api/v1/analysis/pdf
/// Multipart fields: `resume` (PDF file) and `job_text`.
pub async fn handle_analyze_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut resume_pdf: Option<Bytes> = None;
    let mut job_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("resume") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                resume_pdf = Some(data);
            }
            Some("job_text") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read job_text: {e}")))?;
                job_text = Some(decode_text(&data)?.to_string());
            }
            _ => {}
        }
    }

    let resume_pdf =
        resume_pdf.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let job_text = job_text.unwrap_or_default();
    require_text("job_text", &job_text)?;

    info!(bytes = resume_pdf.len(), "extracting resume PDF");
    // PDF parsing is CPU-bound; keep it off the async executor.
    let resume_text = tokio::task::spawn_blocking(move || extract_pdf_text(&resume_pdf))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
        })??;

    Ok(Json(run_analysis(&state, resume_text, job_text).await?))
}

/// POST /api/v1/analysis/sections
pub async fn handle_sections(
    State(state): State<AppState>,
    Json(req): Json<SectionsRequest>,
) -> Json<SectionsResponse> {
    Json(SectionsResponse {
        sections: state.engine.segment(&req.resume_text),
    })
}

/// POST /api/v1/analysis/similarity
pub async fn handle_similarity(
    State(state): State<AppState>,
    Json(req): Json<SimilarityRequest>,
) -> Json<SimilarityResponse> {
    let score = state.engine.similarity(&req.text_a, &req.text_b);
    Json(SimilarityResponse {
        score,
        percent: to_percent(score),
    })
}

/// POST /api/v1/analysis/gaps
pub async fn handle_gaps(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<GapsResponse>, AppError> {
    require_text("resume_text", &req.resume_text)?;
    require_text("job_text", &req.job_text)?;

    let report = state.engine.analyze_gaps(&req.resume_text, &req.job_text)?;
    let match_sets = report.match_sets();
    let rendered = BTreeMap::from([
        ("matched", KeywordMatchSets::render(&match_sets.matched)),
        ("missing", KeywordMatchSets::render(&match_sets.missing)),
    ]);

    info!(missing = report.missing.len(), "gap analysis served");
    Ok(Json(GapsResponse {
        suggestions: state.engine.suggestions(&report),
        report,
        match_sets,
        rendered,
    }))
}

/// POST /api/v1/analysis/keywords
pub async fn handle_keywords(
    State(state): State<AppState>,
    Json(req): Json<KeywordsRequest>,
) -> Result<Json<KeywordsResponse>, AppError> {
    require_text("text", &req.text)?;
    let top_n = req.top_n.unwrap_or(DEFAULT_TOP_KEYWORDS);
    Ok(Json(KeywordsResponse {
        keywords: top_keywords(state.engine.normalizer(), &req.text, top_n),
    }))
}

/// POST /api/v1/analysis/contact
pub async fn handle_contact(Json(req): Json<ContactRequest>) -> Result<Json<ContactInfo>, AppError> {
    require_text("resume_text", &req.resume_text)?;
    Ok(Json(extract_contact(&req.resume_text)))
}

/// POST /api/v1/jobs/rank
pub async fn handle_rank_jobs(
    State(state): State<AppState>,
    Json(req): Json<RankJobsRequest>,
) -> Result<Json<RankJobsResponse>, AppError> {
    require_text("resume_text", &req.resume_text)?;

    let mut options = RankOptions::from(&state.config);
    if let Some(min_score) = req.min_score {
        if !(0.0..=1.0).contains(&min_score) {
            return Err(AppError::Validation(
                "min_score must be between 0 and 1".to_string(),
            ));
        }
        options.min_score = min_score;
    }
    if let Some(locations) = req.desired_locations {
        options.desired_locations = locations;
    }

    let posted = req.jobs.len();
    let keywords = top_keywords(state.engine.normalizer(), &req.resume_text, DEFAULT_TOP_KEYWORDS);
    let jobs = rank_jobs(&req.resume_text, req.jobs, &options, Utc::now());

    info!(posted, ranked = jobs.len(), "job ranking served");
    Ok(Json(RankJobsResponse { keywords, jobs }))
}
