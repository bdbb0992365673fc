pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis", post(handlers::handle_analyze))
        .route("/api/v1/analysis/pdf", post(handlers::handle_analyze_pdf))
        .route("/api/v1/analysis/sections", post(handlers::handle_sections))
        .route(
            "/api/v1/analysis/similarity",
            post(handlers::handle_similarity),
        )
        .route("/api/v1/analysis/gaps", post(handlers::handle_gaps))
        .route("/api/v1/analysis/keywords", post(handlers::handle_keywords))
        .route("/api/v1/analysis/contact", post(handlers::handle_contact))
        // Jobs API
        .route("/api/v1/jobs/rank", post(handlers::handle_rank_jobs))
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    const RESUME: &str =
        "Jane Doe\njane@example.com\nSummary\nBuilt APIs using Python.\nSkills\nPython, SQL, Docker";
    const JOB: &str = "Looking for a Python developer with Docker and Kubernetes experience.";

    fn app() -> Router {
        build_router(AppState::new(Config::default()))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analysis_endpoint_returns_full_report() {
        let (status, body) = post_json(
            "/api/v1/analysis",
            json!({ "resume_text": RESUME, "job_text": JOB }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["analysis_id"].is_string());
        assert_eq!(body["sections"][0]["label"], "Summary");
        assert_eq!(body["sections"][1]["label"], "Skills");
        assert_eq!(body["below_threshold"], true);
        let missing: Vec<&str> = body["match_sets"]["missing"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(missing.contains(&"kubernetes"));
        assert!(!missing.contains(&"python"));
    }

    #[tokio::test]
    async fn test_blank_job_text_is_a_validation_error() {
        let (status, body) = post_json(
            "/api/v1/analysis",
            json!({ "resume_text": RESUME, "job_text": "   " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unprocessable_text_is_an_analysis_error() {
        let (status, body) = post_json(
            "/api/v1/analysis/gaps",
            json!({ "resume_text": "resume\u{0}text", "job_text": JOB }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "ANALYSIS_ERROR");
    }

    #[tokio::test]
    async fn test_sections_endpoint() {
        let (status, body) = post_json(
            "/api/v1/analysis/sections",
            json!({ "resume_text": "Summary\nBuilt APIs using Python.\nSkills\nPython, SQL, Docker" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["sections"],
            json!([
                { "label": "Summary", "body": "Built APIs using Python." },
                { "label": "Skills", "body": "Python, SQL, Docker" }
            ])
        );
    }

    #[tokio::test]
    async fn test_similarity_endpoint_handles_empty_text() {
        let (status, body) = post_json(
            "/api/v1/analysis/similarity",
            json!({ "text_a": "", "text_b": JOB }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 0.0);
        assert_eq!(body["percent"], 0.0);
    }

    #[tokio::test]
    async fn test_gaps_endpoint_for_identical_texts() {
        let (status, body) = post_json(
            "/api/v1/analysis/gaps",
            json!({ "resume_text": JOB, "job_text": JOB }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["missing"], json!([]));
        assert!(body["suggestions"]
            .as_str()
            .unwrap()
            .contains("already covers"));
        assert_eq!(body["rendered"]["missing"], "");
    }

    #[tokio::test]
    async fn test_keywords_and_contact_endpoints() {
        let (status, body) = post_json(
            "/api/v1/analysis/keywords",
            json!({ "text": "Python Python Docker", "top_n": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["keywords"], json!(["python"]));

        let (status, body) =
            post_json("/api/v1/analysis/contact", json!({ "resume_text": RESUME })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Jane Doe");
        assert_eq!(body["email"], "jane@example.com");
    }

    #[tokio::test]
    async fn test_rank_jobs_endpoint() {
        let (status, body) = post_json(
            "/api/v1/jobs/rank",
            json!({
                "resume_text": RESUME,
                "min_score": 0.1,
                "jobs": [
                    { "title": "Python Developer", "description": JOB, "location": "Remote" },
                    { "title": "Florist", "description": "Arrange flowers for weddings", "location": "Paris" }
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let jobs = body["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["title"], "Python Developer");
        assert!(jobs[0]["apply_url"]
            .as_str()
            .unwrap()
            .starts_with("https://www.google.com/search?q=Python+Developer"));
    }

    #[tokio::test]
    async fn test_rank_jobs_rejects_out_of_range_min_score() {
        let (status, _) = post_json(
            "/api/v1/jobs/rank",
            json!({ "resume_text": RESUME, "jobs": [], "min_score": 1.5 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pdf_endpoint_rejects_non_pdf_upload() {
        let boundary = "X-BOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"resume\"; filename=\"resume.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             not a pdf\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"job_text\"\r\n\r\n\
             {JOB}\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analysis/pdf")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
