use std::sync::Arc;

use crate::analysis::cache::AnalysisCache;
use crate::analysis::engine::MatchEngine;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Immutable engine: normalizer and segmenter configuration are fixed at startup.
    pub engine: Arc<MatchEngine>,
    /// Full-analysis results keyed by a fingerprint of the (resume, job) pair.
    pub cache: Arc<AnalysisCache>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let engine = MatchEngine::from_config(&config);
        let cache = AnalysisCache::new(config.cache_capacity);
        Self {
            config,
            engine: Arc::new(engine),
            cache: Arc::new(cache),
        }
    }
}
