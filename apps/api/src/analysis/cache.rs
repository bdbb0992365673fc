//! Analysis cache keyed by a content fingerprint of the (résumé, job) pair.
//!
//! Each fingerprint owns a `OnceCell`, so concurrent requests for the same pair
//! await a single computation. Capacity is bounded; the oldest fingerprint is
//! evicted first, once a new report has been stored. A failed computation
//! removes its entry, so it neither holds a capacity slot nor blocks a later
//! retry.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::analysis::engine::AnalysisReport;
use crate::errors::AnalysisError;

/// Hex SHA-256 of the pair. The résumé is length-prefixed so the boundary
/// between the two texts is part of the digest.
pub type Fingerprint = String;

pub fn fingerprint(resume_text: &str, job_text: &str) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update((resume_text.len() as u64).to_le_bytes());
    hasher.update(resume_text.as_bytes());
    hasher.update(job_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

type Cell = Arc<OnceCell<Arc<AnalysisReport>>>;

#[derive(Default)]
struct Entries {
    cells: HashMap<Fingerprint, Cell>,
    order: VecDeque<Fingerprint>,
}

pub struct AnalysisCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl AnalysisCache {
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.cells.len()
    }

    /// Returns the cached report for this pair, computing it at most once.
    pub async fn get_or_compute<F>(
        &self,
        resume_text: &str,
        job_text: &str,
        compute: F,
    ) -> Result<Arc<AnalysisReport>, AnalysisError>
    where
        F: FnOnce() -> Result<AnalysisReport, AnalysisError>,
    {
        if self.capacity == 0 {
            return compute().map(Arc::new);
        }

        let key = fingerprint(resume_text, job_text);
        let cell = self.cell_for(&key).await;

        let mut computed = false;
        let result = cell
            .get_or_try_init(|| async {
                computed = true;
                compute().map(Arc::new)
            })
            .await
            .map(Arc::clone);

        match result {
            Ok(report) => {
                if computed {
                    self.trim_to_capacity().await;
                }
                let cached = self.len().await;
                debug!(fingerprint = %key, cache_hit = !computed, cached, "analysis cache lookup");
                Ok(report)
            }
            Err(err) => {
                self.evict_failed(&key, &cell).await;
                Err(err)
            }
        }
    }

    async fn cell_for(&self, key: &str) -> Cell {
        let mut entries = self.entries.lock().await;
        if let Some(cell) = entries.cells.get(key) {
            return Arc::clone(cell);
        }

        let cell: Cell = Arc::new(OnceCell::new());
        entries.cells.insert(key.to_string(), Arc::clone(&cell));
        entries.order.push_back(key.to_string());
        cell
    }

    /// Evicts the oldest fingerprints until the cache is back within capacity.
    async fn trim_to_capacity(&self) {
        let mut entries = self.entries.lock().await;
        while entries.order.len() > self.capacity {
            match entries.order.pop_front() {
                Some(oldest) => {
                    entries.cells.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Drops the entry for `key` if it is still `cell` and still empty. A
    /// concurrent caller may already have filled it or replaced it.
    async fn evict_failed(&self, key: &str, cell: &Cell) {
        let mut entries = self.entries.lock().await;
        let is_same_empty_cell = entries
            .cells
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, cell) && !current.initialized());
        if is_same_empty_cell {
            entries.cells.remove(key);
            entries.order.retain(|existing| existing != key);
        }
    }
}
