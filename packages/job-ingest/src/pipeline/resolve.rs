//! Identity and deduplication by link.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::store::{JobStore, UpsertOutcome};
use crate::types::job::Job;

/// Resolves jobs to store records by `link`.
///
/// Links compare as exact strings; no case folding, no trailing-slash or
/// query-string canonicalization.
#[derive(Clone)]
pub struct DedupResolver {
    store: Arc<dyn JobStore>,
}

impl DedupResolver {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Insert the job, or overwrite the existing job with the same link.
    ///
    /// Idempotent: applying the same job twice leaves one identical record.
    pub async fn reconcile(&self, job: &Job) -> StoreResult<UpsertOutcome> {
        let outcome = self.store.upsert(job).await?;
        debug!(
            link = %job.link,
            source = %job.source,
            outcome = ?outcome,
            "Reconciled job"
        );
        Ok(outcome)
    }
}

/// Collapse duplicate links within one batch.
///
/// The last occurrence of a link wins and takes the position where that link
/// was first seen.
pub fn dedup_batch(jobs: Vec<Job>) -> Vec<Job> {
    let mut position: HashMap<String, usize> = HashMap::with_capacity(jobs.len());
    let mut unique: Vec<Job> = Vec::with_capacity(jobs.len());

    for job in jobs {
        match position.get(&job.link) {
            Some(&i) => unique[i] = job,
            None => {
                position.insert(job.link.clone(), unique.len());
                unique.push(job);
            }
        }
    }

    unique
}
