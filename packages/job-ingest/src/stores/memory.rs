//! In-memory job store for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{JobPredicate, JobStore, SortOrder, UpsertOutcome};
use crate::types::job::Job;

/// In-memory job store keyed by link.
///
/// Not suitable for production as data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs.
    pub fn len(&self) -> usize {
        self.jobs.read().map(|jobs| jobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every stored job, in no particular order.
    pub fn snapshot(&self) -> Vec<Job> {
        self.jobs
            .read()
            .map(|jobs| jobs.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut jobs) = self.jobs.write() {
            jobs.clear();
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Job>>> {
        self.jobs
            .read()
            .map_err(|_| StoreError::unavailable("memory store lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Job>>> {
        self.jobs
            .write()
            .map_err(|_| StoreError::unavailable("memory store lock poisoned"))
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn upsert(&self, job: &Job) -> StoreResult<UpsertOutcome> {
        let previous = self.write()?.insert(job.link.clone(), job.clone());
        Ok(match previous {
            Some(_) => UpsertOutcome::Replaced,
            None => UpsertOutcome::Inserted,
        })
    }

    async fn delete_where(&self, predicate: &JobPredicate) -> StoreResult<usize> {
        let mut jobs = self.write()?;
        let before = jobs.len();
        jobs.retain(|_, job| !predicate.matches(job));
        Ok(before - jobs.len())
    }

    async fn find(
        &self,
        predicate: &JobPredicate,
        sort: SortOrder,
        limit: usize,
    ) -> StoreResult<Vec<Job>> {
        let mut found: Vec<Job> = self
            .read()?
            .values()
            .filter(|job| predicate.matches(job))
            .cloned()
            .collect();

        // link as tie-breaker keeps the order stable between calls
        match sort {
            SortOrder::PostedDateDesc => found.sort_by(|a, b| {
                b.posted_date
                    .cmp(&a.posted_date)
                    .then_with(|| a.link.cmp(&b.link))
            }),
            SortOrder::PostedDateAsc => found.sort_by(|a, b| {
                a.posted_date
                    .cmp(&b.posted_date)
                    .then_with(|| a.link.cmp(&b.link))
            }),
        }
        found.truncate(limit);

        Ok(found)
    }

    async fn count(&self, predicate: &JobPredicate) -> StoreResult<usize> {
        Ok(self
            .read()?
            .values()
            .filter(|job| predicate.matches(job))
            .count())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
