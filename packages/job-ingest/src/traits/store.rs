//! Job store capability.
//!
//! The store offers upsert by `link`, delete by predicate and an indexed
//! range query. Each call is atomic on its own; the pipeline never relies on
//! multi-call transactions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::error::StoreResult;
use crate::types::job::Job;

/// Filter over stored jobs. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPredicate {
    pub link: Option<String>,
    pub source: Option<String>,
    pub company: Option<String>,
    /// Matches jobs with `posted_date` strictly before this instant.
    pub posted_before: Option<DateTime<Utc>>,
    /// Matches jobs whose link is not in this set.
    pub link_not_in: Option<HashSet<String>>,
}

impl JobPredicate {
    /// Match every job.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_link(link: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            ..Default::default()
        }
    }

    pub fn for_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Default::default()
        }
    }

    pub fn for_company(company: impl Into<String>) -> Self {
        Self {
            company: Some(company.into()),
            ..Default::default()
        }
    }

    pub fn posted_before(cutoff: DateTime<Utc>) -> Self {
        Self {
            posted_before: Some(cutoff),
            ..Default::default()
        }
    }

    /// Narrow to jobs whose link is not in `links`.
    pub fn excluding_links(mut self, links: HashSet<String>) -> Self {
        self.link_not_in = Some(links);
        self
    }

    /// Whether `job` satisfies every set field.
    pub fn matches(&self, job: &Job) -> bool {
        self.link.as_ref().map_or(true, |l| &job.link == l)
            && self.source.as_ref().map_or(true, |s| &job.source == s)
            && self.company.as_ref().map_or(true, |c| &job.company == c)
            && self.posted_before.map_or(true, |t| job.posted_date < t)
            && self
                .link_not_in
                .as_ref()
                .map_or(true, |links| !links.contains(&job.link))
    }
}

/// Result ordering for `find`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest `posted_date` first.
    #[default]
    PostedDateDesc,
    PostedDateAsc,
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// Persistence for canonical jobs, unique by `link`.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert the job, or overwrite every field of the job with the same link.
    async fn upsert(&self, job: &Job) -> StoreResult<UpsertOutcome>;

    /// Delete every job matching the predicate; returns how many went.
    async fn delete_where(&self, predicate: &JobPredicate) -> StoreResult<usize>;

    /// Jobs matching the predicate, sorted by `posted_date`, at most `limit`.
    async fn find(
        &self,
        predicate: &JobPredicate,
        sort: SortOrder,
        limit: usize,
    ) -> StoreResult<Vec<Job>>;

    /// Number of jobs matching the predicate.
    async fn count(&self, predicate: &JobPredicate) -> StoreResult<usize>;

    /// Look up one job by its link.
    async fn get(&self, link: &str) -> StoreResult<Option<Job>> {
        let mut found = self
            .find(&JobPredicate::for_link(link), SortOrder::default(), 1)
            .await?;
        Ok(found.pop())
    }

    /// Check that the store is reachable.
    async fn ping(&self) -> StoreResult<()> {
        self.count(&JobPredicate::for_link("")).await.map(|_| ())
    }

    /// Store name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
