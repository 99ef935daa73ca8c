//! Per-source refresh.
//!
//! A run walks `Fetching → Normalizing → Staging → Committing → Done`. Any
//! failure before `Committing` leaves the store untouched. The commit upserts
//! the new snapshot first and only then deletes the source's stale rows, so
//! an interrupted commit can leave stale rows behind but never loses the
//! previous snapshot.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::normalize::Normalizer;
use super::resolve::{dedup_batch, DedupResolver};
use crate::error::{ErrorKind, FetchError, ReconcileError};
use crate::registry::SourceRegistry;
use crate::traits::{
    adapter::SourceAdapter,
    store::{JobPredicate, JobStore, UpsertOutcome},
};
use crate::types::job::Job;

/// Stage of a reconciler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Fetching,
    Normalizing,
    Staging,
    Committing,
    Done,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Upper bound on one adapter fetch. Exceeding it counts as a failed fetch.
    pub fetch_timeout: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(90),
        }
    }
}

/// A completed refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshSummary {
    pub source: String,
    /// Jobs in the committed snapshot.
    pub jobs_added: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub removed_stale: usize,
    pub dropped: usize,
    pub sample_job: Option<Job>,
}

/// A refresh that ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshFailure {
    pub source: String,
    pub kind: ErrorKind,
    /// Stage the run failed in; unset when the run never started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<RunState>,
    pub error: String,
}

/// Outcome of one refresh, serialized as `{"status": "success", ...}` or
/// `{"status": "error", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconcileReport {
    Success(RefreshSummary),
    Error(RefreshFailure),
}

impl ReconcileReport {
    fn failed(source: &str, stage: Option<RunState>, err: &ReconcileError) -> Self {
        ReconcileReport::Error(RefreshFailure {
            source: source.to_string(),
            kind: err.kind(),
            stage,
            error: err.to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReconcileReport::Success(_))
    }

    pub fn source(&self) -> &str {
        match self {
            ReconcileReport::Success(s) => &s.source,
            ReconcileReport::Error(f) => &f.source,
        }
    }

    /// Failure classification, `None` on success.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ReconcileReport::Success(_) => None,
            ReconcileReport::Error(f) => Some(f.kind),
        }
    }
}

/// Keeps each source's snapshot in the store current.
///
/// At most one run per source is active at a time; a second concurrent run
/// for the same source is rejected with `AlreadyRunning`. Runs for different
/// sources proceed in parallel.
pub struct Reconciler {
    store: Arc<dyn JobStore>,
    resolver: DedupResolver,
    config: ReconcilerConfig,
    /// Tags with a run in flight. Only touched synchronously.
    active: Mutex<HashSet<String>>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self::with_config(store, ReconcilerConfig::default())
    }

    pub fn with_config(store: Arc<dyn JobStore>, config: ReconcilerConfig) -> Self {
        Self {
            resolver: DedupResolver::new(store.clone()),
            store,
            config,
            active: Mutex::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Refresh one source.
    pub async fn run(&self, adapter: &dyn SourceAdapter) -> ReconcileReport {
        self.run_at(adapter, Utc::now()).await
    }

    /// Refresh one source with `now` as the ingestion time.
    #[instrument(skip(self, adapter), fields(source = %adapter.tag()))]
    pub async fn run_at(&self, adapter: &dyn SourceAdapter, now: DateTime<Utc>) -> ReconcileReport {
        let tag = adapter.tag();

        let _guard = match self.claim(tag) {
            Some(guard) => guard,
            None => {
                let err = ReconcileError::AlreadyRunning {
                    source_tag: tag.to_string(),
                };
                warn!(source = %tag, "Refresh rejected: already running");
                return ReconcileReport::failed(tag, None, &err);
            }
        };

        let mut state = RunState::Fetching;
        match self.execute(adapter, now, &mut state).await {
            Ok(summary) => {
                info!(
                    source = %tag,
                    jobs = summary.jobs_added,
                    inserted = summary.inserted,
                    replaced = summary.replaced,
                    removed_stale = summary.removed_stale,
                    dropped = summary.dropped,
                    "Refresh complete"
                );
                ReconcileReport::Success(summary)
            }
            Err(err) => {
                warn!(
                    source = %tag,
                    stage = ?state,
                    kind = ?err.kind(),
                    error = %err,
                    "Refresh failed"
                );
                ReconcileReport::failed(tag, Some(state), &err)
            }
        }
    }

    /// Refresh the registered source with `tag`.
    pub async fn run_source(&self, registry: &SourceRegistry, tag: &str) -> ReconcileReport {
        match registry.get(tag) {
            Some(adapter) => self.run(adapter.as_ref()).await,
            None => {
                let err = ReconcileError::UnknownSource(tag.to_string());
                warn!(source = %tag, "Refresh requested for unknown source");
                ReconcileReport::failed(tag, None, &err)
            }
        }
    }

    /// Refresh every registered source concurrently, reports sorted by tag.
    pub async fn run_all(&self, registry: &SourceRegistry) -> Vec<ReconcileReport> {
        let tags = registry.tags();
        info!(sources = tags.len(), "Refreshing all sources");

        join_all(tags.iter().map(|tag| self.run_source(registry, tag))).await
    }

    async fn execute(
        &self,
        adapter: &dyn SourceAdapter,
        now: DateTime<Utc>,
        state: &mut RunState,
    ) -> Result<RefreshSummary, ReconcileError> {
        let descriptor = adapter.descriptor();
        let tag = descriptor.tag.as_str();

        debug!(source = %tag, "Fetching");
        let raw = tokio::time::timeout(self.config.fetch_timeout, adapter.fetch_raw())
            .await
            .map_err(|_| FetchError::Timeout {
                url: descriptor.base_url.to_string(),
            })??;

        *state = RunState::Normalizing;
        debug!(source = %tag, records = raw.len(), "Normalizing");
        let batch = Normalizer::new(descriptor).normalize_batch(&raw, now);
        let dropped = batch.dropped.len();

        *state = RunState::Staging;
        if batch.jobs.is_empty() {
            return Err(ReconcileError::EmptyResult { dropped });
        }
        let staged = dedup_batch(batch.jobs);
        debug!(source = %tag, staged = staged.len(), dropped, "Staged snapshot");

        *state = RunState::Committing;
        let (mut inserted, mut replaced) = (0, 0);
        for job in &staged {
            match self.resolver.reconcile(job).await? {
                UpsertOutcome::Inserted => inserted += 1,
                UpsertOutcome::Replaced => replaced += 1,
            }
        }

        let keep: HashSet<String> = staged.iter().map(|job| job.link.clone()).collect();
        let removed_stale = self
            .store
            .delete_where(&JobPredicate::for_source(tag).excluding_links(keep))
            .await?;

        *state = RunState::Done;
        Ok(RefreshSummary {
            source: tag.to_string(),
            jobs_added: staged.len(),
            inserted,
            replaced,
            removed_stale,
            dropped,
            sample_job: staged.into_iter().next(),
        })
    }

    /// Whether a run for `tag` is in flight.
    pub fn is_running(&self, tag: &str) -> bool {
        self.active_set().contains(tag)
    }

    fn claim(&self, tag: &str) -> Option<RunGuard<'_>> {
        if !self.active_set().insert(tag.to_string()) {
            return None;
        }
        Some(RunGuard {
            reconciler: self,
            tag: tag.to_string(),
        })
    }

    fn active_set(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Marks a source as running until dropped, including when the run's future
/// is cancelled mid-flight.
struct RunGuard<'a> {
    reconciler: &'a Reconciler,
    tag: String,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.reconciler.active_set().remove(&self.tag);
    }
}
