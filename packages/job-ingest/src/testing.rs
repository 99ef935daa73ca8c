//! Testing utilities including mock implementations.
//!
//! Useful for testing code that drives the pipeline without making real
//! network calls or needing a database.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Notify;

use crate::error::{FetchError, FetchResult, StoreError, StoreResult};
use crate::traits::{
    adapter::SourceAdapter,
    fetcher::{HttpFetcher, PageRenderer, RenderRequest},
    store::{JobPredicate, JobStore, SortOrder, UpsertOutcome},
};
use crate::types::{job::Job, raw::RawRecord, source::SourceDescriptor};

/// How a [`MockAdapter`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Status(u16),
    Timeout,
    Decode,
}

/// A source adapter that returns preset records.
///
/// Records can be swapped between runs to simulate a source changing its
/// listings. A gate makes `fetch_raw` block until released, for testing
/// concurrent runs.
pub struct MockAdapter {
    descriptor: SourceDescriptor,
    records: RwLock<Vec<RawRecord>>,
    failure: RwLock<Option<MockFailure>>,
    delay: Option<Duration>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl MockAdapter {
    /// Adapter for `tag`, labelling jobs with `company`, with no records.
    pub fn new(tag: impl Into<String>, company: impl Into<String>) -> Self {
        let tag = tag.into();
        let base_url = url::Url::parse(&format!("https://{}.example.com", tag))
            .unwrap_or_else(|_| url::Url::parse("https://jobs.example.com").unwrap());

        Self {
            descriptor: SourceDescriptor::new(tag, company, base_url),
            records: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
            delay: None,
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_records(self, records: Vec<RawRecord>) -> Self {
        self.set_records(records);
        self
    }

    pub fn failing(self, failure: MockFailure) -> Self {
        *self.failure.write().unwrap() = Some(failure);
        self
    }

    /// Sleep this long inside every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Block every fetch until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_records(&self, records: Vec<RawRecord>) {
        *self.records.write().unwrap() = records;
    }

    pub fn set_failure(&self, failure: Option<MockFailure>) {
        *self.failure.write().unwrap() = failure;
    }

    /// Number of fetches started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for MockAdapter {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    async fn fetch_raw(&self) -> FetchResult<Vec<RawRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let url = self.descriptor.base_url.to_string();
        let failure = *self.failure.read().unwrap();
        match failure {
            Some(MockFailure::Status(status)) => Err(FetchError::Status { url, status }),
            Some(MockFailure::Timeout) => Err(FetchError::Timeout { url }),
            Some(MockFailure::Decode) => Err(FetchError::Decode {
                url,
                reason: "mock decode failure".to_string(),
            }),
            None => Ok(self.records.read().unwrap().clone()),
        }
    }
}

/// An HTTP fetcher serving canned JSON by URL.
///
/// Unknown URLs answer with a 404 status error.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    responses: Arc<RwLock<HashMap<String, Value>>>,
    requested: Arc<RwLock<Vec<String>>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, url: impl Into<String>, body: Value) -> Self {
        self.responses.write().unwrap().insert(url.into(), body);
        self
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.read().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetcher for StaticFetcher {
    async fn get_json(&self, url: &str) -> FetchResult<Value> {
        self.requested.write().unwrap().push(url.to_string());
        self.responses
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// A page renderer returning the same HTML for every request.
#[derive(Clone)]
pub struct StaticRenderer {
    html: Arc<String>,
    requests: Arc<RwLock<Vec<RenderRequest>>>,
}

impl StaticRenderer {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: Arc::new(html.into()),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<RenderRequest> {
        self.requests.read().unwrap().clone()
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn render(&self, request: &RenderRequest) -> FetchResult<String> {
        self.requests.write().unwrap().push(request.clone());
        Ok(self.html.as_ref().clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// A job store whose every operation fails as unavailable.
#[derive(Default)]
pub struct FailingStore;

impl FailingStore {
    fn fail<T>() -> StoreResult<T> {
        Err(StoreError::unavailable("connection refused"))
    }
}

#[async_trait]
impl JobStore for FailingStore {
    async fn upsert(&self, _job: &Job) -> StoreResult<UpsertOutcome> {
        Self::fail()
    }

    async fn delete_where(&self, _predicate: &JobPredicate) -> StoreResult<usize> {
        Self::fail()
    }

    async fn find(
        &self,
        _predicate: &JobPredicate,
        _sort: SortOrder,
        _limit: usize,
    ) -> StoreResult<Vec<Job>> {
        Self::fail()
    }

    async fn count(&self, _predicate: &JobPredicate) -> StoreResult<usize> {
        Self::fail()
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Fixed "now" for deterministic tests: 2025-06-01 12:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// A job from `source`, labelled with the source tag as company, posted on
/// 2025-01-01.
pub fn job(link: &str, source: &str) -> Job {
    job_posted(link, source, 1)
}

/// Like [`job`], posted on day `day` of January 2025.
pub fn job_posted(link: &str, source: &str, day: u32) -> Job {
    Job {
        job_id: format!("{}-{}", source, day),
        title: "Engineer".to_string(),
        company: source.to_string(),
        location: "Remote".to_string(),
        link: link.to_string(),
        description: None,
        posted_date: Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap(),
        source: source.to_string(),
    }
}

