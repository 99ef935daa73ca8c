//! # Job Ingest
//!
//! Keeps a store of job postings in sync with a set of external sources.
//!
//! Each source is served by a [`SourceAdapter`] that fetches its current
//! listings. A [`Reconciler`] run normalizes them into canonical [`Job`]s,
//! deduplicates by link and replaces the source's snapshot in the
//! [`JobStore`]. A [`RetentionSweeper`] purges old postings and [`JobQuery`]
//! lists what is stored.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use job_ingest::{MemoryStore, Reconciler, ReqwestFetcher, SourceRegistry};
//! use std::{sync::Arc, time::Duration};
//!
//! let store = Arc::new(MemoryStore::new());
//! let registry = SourceRegistry::builtin(Arc::new(ReqwestFetcher::new()?), None, Duration::from_secs(2))?;
//! let reconciler = Reconciler::new(store.clone());
//!
//! let report = reconciler.run_source(&registry, "notion").await;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
//! ## Failure semantics
//!
//! A run that fails to fetch, or fetches nothing usable, leaves the source's
//! previous snapshot untouched. Individual bad records are dropped and logged
//! without failing the run.

pub mod adapters;
pub mod error;
pub mod fetchers;
pub mod pipeline;
pub mod registry;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

pub use error::{
    ErrorKind, FetchError, FetchResult, ReconcileError, StoreError, StoreResult, SweepError,
    ValidationError,
};
pub use traits::{
    adapter::SourceAdapter,
    fetcher::{HttpFetcher, PageRenderer, RenderRequest},
    store::{JobPredicate, JobStore, SortOrder, UpsertOutcome},
};
pub use types::{
    job::{Job, DEFAULT_LOCATION},
    raw::{RawField, RawRecord},
    source::SourceDescriptor,
};

pub use adapters::{
    GreenhouseBoard, JsonFeedAdapter, JsonFeedSpec, ListingSelectors, PagedSearchAdapter,
    PagedSearchSpec, RenderedListingAdapter,
};
pub use fetchers::{FirecrawlRenderer, ReqwestFetcher};
pub use pipeline::{
    DedupResolver, JobQuery, NormalizedBatch, Normalizer, ReconcileReport, Reconciler,
    ReconcilerConfig, RetentionSweeper, RunState, SweepReport, MAX_PAGE_SIZE,
};
pub use registry::SourceRegistry;

pub use stores::MemoryStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;
