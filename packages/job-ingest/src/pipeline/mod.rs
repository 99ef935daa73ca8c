//! Ingestion pipeline: normalize, resolve, reconcile, sweep, query.

pub mod normalize;
pub mod query;
pub mod reconcile;
pub mod resolve;
pub mod retention;

pub use normalize::{DroppedRecord, NormalizedBatch, Normalizer};
pub use query::{JobQuery, MAX_PAGE_SIZE};
pub use reconcile::{
    ReconcileReport, Reconciler, ReconcilerConfig, RefreshFailure, RefreshSummary, RunState,
};
pub use resolve::{dedup_batch, DedupResolver};
pub use retention::{RetentionSweeper, SweepReport, DEFAULT_RETENTION_DAYS};
