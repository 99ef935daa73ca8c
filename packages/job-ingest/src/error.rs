//! Typed errors for the ingestion pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! failed fetch apart from an empty one, and a bad record apart from a dead
//! store.

use serde::Serialize;
use thiserror::Error;

use crate::types::raw::RawField;

/// Errors raised while fetching raw listings from a source.
///
/// Every variant is treated as `FetchFailed` by the reconciler: the prior
/// snapshot for the source is left untouched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Upstream answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Request or render exceeded its deadline
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Payload could not be decoded into listings
    #[error("undecodable payload from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The page renderer could not produce a document
    #[error("render failed for {url}: {reason}")]
    Render { url: String, reason: String },
}

/// Per-record validation failures. Never fatal to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing title")]
    MissingTitle,

    #[error("missing link")]
    MissingLink,

    #[error("link is not an absolute http(s) URL: {link}")]
    InvalidLink { link: String },

    #[error("field `{field}` has the wrong type")]
    WrongType { field: RawField },
}

/// Errors from the job store capability.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store unreachable or the operation failed inside it
    #[error("store unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A persisted row could not be turned back into a job
    #[error("corrupt job row: {reason}")]
    Corrupt { reason: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable(message.into().into())
    }
}

/// Why a reconciler run ended in the `Failed` state.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    #[error("fetch returned no usable job records ({dropped} dropped)")]
    EmptyResult { dropped: usize },

    #[error("job store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("a refresh for `{source_tag}` is already running")]
    AlreadyRunning { source_tag: String },

    #[error("unknown source: {0}")]
    UnknownSource(String),
}

/// Stable classification of a failed run, exposed in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FetchFailed,
    EmptyResult,
    StoreUnavailable,
    AlreadyRunning,
    UnknownSource,
}

impl ReconcileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconcileError::FetchFailed(_) => ErrorKind::FetchFailed,
            ReconcileError::EmptyResult { .. } => ErrorKind::EmptyResult,
            ReconcileError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            ReconcileError::AlreadyRunning { .. } => ErrorKind::AlreadyRunning,
            ReconcileError::UnknownSource(_) => ErrorKind::UnknownSource,
        }
    }
}

/// Errors from the retention sweeper.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("retention window must not be negative")]
    NegativeWindow,

    #[error("retention window of {days} days reaches past the earliest representable date")]
    WindowTooLarge { days: i64 },

    #[error("job store unavailable: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
