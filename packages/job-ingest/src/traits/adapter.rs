//! Source adapter contract.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::{raw::RawRecord, source::SourceDescriptor};

/// Fetches and shapes one source's listings.
///
/// Adapters are stateless with respect to the store. A fetch that worked but
/// found nothing returns `Ok(vec![])`; anything that went wrong returns a
/// `FetchError`, so callers never mistake a broken fetch for an empty board.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Identity of the source this adapter serves.
    fn descriptor(&self) -> &SourceDescriptor;

    /// Fetch the source's current listings.
    async fn fetch_raw(&self) -> FetchResult<Vec<RawRecord>>;

    /// Source tag (shorthand for `descriptor().tag`).
    fn tag(&self) -> &str {
        &self.descriptor().tag
    }
}
