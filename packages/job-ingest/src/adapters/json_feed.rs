//! Adapter for sources that publish their listings as one JSON document.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::mapping::{listings_at, FieldMapping};
use crate::error::{FetchError, FetchResult};
use crate::traits::{adapter::SourceAdapter, fetcher::HttpFetcher};
use crate::types::{raw::RawRecord, source::SourceDescriptor};

/// Where a JSON feed lives and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonFeedSpec {
    pub url: String,
    /// JSON pointer to the listings array, e.g. `/jobs`.
    pub listings_pointer: String,
    pub mapping: FieldMapping,
}

/// Fetches one JSON document and maps every listing in it.
pub struct JsonFeedAdapter {
    descriptor: SourceDescriptor,
    spec: JsonFeedSpec,
    fetcher: Arc<dyn HttpFetcher>,
}

impl JsonFeedAdapter {
    pub fn new(
        descriptor: SourceDescriptor,
        spec: JsonFeedSpec,
        fetcher: Arc<dyn HttpFetcher>,
    ) -> Self {
        Self {
            descriptor,
            spec,
            fetcher,
        }
    }

    pub fn spec(&self) -> &JsonFeedSpec {
        &self.spec
    }
}

#[async_trait]
impl SourceAdapter for JsonFeedAdapter {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    async fn fetch_raw(&self) -> FetchResult<Vec<RawRecord>> {
        let payload = self.fetcher.get_json(&self.spec.url).await?;

        let listings =
            listings_at(&payload, &self.spec.listings_pointer).ok_or_else(|| FetchError::Decode {
                url: self.spec.url.clone(),
                reason: format!("no listings array at `{}`", self.spec.listings_pointer),
            })?;

        debug!(
            source = %self.descriptor.tag,
            listings = listings.len(),
            "Fetched JSON feed"
        );

        Ok(listings
            .iter()
            .map(|listing| self.spec.mapping.extract(listing))
            .collect())
    }
}
