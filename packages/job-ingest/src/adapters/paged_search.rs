//! Adapter for paged JSON search APIs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::mapping::{listings_at, FieldMapping};
use crate::error::{FetchError, FetchResult};
use crate::traits::{adapter::SourceAdapter, fetcher::HttpFetcher};
use crate::types::{raw::RawRecord, source::SourceDescriptor};

/// Placeholder replaced by the page number in the URL template.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// A search API queried page by page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedSearchSpec {
    /// URL containing `{page}`.
    pub url_template: String,
    pub first_page: u32,
    pub last_page: u32,
    pub listings_pointer: String,
    pub mapping: FieldMapping,
    /// Fixed pause between page requests.
    #[serde(default)]
    pub page_delay: Duration,
}

impl PagedSearchSpec {
    pub fn page_url(&self, page: u32) -> String {
        self.url_template
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }
}

/// Walks the pages of a search API and concatenates the listings.
///
/// Any failing page fails the whole fetch: a partial snapshot would let the
/// reconciler delete the postings that lived on the missing pages. A page
/// with no listings ends the walk early.
pub struct PagedSearchAdapter {
    descriptor: SourceDescriptor,
    spec: PagedSearchSpec,
    fetcher: Arc<dyn HttpFetcher>,
}

impl PagedSearchAdapter {
    pub fn new(
        descriptor: SourceDescriptor,
        spec: PagedSearchSpec,
        fetcher: Arc<dyn HttpFetcher>,
    ) -> Self {
        Self {
            descriptor,
            spec,
            fetcher,
        }
    }
}

#[async_trait]
impl SourceAdapter for PagedSearchAdapter {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    async fn fetch_raw(&self) -> FetchResult<Vec<RawRecord>> {
        let mut records = Vec::new();

        for page in self.spec.first_page..=self.spec.last_page {
            if page > self.spec.first_page && !self.spec.page_delay.is_zero() {
                tokio::time::sleep(self.spec.page_delay).await;
            }

            let url = self.spec.page_url(page);
            let payload = self.fetcher.get_json(&url).await?;
            let listings = listings_at(&payload, &self.spec.listings_pointer).ok_or_else(|| {
                FetchError::Decode {
                    url: url.clone(),
                    reason: format!("no listings array at `{}`", self.spec.listings_pointer),
                }
            })?;

            debug!(
                source = %self.descriptor.tag,
                page,
                listings = listings.len(),
                "Fetched search page"
            );

            if listings.is_empty() {
                break;
            }

            records.extend(listings.iter().map(|listing| self.spec.mapping.extract(listing)));
        }

        Ok(records)
    }
}
