//! Greenhouse job board API.
//!
//! `GET https://boards-api.greenhouse.io/v1/boards/{board}/jobs` returns
//! `{"jobs": [{"id", "title", "absolute_url", "location": {"name"}}]}`.

use std::sync::Arc;

use super::json_feed::{JsonFeedAdapter, JsonFeedSpec};
use super::mapping::{FieldMapping, LinkStrategy};
use crate::traits::fetcher::HttpFetcher;
use crate::types::source::SourceDescriptor;

pub const GREENHOUSE_API_URL: &str = "https://boards-api.greenhouse.io/v1/boards";

/// One Greenhouse board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreenhouseBoard {
    pub board: String,
    /// Build links from the posting id instead of `absolute_url`.
    pub link_template: Option<String>,
}

impl GreenhouseBoard {
    pub fn new(board: impl Into<String>) -> Self {
        Self {
            board: board.into(),
            link_template: None,
        }
    }

    /// Link to postings as `template` with `{id}` replaced by the posting id.
    pub fn with_link_template(mut self, template: impl Into<String>) -> Self {
        self.link_template = Some(template.into());
        self
    }

    pub fn api_url(&self) -> String {
        format!("{}/{}/jobs", GREENHOUSE_API_URL, self.board)
    }

    pub fn into_spec(self) -> JsonFeedSpec {
        let link = match &self.link_template {
            Some(template) => LinkStrategy::Template {
                id_pointer: "/id".to_string(),
                template: template.clone(),
            },
            None => LinkStrategy::Field {
                pointer: "/absolute_url".to_string(),
            },
        };

        JsonFeedSpec {
            url: self.api_url(),
            listings_pointer: "/jobs".to_string(),
            mapping: FieldMapping::new("/title", link)
                .with_location("/location/name")
                .with_job_id("/id"),
        }
    }

    /// Adapter reading this board through `fetcher`.
    pub fn adapter(
        self,
        descriptor: SourceDescriptor,
        fetcher: Arc<dyn HttpFetcher>,
    ) -> JsonFeedAdapter {
        JsonFeedAdapter::new(descriptor, self.into_spec(), fetcher)
    }
}
