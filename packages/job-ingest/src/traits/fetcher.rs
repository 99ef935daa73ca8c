//! Network capabilities consumed by adapters.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::FetchResult;

/// Fetches JSON documents over HTTP.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get_json(&self, url: &str) -> FetchResult<serde_json::Value>;

    /// Fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

/// A request to render a page in a headless browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub url: String,
    /// CSS selector that must appear before the DOM is captured.
    pub wait_for: Option<String>,
    pub timeout: Duration,
}

impl RenderRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            wait_for: None,
            timeout: Duration::from_secs(90),
        }
    }

    pub fn wait_for(mut self, selector: impl Into<String>) -> Self {
        self.wait_for = Some(selector.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Navigates to a page, waits for it to render and returns the DOM as HTML.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> FetchResult<String>;

    fn name(&self) -> &str {
        "unknown"
    }
}
