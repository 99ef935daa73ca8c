//! Firecrawl-based page renderer.
//!
//! Uses the Firecrawl scrape API as the headless-browser capability: it
//! navigates to the page, waits for the listing selector to appear and
//! returns the rendered DOM.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{PageRenderer, RenderRequest};

const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";

/// Renders JavaScript-dependent pages through Firecrawl.
///
/// # Example
///
/// ```rust,ignore
/// use job_ingest::fetchers::{FirecrawlRenderer, PageRenderer, RenderRequest};
///
/// let renderer = FirecrawlRenderer::new(std::env::var("FIRECRAWL_API_KEY")?)?;
/// let html = renderer
///     .render(&RenderRequest::new("https://boards.greenhouse.io/jobber").wait_for(".opening"))
///     .await?;
/// ```
pub struct FirecrawlRenderer {
    client: Client,
    api_key: String,
    api_url: String,
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 1],
    #[serde(rename = "onlyMainContent")]
    only_main_content: bool,
    /// Milliseconds
    timeout: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    actions: Vec<Action<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Action<'a> {
    Wait { selector: &'a str },
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    #[serde(rename = "rawHtml")]
    raw_html: Option<String>,
}

impl FirecrawlRenderer {
    /// Create a renderer with the given API key.
    pub fn new(api_key: impl Into<String>) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_url: FIRECRAWL_API_URL.to_string(),
        })
    }

    /// Point at a self-hosted Firecrawl instance.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PageRenderer for FirecrawlRenderer {
    async fn render(&self, request: &RenderRequest) -> FetchResult<String> {
        debug!(url = %request.url, wait_for = ?request.wait_for, "Rendering page");

        let body = ScrapeRequest {
            url: &request.url,
            formats: ["rawHtml"],
            only_main_content: false,
            timeout: request.timeout.as_millis() as u64,
            actions: request
                .wait_for
                .as_deref()
                .map(|selector| vec![Action::Wait { selector }])
                .unwrap_or_default(),
        };

        let response = self
            .client
            .post(format!("{}/scrape", self.api_url))
            .bearer_auth(&self.api_key)
            .timeout(request.timeout + Duration::from_secs(10))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: request.url.clone(),
                    }
                } else {
                    FetchError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Render {
                url: request.url.clone(),
                reason: format!("Firecrawl API error: {} - {}", status, text),
            });
        }

        let parsed: ScrapeResponse = response.json().await.map_err(|e| FetchError::Decode {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        if !parsed.success {
            return Err(FetchError::Render {
                url: request.url.clone(),
                reason: parsed.error.unwrap_or_else(|| "scrape unsuccessful".to_string()),
            });
        }

        parsed
            .data
            .and_then(|d| d.raw_html)
            .ok_or_else(|| FetchError::Render {
                url: request.url.clone(),
                reason: "response contained no HTML".to_string(),
            })
    }

    fn name(&self) -> &str {
        "firecrawl"
    }
}
