//! reqwest-backed JSON fetcher.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::HttpFetcher;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Fetches JSON endpoints with a bounded request timeout.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Create a fetcher with a 30 second request timeout.
    pub fn new() -> FetchResult<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(Self { client })
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get_json(&self, url: &str) -> FetchResult<serde_json::Value> {
        debug!(url = %url, "HTTP fetch starting");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                classify(url, e)
            })?;

        check_status(url, response.status())?;

        let body = response.bytes().await.map_err(|e| classify(url, e))?;
        decode_body(url, &body)
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

/// Non-2xx answers are failed fetches, never empty results.
fn check_status(url: &str, status: reqwest::StatusCode) -> FetchResult<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
    })
}

fn decode_body(url: &str, body: &[u8]) -> FetchResult<serde_json::Value> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http(Box::new(error))
    }
}
