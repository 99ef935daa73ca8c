//! Fetch capability implementations.
//!
//! - `ReqwestFetcher` - JSON over HTTP
//! - `FirecrawlRenderer` - headless rendering through the Firecrawl scrape API

mod firecrawl;
mod http;

pub use firecrawl::FirecrawlRenderer;
pub use http::ReqwestFetcher;

pub use crate::traits::fetcher::{HttpFetcher, PageRenderer, RenderRequest};
