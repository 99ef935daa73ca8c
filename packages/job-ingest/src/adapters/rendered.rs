//! Adapter for listing pages that only exist after client-side rendering.
//!
//! The page renderer returns the DOM as HTML; listings are then picked out
//! with CSS selectors. Relative links are kept as-is and resolved by the
//! normalizer against the source's base URL.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::{FetchError, FetchResult};
use crate::traits::{
    adapter::SourceAdapter,
    fetcher::{PageRenderer, RenderRequest},
};
use crate::types::{raw::RawRecord, source::SourceDescriptor};

/// CSS selectors for one listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// One match per posting. Also what the renderer waits for.
    pub item: String,
    /// Title text, relative to the item.
    pub title: String,
    /// Element carrying the posting `href`, relative to the item.
    pub link: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl ListingSelectors {
    pub fn new(
        item: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            title: title.into(),
            link: link.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, selector: impl Into<String>) -> Self {
        self.location = Some(selector.into());
        self
    }
}

/// Renders a listing page and extracts postings from the DOM.
pub struct RenderedListingAdapter {
    descriptor: SourceDescriptor,
    url: String,
    selectors: ListingSelectors,
    renderer: Arc<dyn PageRenderer>,
    render_timeout: Duration,
}

impl RenderedListingAdapter {
    pub fn new(
        descriptor: SourceDescriptor,
        url: impl Into<String>,
        selectors: ListingSelectors,
        renderer: Arc<dyn PageRenderer>,
    ) -> Self {
        Self {
            descriptor,
            url: url.into(),
            selectors,
            renderer,
            render_timeout: Duration::from_secs(90),
        }
    }

    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }
}

#[async_trait]
impl SourceAdapter for RenderedListingAdapter {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    async fn fetch_raw(&self) -> FetchResult<Vec<RawRecord>> {
        let request = RenderRequest::new(&self.url)
            .wait_for(&self.selectors.item)
            .with_timeout(self.render_timeout);

        let html = self.renderer.render(&request).await?;
        let records = extract_listings(&html, &self.selectors, &self.url)?;

        debug!(
            source = %self.descriptor.tag,
            renderer = self.renderer.name(),
            listings = records.len(),
            "Extracted rendered listings"
        );

        Ok(records)
    }
}

/// Pick postings out of an HTML document.
///
/// Items without a title or link still yield a record so the normalizer can
/// report why they were dropped.
pub fn extract_listings(
    html: &str,
    selectors: &ListingSelectors,
    url: &str,
) -> FetchResult<Vec<RawRecord>> {
    let item = parse_selector(&selectors.item, url)?;
    let title = parse_selector(&selectors.title, url)?;
    let link = parse_selector(&selectors.link, url)?;
    let location = selectors
        .location
        .as_deref()
        .map(|s| parse_selector(s, url))
        .transpose()?;

    let document = Html::parse_document(html);

    Ok(document
        .select(&item)
        .map(|element| RawRecord {
            title: first_text(element, &title),
            link: element
                .select(&link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
            location: location.as_ref().and_then(|s| first_text(element, s)),
            ..Default::default()
        })
        .collect())
}

fn parse_selector(selector: &str, url: &str) -> FetchResult<Selector> {
    Selector::parse(selector).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: format!("invalid selector `{}`: {}", selector, e),
    })
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticRenderer;

    const BOARD: &str = r#"
        <html><body>
          <div class="opening">
            <a href="/jobber/jobs/101">Senior Engineer</a>
            <span class="location">Edmonton, AB</span>
          </div>
          <div class="opening">
            <a href="https://boards.greenhouse.io/jobber/jobs/102">  Designer </a>
          </div>
          <div class="opening"><span class="location">Toronto</span></div>
        </body></html>
    "#;

    fn selectors() -> ListingSelectors {
        ListingSelectors::new(".opening", "a", "a").with_location(".location")
    }

    #[test]
    fn test_extracts_one_record_per_item() {
        let records = extract_listings(BOARD, &selectors(), "https://boards.greenhouse.io/jobber")
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title.as_deref(), Some("Senior Engineer"));
        assert_eq!(records[0].link.as_deref(), Some("/jobber/jobs/101"));
        assert_eq!(records[0].location.as_deref(), Some("Edmonton, AB"));
        assert_eq!(records[1].title.as_deref(), Some("  Designer "));
        assert_eq!(records[1].location, None);
        assert_eq!(records[2].title, None);
        assert_eq!(records[2].link, None);
    }

    #[test]
    fn test_job_tile_layout() {
        let html = r#"
            <ul>
              <li class="job-tile">
                <h3 class="job-title">Software Engineer II</h3>
                <a class="job-title-link" href="https://jobs.careers.microsoft.com/global/en/job/1788">open</a>
                <span class="job-location">Redmond, Washington, United States</span>
              </li>
            </ul>
        "#;
        let selectors = ListingSelectors::new("li.job-tile", "h3.job-title", "a.job-title-link")
            .with_location("span.job-location");

        let records = extract_listings(html, &selectors, "https://jobs.careers.microsoft.com")
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("Software Engineer II"));
        assert_eq!(
            records[0].link.as_deref(),
            Some("https://jobs.careers.microsoft.com/global/en/job/1788")
        );
    }

    #[test]
    fn test_no_items_is_empty_not_error() {
        let records = extract_listings("<html></html>", &selectors(), "https://x.test").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_invalid_selector_is_decode_error() {
        let bad = ListingSelectors::new("div[", "a", "a");
        let err = extract_listings(BOARD, &bad, "https://x.test").unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_asks_renderer_to_wait_for_items() {
        let renderer = StaticRenderer::new(BOARD);
        let adapter = RenderedListingAdapter::new(
            SourceDescriptor::parse("jobber", "Jobber", "https://boards.greenhouse.io").unwrap(),
            "https://boards.greenhouse.io/jobber",
            selectors(),
            Arc::new(renderer.clone()),
        );

        let records = adapter.fetch_raw().await.unwrap();

        assert_eq!(records.len(), 3);
        let requests = renderer.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].wait_for.as_deref(), Some(".opening"));
    }
}
