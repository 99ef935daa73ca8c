//! The sources the aggregator ships with.

use std::sync::Arc;
use std::time::Duration;

use super::greenhouse::GreenhouseBoard;
use super::json_feed::{JsonFeedAdapter, JsonFeedSpec};
use super::mapping::{FieldMapping, LinkStrategy};
use super::paged_search::{PagedSearchAdapter, PagedSearchSpec};
use super::rendered::{ListingSelectors, RenderedListingAdapter};
use crate::traits::{
    adapter::SourceAdapter,
    fetcher::{HttpFetcher, PageRenderer},
};
use crate::types::source::SourceDescriptor;

pub const MICROSOFT_SEARCH_URL: &str = "https://gcsservices.careers.microsoft.com/search/api/v1/search?l=en_us&pg={page}&pgSz=50&o=Relevance&flt=true";
pub const MICROSOFT_JOB_URL: &str = "https://jobs.careers.microsoft.com/global/en/job/{id}";
pub const BREX_CAREERS_URL: &str =
    "https://www.brex.com/_next/data/wArwWKz_EVcGELMBhYgnK/careers.json";
pub const JOBBER_BOARD_URL: &str = "https://boards.greenhouse.io/jobber";
pub const NOTION_JOB_URL: &str = "https://boards.greenhouse.io/notion/jobs/{id}";

const GREENHOUSE_BOARDS: &str = "https://boards.greenhouse.io";

/// Microsoft careers search API, 5 pages of 50.
pub fn microsoft(
    fetcher: Arc<dyn HttpFetcher>,
    page_delay: Duration,
) -> Result<PagedSearchAdapter, url::ParseError> {
    let spec = PagedSearchSpec {
        url_template: MICROSOFT_SEARCH_URL.to_string(),
        first_page: 1,
        last_page: 5,
        listings_pointer: "/operationResult/result/jobs".to_string(),
        mapping: FieldMapping::new(
            "/title",
            LinkStrategy::Template {
                id_pointer: "/jobId".to_string(),
                template: MICROSOFT_JOB_URL.to_string(),
            },
        )
        .with_location("/properties/locations/0")
        .with_posted_date("/postingDate")
        .with_job_id("/jobId"),
        page_delay,
    };

    Ok(PagedSearchAdapter::new(
        SourceDescriptor::parse("microsoft", "Microsoft", "https://jobs.careers.microsoft.com")?,
        spec,
        fetcher,
    ))
}

/// Brex careers page data.
pub fn brex(fetcher: Arc<dyn HttpFetcher>) -> Result<JsonFeedAdapter, url::ParseError> {
    let spec = JsonFeedSpec {
        url: BREX_CAREERS_URL.to_string(),
        listings_pointer: "/jobs".to_string(),
        mapping: FieldMapping::new(
            "/title",
            LinkStrategy::Field {
                pointer: "/absolute_url".to_string(),
            },
        )
        .with_location("/location/name"),
    };

    Ok(JsonFeedAdapter::new(
        SourceDescriptor::parse("brex", "Brex", "https://www.brex.com")?,
        spec,
        fetcher,
    ))
}

/// Jobber's rendered Greenhouse board.
pub fn jobber(renderer: Arc<dyn PageRenderer>) -> Result<RenderedListingAdapter, url::ParseError> {
    Ok(RenderedListingAdapter::new(
        SourceDescriptor::parse("jobber", "Jobber", GREENHOUSE_BOARDS)?,
        JOBBER_BOARD_URL,
        ListingSelectors::new(".opening", "a", "a").with_location(".location"),
        renderer,
    ))
}

/// Notion's Greenhouse board, linked by posting id.
pub fn notion(fetcher: Arc<dyn HttpFetcher>) -> Result<JsonFeedAdapter, url::ParseError> {
    Ok(GreenhouseBoard::new("notion")
        .with_link_template(NOTION_JOB_URL)
        .adapter(
            SourceDescriptor::parse("notion", "Notion", GREENHOUSE_BOARDS)?,
            fetcher,
        ))
}

/// A Greenhouse board whose tag, board name and company label coincide.
pub fn greenhouse(
    board: &str,
    fetcher: Arc<dyn HttpFetcher>,
) -> Result<JsonFeedAdapter, url::ParseError> {
    Ok(GreenhouseBoard::new(board).adapter(
        SourceDescriptor::parse(board, board, GREENHOUSE_BOARDS)?,
        fetcher,
    ))
}

/// Every built-in source.
///
/// Rendered sources are only included when a renderer is available.
pub fn builtin_sources(
    fetcher: Arc<dyn HttpFetcher>,
    renderer: Option<Arc<dyn PageRenderer>>,
    page_delay: Duration,
) -> Result<Vec<Arc<dyn SourceAdapter>>, url::ParseError> {
    let mut sources: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(microsoft(fetcher.clone(), page_delay)?),
        Arc::new(brex(fetcher.clone())?),
        Arc::new(notion(fetcher.clone())?),
    ];

    for board in ["intercom", "zoominfo", "circleci"] {
        sources.push(Arc::new(greenhouse(board, fetcher.clone())?));
    }

    if let Some(renderer) = renderer {
        sources.push(Arc::new(jobber(renderer)?));
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticFetcher, StaticRenderer};
    use serde_json::json;

    #[test]
    fn test_rendered_sources_need_a_renderer() {
        let fetcher: Arc<dyn HttpFetcher> = Arc::new(StaticFetcher::new());

        let without = builtin_sources(fetcher.clone(), None, Duration::ZERO).unwrap();
        let tags: Vec<_> = without.iter().map(|s| s.tag().to_string()).collect();
        assert_eq!(
            tags,
            vec!["microsoft", "brex", "notion", "intercom", "zoominfo", "circleci"]
        );

        let renderer: Arc<dyn PageRenderer> = Arc::new(StaticRenderer::new(""));
        let with = builtin_sources(fetcher, Some(renderer), Duration::ZERO).unwrap();
        assert_eq!(with.len(), 7);
        assert_eq!(with[6].descriptor().company, "Jobber");
    }

    #[test]
    fn test_greenhouse_company_label_is_board_name() {
        let adapter = greenhouse("zoominfo", Arc::new(StaticFetcher::new())).unwrap();
        assert_eq!(adapter.descriptor().company, "zoominfo");
        assert_eq!(
            adapter.spec().url,
            "https://boards-api.greenhouse.io/v1/boards/zoominfo/jobs"
        );
    }

    #[tokio::test]
    async fn test_microsoft_maps_search_results() {
        let page = |jobs: serde_json::Value| json!({"operationResult": {"result": {"jobs": jobs}}});
        let mut fetcher = StaticFetcher::new().with_response(
            &MICROSOFT_SEARCH_URL.replace("{page}", "1"),
            page(json!([{
                "jobId": "1788",
                "title": "Software Engineer II",
                "postingDate": "2025-05-01T00:00:00+00:00",
                "properties": {"locations": ["Redmond, Washington, United States"]}
            }])),
        );
        for n in 2..=5 {
            fetcher = fetcher.with_response(
                &MICROSOFT_SEARCH_URL.replace("{page}", &n.to_string()),
                page(json!([])),
            );
        }

        let records = microsoft(Arc::new(fetcher), Duration::ZERO)
            .unwrap()
            .fetch_raw()
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].link.as_deref(),
            Some("https://jobs.careers.microsoft.com/global/en/job/1788")
        );
        assert_eq!(
            records[0].location.as_deref(),
            Some("Redmond, Washington, United States")
        );
        assert_eq!(
            records[0].posted_date.as_deref(),
            Some("2025-05-01T00:00:00+00:00")
        );
        assert_eq!(records[0].job_id.as_deref(), Some("1788"));
    }
}
