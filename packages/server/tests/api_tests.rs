mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method, Request, StatusCode};
use chrono::Utc;
use job_ingest::testing::{job, FailingStore, MockAdapter, MockFailure};
use job_ingest::{JobStore, RawRecord, SourceAdapter};
use tokio::sync::Notify;
use tower::ServiceExt;

use common::{send, TestHarness};

fn source(adapter: MockAdapter) -> Arc<dyn SourceAdapter> {
    Arc::new(adapter)
}

fn brex() -> Arc<dyn SourceAdapter> {
    source(MockAdapter::new("brex", "Brex").with_records(vec![
        RawRecord::new("Designer", "https://brex.example.com/jobs/1").with_location("NYC"),
        RawRecord::new("Analyst", "https://brex.example.com/jobs/2"),
    ]))
}

#[tokio::test]
async fn test_scrape_source_success() {
    let harness = TestHarness::new(vec![brex()]);

    let (status, body) = send(&harness.app, "POST", "/scrape/brex").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["jobs_added"], 2);
    assert_eq!(body["sample_job"]["company"], "Brex");
    assert_eq!(harness.store.len(), 2);
}

#[tokio::test]
async fn test_scrape_unknown_source_is_404() {
    let harness = TestHarness::new(vec![brex()]);

    let (status, body) = send(&harness.app, "POST", "/scrape/workday").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["kind"], "unknown_source");
}

#[tokio::test]
async fn test_scrape_failure_status_codes() {
    let harness = TestHarness::new(vec![
        source(MockAdapter::new("empty", "Empty")),
        source(MockAdapter::new("down", "Down").failing(MockFailure::Status(500))),
    ]);

    let (status, body) = send(&harness.app, "POST", "/scrape/empty").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "empty_result");

    let (status, body) = send(&harness.app, "POST", "/scrape/down").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "fetch_failed");
    assert!(body["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_scrape_store_down_is_503() {
    let app = TestHarness::app_with_store(Arc::new(FailingStore), vec![brex()]);

    let (status, body) = send(&app, "POST", "/scrape/brex").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "store_unavailable");
}

#[tokio::test]
async fn test_concurrent_scrape_is_409() {
    let gate = Arc::new(Notify::new());
    let adapter = Arc::new(
        MockAdapter::new("brex", "Brex")
            .with_records(vec![RawRecord::new("Designer", "https://brex.example.com/jobs/1")])
            .gated(gate.clone()),
    );
    let registered: Arc<dyn SourceAdapter> = adapter.clone();
    let harness = TestHarness::new(vec![registered]);

    let first = tokio::spawn({
        let app = harness.app.clone();
        async move { send(&app, "POST", "/scrape/brex").await }
    });
    for _ in 0..400 {
        if adapter.calls() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let (status, body) = send(&harness.app, "POST", "/scrape/brex").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "already_running");

    gate.notify_one();
    let (status, _) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_scrape_all() {
    let harness = TestHarness::new(vec![
        brex(),
        source(MockAdapter::new("notion", "Notion").failing(MockFailure::Timeout)),
    ]);

    let (status, body) = send(&harness.app, "POST", "/scrape").await;

    assert_eq!(status, StatusCode::OK);
    let reports = body["reports"].as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["source"], "brex");
    assert_eq!(reports[0]["status"], "success");
    assert_eq!(reports[1]["source"], "notion");
    assert_eq!(reports[1]["status"], "error");
}

#[tokio::test]
async fn test_list_jobs_newest_first_with_company_filter() {
    let harness = TestHarness::new(vec![]);
    let mut older = job("https://a.example.com/1", "Brex");
    older.posted_date = Utc::now() - chrono::Duration::days(3);
    let mut newer = job("https://a.example.com/2", "Brex");
    newer.posted_date = Utc::now() - chrono::Duration::days(1);
    let other = job("https://n.example.com/1", "Notion");
    for j in [&older, &newer, &other] {
        harness.store.upsert(j).await.unwrap();
    }

    let (status, body) = send(&harness.app, "GET", "/jobs?company=Brex").await;

    assert_eq!(status, StatusCode::OK);
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["link"], "https://a.example.com/2");
    assert_eq!(jobs[1]["link"], "https://a.example.com/1");

    let (_, body) = send(&harness.app, "GET", "/jobs").await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_jobs_store_down_is_503() {
    let app = TestHarness::app_with_store(Arc::new(FailingStore), vec![]);

    let (status, body) = send(&app, "GET", "/jobs").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_cleanup_deletes_old_jobs() {
    let harness = TestHarness::new(vec![]);
    let mut stale = job("https://a.example.com/old", "brex");
    stale.posted_date = Utc::now() - chrono::Duration::days(60);
    let mut fresh = job("https://a.example.com/new", "brex");
    fresh.posted_date = Utc::now() - chrono::Duration::days(2);
    harness.store.upsert(&stale).await.unwrap();
    harness.store.upsert(&fresh).await.unwrap();

    let (status, body) = send(&harness.app, "POST", "/cleanup").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["deleted_count"], 1);
    assert!(body["cutoff_date"].is_string());
    assert_eq!(harness.store.len(), 1);

    let (_, body) = send(&harness.app, "POST", "/cleanup").await;
    assert_eq!(body["deleted_count"], 0);
}

#[tokio::test]
async fn test_sources_listed() {
    let harness = TestHarness::new(vec![
        brex(),
        source(MockAdapter::new("notion", "Notion")),
    ]);

    let (status, body) = send(&harness.app, "GET", "/sources").await;

    assert_eq!(status, StatusCode::OK);
    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["tag"], "brex");
    assert_eq!(sources[0]["company"], "Brex");
    assert_eq!(sources[1]["tag"], "notion");
}

#[tokio::test]
async fn test_health() {
    let harness = TestHarness::new(vec![brex()]);
    let (status, body) = send(&harness.app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["backend"], "memory");

    let app = TestHarness::app_with_store(Arc::new(FailingStore), vec![]);
    let (status, body) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_cors_allows_frontend_origin() {
    let harness = TestHarness::new(vec![]);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/jobs")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = harness.app.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}
