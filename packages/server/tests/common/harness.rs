//! Test harness driving the router in-process.
//!
//! Requests go through `tower::ServiceExt::oneshot`, so no port is bound and
//! no real source is contacted.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use job_ingest::{JobStore, MemoryStore, ReconcilerConfig, SourceAdapter, SourceRegistry};
use serde_json::Value;
use server_core::{kernel::ServerDeps, server::build_app};
use tower::ServiceExt;

pub struct TestHarness {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

impl TestHarness {
    /// Router over an in-memory store with the given sources.
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let app = Self::app_with_store(store.clone(), adapters);
        Self { app, store }
    }

    /// Router over any store.
    pub fn app_with_store(
        store: Arc<dyn JobStore>,
        adapters: Vec<Arc<dyn SourceAdapter>>,
    ) -> Router {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let mut registry = SourceRegistry::new();
        for adapter in adapters {
            registry.register(adapter);
        }

        let deps = ServerDeps::new(
            store,
            registry,
            ReconcilerConfig::default(),
            chrono::Duration::days(50),
        );
        build_app(Arc::new(deps), &["http://localhost:3000".to_string()])
    }
}

/// Send a request and decode the JSON body.
pub async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}
