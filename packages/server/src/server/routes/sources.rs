use axum::{extract::Extension, Json};
use job_ingest::SourceDescriptor;
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<SourceDescriptor>,
}

/// Registered sources: `GET /sources`
pub async fn list_sources_handler(Extension(state): Extension<AppState>) -> Json<SourcesResponse> {
    Json(SourcesResponse {
        sources: state.deps.registry.descriptors(),
    })
}
