use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use job_ingest::{ErrorKind, ReconcileReport};
use serde::Serialize;

use crate::server::app::AppState;

/// HTTP status for a refresh outcome.
pub fn status_for(report: &ReconcileReport) -> StatusCode {
    match report.error_kind() {
        None => StatusCode::OK,
        Some(ErrorKind::UnknownSource) => StatusCode::NOT_FOUND,
        Some(ErrorKind::AlreadyRunning) => StatusCode::CONFLICT,
        Some(ErrorKind::FetchFailed) => StatusCode::BAD_GATEWAY,
        Some(ErrorKind::EmptyResult) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(ErrorKind::StoreUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Refresh one source: `POST /scrape/:source`
pub async fn scrape_source_handler(
    Extension(state): Extension<AppState>,
    Path(source): Path<String>,
) -> (StatusCode, Json<ReconcileReport>) {
    let report = state
        .deps
        .reconciler
        .run_source(&state.deps.registry, &source)
        .await;

    (status_for(&report), Json(report))
}

#[derive(Serialize)]
pub struct ScrapeAllResponse {
    pub reports: Vec<ReconcileReport>,
}

/// Refresh every registered source concurrently: `POST /scrape`
///
/// Always 200; each report carries its own status.
pub async fn scrape_all_handler(Extension(state): Extension<AppState>) -> Json<ScrapeAllResponse> {
    let reports = state.deps.reconciler.run_all(&state.deps.registry).await;
    Json(ScrapeAllResponse { reports })
}
