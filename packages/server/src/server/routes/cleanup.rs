use axum::{extract::Extension, http::StatusCode, Json};
use job_ingest::{SweepError, SweepReport};
use serde::Serialize;

use super::ApiError;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct CleanupResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub report: SweepReport,
}

/// Purge jobs older than the retention window: `POST /cleanup`
pub async fn cleanup_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<CleanupResponse>, ApiError> {
    let report = state.deps.sweeper.sweep().await.map_err(|e| match e {
        SweepError::NegativeWindow | SweepError::WindowTooLarge { .. } => {
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        SweepError::Store(_) => ApiError::unavailable(e),
    })?;

    Ok(Json(CleanupResponse {
        status: "success",
        report,
    }))
}
