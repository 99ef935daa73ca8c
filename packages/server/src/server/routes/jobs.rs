use axum::{
    extract::{Extension, Query},
    Json,
};
use job_ingest::Job;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct JobsParams {
    pub company: Option<String>,
}

#[derive(Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<Job>,
}

/// Newest jobs first: `GET /jobs?company=Notion`
pub async fn list_jobs_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<JobsParams>,
) -> Result<Json<JobsResponse>, ApiError> {
    let jobs = state
        .deps
        .query
        .list_jobs(params.company.as_deref())
        .await
        .map_err(ApiError::unavailable)?;

    Ok(Json(JobsResponse { jobs }))
}
