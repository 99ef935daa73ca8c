//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! - Retention sweep on `CLEANUP_CRON`
//! - Full refresh of every source on `REFRESH_CRON`, when configured
//!
//! Scheduled runs go through the same reconciler as the HTTP routes, so a
//! scheduled refresh and a manual one for the same source never overlap.

use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use super::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(
    deps: Arc<ServerDeps>,
    cleanup_cron: &str,
    refresh_cron: Option<&str>,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let cleanup_deps = deps.clone();
    let cleanup_job = Job::new_async(cleanup_cron, move |_uuid, _lock| {
        let deps = cleanup_deps.clone();
        Box::pin(async move {
            match deps.sweeper.sweep().await {
                Ok(report) => tracing::info!(
                    deleted_count = report.deleted_count,
                    cutoff_date = %report.cutoff_date,
                    "Scheduled cleanup complete"
                ),
                Err(e) => tracing::error!("Scheduled cleanup failed: {}", e),
            }
        })
    })?;
    scheduler.add(cleanup_job).await?;

    if let Some(refresh_cron) = refresh_cron {
        let refresh_deps = deps.clone();
        let refresh_job = Job::new_async(refresh_cron, move |_uuid, _lock| {
            let deps = refresh_deps.clone();
            Box::pin(async move {
                let reports = deps.reconciler.run_all(&deps.registry).await;
                let failed = reports.iter().filter(|r| !r.is_success()).count();
                tracing::info!(
                    sources = reports.len(),
                    failed,
                    "Scheduled refresh complete"
                );
            })
        })?;
        scheduler.add(refresh_job).await?;
    }

    scheduler.start().await?;

    tracing::info!(
        cleanup = cleanup_cron,
        refresh = refresh_cron.unwrap_or("disabled"),
        "Scheduled tasks started"
    );
    Ok(scheduler)
}
