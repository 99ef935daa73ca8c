// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::{kernel::start_scheduler, kernel::ServerDeps, server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,job_ingest=debug,server_core=debug,server=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Job Board Aggregator API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let deps = Arc::new(
        ServerDeps::from_config(&config)
            .await
            .context("Failed to build server dependencies")?,
    );

    // Keep the scheduler alive for the lifetime of the server
    let _scheduler = start_scheduler(
        deps.clone(),
        &config.cleanup_cron,
        config.refresh_cron.as_deref(),
    )
    .await
    .context("Failed to start scheduled tasks")?;

    let app = build_app(deps, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
