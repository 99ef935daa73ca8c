//! Server dependencies shared by routes and scheduled tasks.

use anyhow::{Context, Result};
use std::sync::Arc;

use job_ingest::{
    FirecrawlRenderer, JobQuery, JobStore, MemoryStore, PageRenderer, PostgresStore, Reconciler,
    ReconcilerConfig, ReqwestFetcher, RetentionSweeper, SourceRegistry,
};

use crate::config::Config;

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn JobStore>,
    pub registry: Arc<SourceRegistry>,
    pub reconciler: Arc<Reconciler>,
    pub sweeper: RetentionSweeper,
    pub query: JobQuery,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn JobStore>,
        registry: SourceRegistry,
        reconciler_config: ReconcilerConfig,
        retention: chrono::Duration,
    ) -> Self {
        Self {
            reconciler: Arc::new(Reconciler::with_config(store.clone(), reconciler_config)),
            sweeper: RetentionSweeper::new(store.clone()).with_max_age(retention),
            query: JobQuery::new(store.clone()),
            registry: Arc::new(registry),
            store,
        }
    }

    /// Connect the store and register the built-in sources.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn JobStore> = match &config.database_url {
            Some(url) => {
                tracing::info!("Connecting to job store...");
                let store = PostgresStore::new(url)
                    .await
                    .context("Failed to connect to database")?;
                tracing::info!("Job store connected");
                Arc::new(store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, jobs are kept in memory only");
                Arc::new(MemoryStore::new())
            }
        };

        let fetcher = ReqwestFetcher::with_timeout(config.fetch_timeout)
            .context("Failed to build HTTP client")?;

        let renderer: Option<Arc<dyn PageRenderer>> = match &config.firecrawl_api_key {
            Some(key) => Some(Arc::new(
                FirecrawlRenderer::new(key.clone()).context("Failed to build Firecrawl client")?,
            )),
            None => {
                tracing::info!("FIRECRAWL_API_KEY not set, rendered sources disabled");
                None
            }
        };

        let registry = SourceRegistry::builtin(Arc::new(fetcher), renderer, config.page_delay)
            .context("Invalid built-in source URL")?;
        tracing::info!(sources = ?registry.tags(), "Sources registered");

        Ok(Self::new(
            store,
            registry,
            ReconcilerConfig {
                fetch_timeout: config.fetch_timeout,
            },
            chrono::Duration::try_days(config.retention_days)
                .context("RETENTION_DAYS out of range")?,
        ))
    }
}
