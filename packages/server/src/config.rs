use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound on the retention window, about a century.
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Enables sources that need a headless browser
    pub firecrawl_api_key: Option<String>,
    pub fetch_timeout: Duration,
    /// Pause between pages of a paged source
    pub page_delay: Duration,
    pub retention_days: i64,
    pub cleanup_cron: String,
    /// Refresh every source on this schedule when set
    pub refresh_cron: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let retention_days: i64 = parse_or(var("RETENTION_DAYS"), 50)
            .context("RETENTION_DAYS must be a number of days")?;
        anyhow::ensure!(
            (0..=MAX_RETENTION_DAYS).contains(&retention_days),
            "RETENTION_DAYS must be between 0 and {}, got {}",
            MAX_RETENTION_DAYS,
            retention_days
        );

        Ok(Self {
            database_url: var("DATABASE_URL"),
            port: parse_or(var("PORT"), 5000).context("PORT must be a valid number")?,
            allowed_origins: var("ALLOWED_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            firecrawl_api_key: var("FIRECRAWL_API_KEY"),
            fetch_timeout: Duration::from_secs(
                parse_or(var("FETCH_TIMEOUT_SECS"), 90)
                    .context("FETCH_TIMEOUT_SECS must be a number of seconds")?,
            ),
            page_delay: Duration::from_secs(
                parse_or(var("PAGE_DELAY_SECS"), 2)
                    .context("PAGE_DELAY_SECS must be a number of seconds")?,
            ),
            retention_days,
            cleanup_cron: var("CLEANUP_CRON").unwrap_or_else(|| "0 0 3 * * *".to_string()),
            refresh_cron: var("REFRESH_CRON"),
        })
    }
}

fn parse_or<T>(value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => Ok(raw.trim().parse()?),
        None => Ok(default),
    }
}
