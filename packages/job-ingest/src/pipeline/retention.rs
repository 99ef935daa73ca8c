//! Age-based purge across all sources.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::SweepError;
use crate::traits::store::{JobPredicate, JobStore};

pub const DEFAULT_RETENTION_DAYS: i64 = 50;

/// Result of one sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub deleted_count: usize,
    /// Jobs posted strictly before this instant were deleted.
    pub cutoff_date: DateTime<Utc>,
}

/// Deletes jobs whose `posted_date` is older than the retention window.
///
/// Source-agnostic. Safe to run while refreshes commit: each delete is a
/// single store call.
#[derive(Clone)]
pub struct RetentionSweeper {
    store: Arc<dyn JobStore>,
    max_age: Duration,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self {
            store,
            max_age: Duration::days(DEFAULT_RETENTION_DAYS),
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Sweep with the configured window.
    pub async fn sweep(&self) -> Result<SweepReport, SweepError> {
        self.sweep_at(self.max_age, Utc::now()).await
    }

    /// Delete every job posted before `now - max_age`.
    #[instrument(skip(self), fields(max_age_days = max_age.num_days()))]
    pub async fn sweep_at(
        &self,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<SweepReport, SweepError> {
        if max_age < Duration::zero() {
            return Err(SweepError::NegativeWindow);
        }

        let cutoff_date = now
            .checked_sub_signed(max_age)
            .ok_or(SweepError::WindowTooLarge {
                days: max_age.num_days(),
            })?;
        let deleted_count = self
            .store
            .delete_where(&JobPredicate::posted_before(cutoff_date))
            .await?;

        info!(deleted_count, cutoff_date = %cutoff_date, "Retention sweep complete");

        Ok(SweepReport {
            deleted_count,
            cutoff_date,
        })
    }
}
