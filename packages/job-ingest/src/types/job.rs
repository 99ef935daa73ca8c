//! The canonical job record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Location used when a source omits one.
pub const DEFAULT_LOCATION: &str = "Remote";

/// A normalized job posting as persisted in the store.
///
/// `link` is the identity: two jobs with the same link are the same job,
/// whichever source produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Source-assigned id when available, otherwise a generated token.
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Absolute URL of the posting. Dedup key.
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub posted_date: DateTime<Utc>,
    /// Tag of the adapter that produced this record.
    pub source: String,
}

impl Job {
    /// Dedup key of this job.
    pub fn key(&self) -> &str {
        &self.link
    }
}
