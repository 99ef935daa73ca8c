//! Raw listings as produced by source adapters, before normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields of a raw record, used to report type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawField {
    Title,
    Link,
    Location,
    Description,
    PostedDate,
    JobId,
}

impl RawField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RawField::Title => "title",
            RawField::Link => "link",
            RawField::Location => "location",
            RawField::Description => "description",
            RawField::PostedDate => "posted_date",
            RawField::JobId => "job_id",
        }
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One listing as an adapter saw it.
///
/// Everything is optional and untrimmed; `link` may be relative. Fields that
/// were present upstream but had the wrong type are left `None` and recorded
/// in `mismatched` so the normalizer can reject the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub title: Option<String>,
    pub link: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub posted_date: Option<String>,
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mismatched: Vec<RawField>,
}

impl RawRecord {
    /// Create a record with a title and a link.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            link: Some(link.into()),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_posted_date(mut self, posted_date: impl Into<String>) -> Self {
        self.posted_date = Some(posted_date.into());
        self
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    /// Record that `field` was present but had an unusable type.
    pub fn mark_mismatched(&mut self, field: RawField) {
        if !self.mismatched.contains(&field) {
            self.mismatched.push(field);
        }
    }

    pub fn is_mismatched(&self, field: RawField) -> bool {
        self.mismatched.contains(&field)
    }
}
