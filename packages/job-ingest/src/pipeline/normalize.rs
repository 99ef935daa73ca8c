//! Raw record → canonical job.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;
use url::Url;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::types::{
    job::{Job, DEFAULT_LOCATION},
    raw::RawRecord,
    source::SourceDescriptor,
};

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A record the normalizer refused, with its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRecord {
    pub index: usize,
    pub reason: ValidationError,
}

/// Output of [`Normalizer::normalize_batch`].
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub jobs: Vec<Job>,
    pub dropped: Vec<DroppedRecord>,
}

/// Validates and canonicalizes raw records for one source.
pub struct Normalizer<'a> {
    descriptor: &'a SourceDescriptor,
}

impl<'a> Normalizer<'a> {
    pub fn new(descriptor: &'a SourceDescriptor) -> Self {
        Self { descriptor }
    }

    /// Turn one raw record into a job.
    ///
    /// `ingested_at` stands in for a missing or unparseable posted date.
    pub fn normalize(
        &self,
        raw: &RawRecord,
        ingested_at: DateTime<Utc>,
    ) -> Result<Job, ValidationError> {
        if let Some(&field) = raw.mismatched.first() {
            return Err(ValidationError::WrongType { field });
        }

        let title = optional_text(raw.title.as_deref()).ok_or(ValidationError::MissingTitle)?;
        let link = optional_text(raw.link.as_deref()).ok_or(ValidationError::MissingLink)?;
        let link = resolve_link(&self.descriptor.base_url, link)?;

        let location = optional_text(raw.location.as_deref())
            .unwrap_or(DEFAULT_LOCATION)
            .to_string();
        let description = optional_text(raw.description.as_deref()).map(str::to_string);
        let posted_date = raw
            .posted_date
            .as_deref()
            .map(|s| parse_posted_date(s, ingested_at))
            .unwrap_or(ingested_at);
        let job_id = optional_text(raw.job_id.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Job {
            job_id,
            title: title.to_string(),
            company: self.descriptor.company.clone(),
            location,
            link,
            description,
            posted_date,
            source: self.descriptor.tag.clone(),
        })
    }

    /// Normalize every record, keeping the valid ones in input order.
    ///
    /// Invalid records are logged and reported in `dropped`; they never fail
    /// the batch.
    pub fn normalize_batch(&self, raw: &[RawRecord], ingested_at: DateTime<Utc>) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();

        for (index, record) in raw.iter().enumerate() {
            match self.normalize(record, ingested_at) {
                Ok(job) => batch.jobs.push(job),
                Err(reason) => {
                    warn!(
                        source = %self.descriptor.tag,
                        index,
                        title = record.title.as_deref().unwrap_or(""),
                        link = record.link.as_deref().unwrap_or(""),
                        reason = %reason,
                        "Dropped job record"
                    );
                    batch.dropped.push(DroppedRecord { index, reason });
                }
            }
        }

        batch
    }
}

fn optional_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Make `link` an absolute http(s) URL.
///
/// Absolute links are kept verbatim (after trimming); relative ones are
/// joined onto `base`.
pub fn resolve_link(base: &Url, link: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidLink {
        link: link.to_string(),
    };

    match Url::parse(link) {
        Ok(url) if is_http(&url) => Ok(link.to_string()),
        Ok(_) => Err(invalid()),
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(link)
            .ok()
            .filter(is_http)
            .map(String::from)
            .ok_or_else(invalid),
        Err(_) => Err(invalid()),
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host().is_some()
}

/// Parse a posted date, falling back to `ingested_at`.
pub fn parse_posted_date(value: &str, ingested_at: DateTime<Utc>) -> DateTime<Utc> {
    try_parse_posted_date(value).unwrap_or(ingested_at)
}

/// RFC 3339, then a naive date-time taken as UTC, then a plain date.
pub fn try_parse_posted_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
