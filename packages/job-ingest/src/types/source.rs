//! Source identity.

use serde::{Deserialize, Serialize};
use url::Url;

/// Identity of one job source.
///
/// `tag` scopes the source's snapshot in the store; `company` is the label
/// written on every job; `base_url` resolves relative links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub tag: String,
    pub company: String,
    pub base_url: Url,
}

impl SourceDescriptor {
    pub fn new(tag: impl Into<String>, company: impl Into<String>, base_url: Url) -> Self {
        Self {
            tag: tag.into(),
            company: company.into(),
            base_url,
        }
    }

    /// Build a descriptor from a base URL string.
    pub fn parse(
        tag: impl Into<String>,
        company: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, url::ParseError> {
        Ok(Self::new(tag, company, Url::parse(base_url)?))
    }
}
