//! Mapping JSON listing objects onto raw records.
//!
//! Field locations are JSON pointers (RFC 6901) relative to one listing
//! object, e.g. `/location/name` or `/properties/locations/0`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::raw::{RawField, RawRecord};

/// Placeholder replaced by the listing id in link templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// How the posting link is derived from a listing object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkStrategy {
    /// Read the link from a field.
    Field { pointer: String },
    /// Substitute an id field into a URL template containing `{id}`.
    Template { id_pointer: String, template: String },
}

/// Where each raw field lives inside a listing object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub title: String,
    pub link: LinkStrategy,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
}

impl FieldMapping {
    /// Mapping with a title pointer and a link strategy; everything else unset.
    pub fn new(title: impl Into<String>, link: LinkStrategy) -> Self {
        Self {
            title: title.into(),
            link,
            location: None,
            description: None,
            posted_date: None,
            job_id: None,
        }
    }

    pub fn with_location(mut self, pointer: impl Into<String>) -> Self {
        self.location = Some(pointer.into());
        self
    }

    pub fn with_description(mut self, pointer: impl Into<String>) -> Self {
        self.description = Some(pointer.into());
        self
    }

    pub fn with_posted_date(mut self, pointer: impl Into<String>) -> Self {
        self.posted_date = Some(pointer.into());
        self
    }

    pub fn with_job_id(mut self, pointer: impl Into<String>) -> Self {
        self.job_id = Some(pointer.into());
        self
    }

    /// Extract one raw record from a listing object.
    pub fn extract(&self, listing: &Value) -> RawRecord {
        let mut raw = RawRecord::default();

        raw.title = take(&mut raw, RawField::Title, text_at(listing, &self.title));

        raw.link = match &self.link {
            LinkStrategy::Field { pointer } => {
                take(&mut raw, RawField::Link, text_at(listing, pointer))
            }
            LinkStrategy::Template {
                id_pointer,
                template,
            } => take(&mut raw, RawField::Link, id_at(listing, id_pointer))
                .filter(|id| !id.trim().is_empty())
                .map(|id| template.replace(ID_PLACEHOLDER, id.trim())),
        };

        if let Some(pointer) = &self.location {
            raw.location = take(&mut raw, RawField::Location, text_at(listing, pointer));
        }
        if let Some(pointer) = &self.description {
            raw.description = take(&mut raw, RawField::Description, text_at(listing, pointer));
        }
        if let Some(pointer) = &self.posted_date {
            raw.posted_date = take(&mut raw, RawField::PostedDate, text_at(listing, pointer));
        }
        if let Some(pointer) = &self.job_id {
            raw.job_id = take(&mut raw, RawField::JobId, id_at(listing, pointer));
        }

        raw
    }
}

/// A field read out of a listing object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Extracted {
    Absent,
    Text(String),
    Mismatch,
}

fn take(raw: &mut RawRecord, field: RawField, extracted: Extracted) -> Option<String> {
    match extracted {
        Extracted::Absent => None,
        Extracted::Text(text) => Some(text),
        Extracted::Mismatch => {
            raw.mark_mismatched(field);
            None
        }
    }
}

/// Where a pointer landed inside a listing.
enum Lookup<'a> {
    Found(&'a Value),
    Missing,
    /// An intermediate segment exists but cannot be descended into.
    Blocked,
}

fn lookup<'a>(value: &'a Value, pointer: &str) -> Lookup<'a> {
    if let Some(found) = value.pointer(pointer) {
        return Lookup::Found(found);
    }
    let Some(path) = pointer.strip_prefix('/') else {
        return Lookup::Missing;
    };

    let mut current = value;
    for token in path.split('/') {
        let token = token.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Object(map) => match map.get(&token) {
                Some(next) => next,
                None => return Lookup::Missing,
            },
            Value::Array(items) => match token.parse::<usize>() {
                Ok(index) => match items.get(index) {
                    Some(next) => next,
                    None => return Lookup::Missing,
                },
                Err(_) => return Lookup::Blocked,
            },
            Value::Null => return Lookup::Missing,
            _ => return Lookup::Blocked,
        };
    }
    Lookup::Missing
}

/// A string field. Null or missing is absent; any other type is a mismatch,
/// including a scalar sitting where the pointer expects an object.
pub(crate) fn text_at(value: &Value, pointer: &str) -> Extracted {
    match lookup(value, pointer) {
        Lookup::Missing | Lookup::Found(Value::Null) => Extracted::Absent,
        Lookup::Found(Value::String(s)) => Extracted::Text(s.clone()),
        Lookup::Found(_) | Lookup::Blocked => Extracted::Mismatch,
    }
}

/// An identifier field. Strings and integers are accepted.
pub(crate) fn id_at(value: &Value, pointer: &str) -> Extracted {
    match lookup(value, pointer) {
        Lookup::Missing | Lookup::Found(Value::Null) => Extracted::Absent,
        Lookup::Found(Value::String(s)) => Extracted::Text(s.clone()),
        Lookup::Found(Value::Number(n)) if n.is_i64() || n.is_u64() => {
            Extracted::Text(n.to_string())
        }
        Lookup::Found(_) | Lookup::Blocked => Extracted::Mismatch,
    }
}

/// The listings array at `pointer` inside a payload.
pub(crate) fn listings_at<'a>(payload: &'a Value, pointer: &str) -> Option<&'a Vec<Value>> {
    payload.pointer(pointer).and_then(Value::as_array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn greenhouse_mapping() -> FieldMapping {
        FieldMapping::new(
            "/title",
            LinkStrategy::Field {
                pointer: "/absolute_url".to_string(),
            },
        )
        .with_location("/location/name")
        .with_job_id("/id")
    }

    #[test]
    fn test_extract_reads_nested_fields() {
        let listing = json!({
            "id": 4012,
            "title": "Support Engineer",
            "absolute_url": "https://boards.greenhouse.io/intercom/jobs/4012",
            "location": {"name": "Dublin"}
        });

        let raw = greenhouse_mapping().extract(&listing);

        assert_eq!(raw.title.as_deref(), Some("Support Engineer"));
        assert_eq!(
            raw.link.as_deref(),
            Some("https://boards.greenhouse.io/intercom/jobs/4012")
        );
        assert_eq!(raw.location.as_deref(), Some("Dublin"));
        assert_eq!(raw.job_id.as_deref(), Some("4012"));
        assert!(raw.mismatched.is_empty());
    }

    #[test]
    fn test_template_link_uses_id() {
        let mapping = FieldMapping::new(
            "/title",
            LinkStrategy::Template {
                id_pointer: "/id".to_string(),
                template: "https://boards.greenhouse.io/notion/jobs/{id}".to_string(),
            },
        );

        let raw = mapping.extract(&json!({"id": "42", "title": "Engineer"}));
        assert_eq!(
            raw.link.as_deref(),
            Some("https://boards.greenhouse.io/notion/jobs/42")
        );

        let missing = mapping.extract(&json!({"title": "Engineer"}));
        assert_eq!(missing.link, None);
        assert!(missing.mismatched.is_empty());
    }

    #[test]
    fn test_wrong_types_are_recorded() {
        let listing = json!({
            "title": {"text": "Engineer"},
            "absolute_url": 17,
            "location": ["Oslo"]
        });

        let raw = greenhouse_mapping().extract(&listing);

        assert_eq!(raw.title, None);
        assert_eq!(raw.link, None);
        assert_eq!(raw.location, None);
        assert!(raw.is_mismatched(RawField::Title));
        assert!(raw.is_mismatched(RawField::Link));
        assert!(raw.is_mismatched(RawField::Location));
    }

    #[test]
    fn test_scalar_in_place_of_object_is_mismatch() {
        let raw = greenhouse_mapping().extract(&json!({
            "title": "Engineer",
            "absolute_url": "https://x/1",
            "location": "Dublin"
        }));

        assert_eq!(raw.location, None);
        assert!(raw.is_mismatched(RawField::Location));
    }

    #[test]
    fn test_missing_key_in_object_is_absent() {
        let raw = greenhouse_mapping().extract(&json!({
            "title": "Engineer",
            "absolute_url": "https://x/1",
            "location": {"city": "Dublin"}
        }));

        assert_eq!(raw.location, None);
        assert!(raw.mismatched.is_empty());
    }

    #[test]
    fn test_null_is_absent_not_mismatch() {
        let raw = greenhouse_mapping().extract(&json!({
            "title": "Engineer",
            "absolute_url": "https://x/1",
            "location": null
        }));

        assert_eq!(raw.location, None);
        assert!(raw.mismatched.is_empty());
    }

    #[test]
    fn test_array_index_pointer() {
        let mapping = FieldMapping::new(
            "/title",
            LinkStrategy::Field {
                pointer: "/url".to_string(),
            },
        )
        .with_location("/properties/locations/0");

        let raw = mapping.extract(&json!({
            "title": "PM",
            "url": "https://x/1",
            "properties": {"locations": ["Redmond, Washington, United States", "Remote"]}
        }));

        assert_eq!(
            raw.location.as_deref(),
            Some("Redmond, Washington, United States")
        );
    }
}
