//! Source adapters.
//!
//! Three shapes cover every source: a single JSON document
//! ([`JsonFeedAdapter`], with [`GreenhouseBoard`] as a preset), a paged
//! search API ([`PagedSearchAdapter`]) and a page that must be rendered in
//! a browser ([`RenderedListingAdapter`]).

pub mod builtin;
pub mod greenhouse;
pub mod json_feed;
pub mod mapping;
pub mod paged_search;
pub mod rendered;

pub use builtin::builtin_sources;
pub use greenhouse::GreenhouseBoard;
pub use json_feed::{JsonFeedAdapter, JsonFeedSpec};
pub use mapping::{FieldMapping, LinkStrategy};
pub use paged_search::{PagedSearchAdapter, PagedSearchSpec};
pub use rendered::{extract_listings, ListingSelectors, RenderedListingAdapter};
