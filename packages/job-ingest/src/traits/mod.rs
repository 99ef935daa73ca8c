//! Capability traits at the pipeline's seams.
//!
//! - `SourceAdapter`: fetches one source's raw listings
//! - `HttpFetcher` / `PageRenderer`: network capabilities adapters consume
//! - `JobStore`: persistence consumed by the reconciler, sweeper and query

pub mod adapter;
pub mod fetcher;
pub mod store;
