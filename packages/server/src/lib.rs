// Job Board Aggregator - API Core
//
// HTTP surface and scheduling around the job-ingest pipeline.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
