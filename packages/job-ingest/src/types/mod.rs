//! Domain types shared by every stage of the pipeline.

pub mod job;
pub mod raw;
pub mod source;
