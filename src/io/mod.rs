//! Input helpers.
//!
//! - survey CSV ingest + validation (`ingest`)

pub mod ingest;

pub use ingest::*;
