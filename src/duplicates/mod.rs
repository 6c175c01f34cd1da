//! Duplicate index and reporting.
//!
//! This module provides:
//! - [`DuplicateIndex`]: the concurrency-safe fingerprint map shared by
//!   all scan workers
//! - [`write_report`]: detailed and summary views over a finished index

pub mod index;
pub mod report;

pub use index::DuplicateIndex;
pub use report::write_report;
