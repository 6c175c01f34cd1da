//! Filesystem actions on a finished duplicate index.
//!
//! The retain module applies the retention policy: per duplicate group
//! it keeps the most recently modified file, deletes the rest (subject
//! to preserve paths and dry-run mode), and afterwards removes
//! directories left empty by deletion.

pub mod retain;

pub use retain::{
    remove_empty_dirs, retain, FileOutcome, RetentionDecision, RetentionOptions, RetentionReport,
};
