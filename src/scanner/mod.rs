//! Scanner module for directory traversal and content fingerprinting.
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: per-root enumeration of regular files
//! - [`hasher`]: streaming MD5 content fingerprinting
//!
//! [`scan`] ties them together: roots fan out across a rayon pool, the
//! files inside each root are fingerprinted in parallel, and every
//! worker appends into one shared [`DuplicateIndex`]. The call returns
//! only once every root has fully joined, after which the index is safe
//! to read.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::duplicates::DuplicateIndex;
//! use dupesweep::scanner::{scan, ScanOptions};
//! use std::path::PathBuf;
//!
//! let index = DuplicateIndex::new();
//! let roots = vec![PathBuf::from("/home/user/docs")];
//! let stats = scan(&roots, &ScanOptions::default(), &index);
//! println!("indexed {} files", stats.files_indexed);
//! ```

pub mod hasher;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use rayon::prelude::*;

pub use hasher::{fingerprint_file, fingerprint_to_hex, Fingerprint, FingerprintError};
pub use walker::Walker;

use crate::duplicates::DuplicateIndex;

/// Metadata for a discovered regular file, before fingerprinting.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Creation time (falls back to modification time where unsupported)
    pub created: SystemTime,
    /// Last modification time
    pub modified: SystemTime,
}

/// One observed regular file with its content fingerprint.
///
/// Created once per file during the scan and immutable thereafter; owned
/// by the [`DuplicateIndex`] entry it is appended to.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Content fingerprint of the file's bytes
    pub fingerprint: Fingerprint,
    /// File size in bytes
    pub size: u64,
    /// Creation time
    pub created: SystemTime,
    /// Last modification time
    pub modified: SystemTime,
}

impl FileRecord {
    /// Combine a discovered entry with its computed fingerprint.
    #[must_use]
    pub fn new(entry: FileEntry, fingerprint: Fingerprint) -> Self {
        Self {
            path: entry.path,
            fingerprint,
            size: entry.size,
            created: entry.created,
            modified: entry.modified,
        }
    }

    /// Creation time rendered in the local timezone.
    #[must_use]
    pub fn created_display(&self) -> String {
        DateTime::<Local>::from(self.created).to_rfc3339()
    }

    /// Modification time rendered in the local timezone.
    #[must_use]
    pub fn modified_display(&self) -> String {
        DateTime::<Local>::from(self.modified).to_rfc3339()
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A file's attributes could not be read.
    #[error("Metadata unreadable for {path}: {source}")]
    Metadata {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Fingerprinting the file's content failed.
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
}

/// Configuration for a scan invocation.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Traverse the full subtree of each root rather than only its
    /// direct children.
    pub recursive: bool,

    /// Worker threads for the scan pool. Zero lets rayon size the pool
    /// from available hardware parallelism.
    pub threads: usize,
}

/// Statistics from one scan invocation.
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Regular files discovered under all roots
    pub files_seen: usize,
    /// Files fingerprinted and appended to the index
    pub files_indexed: usize,
    /// Files skipped because of a per-file failure
    pub failed_files: usize,
    /// Roots that could not be enumerated at all
    pub failed_roots: usize,
    /// Errors encountered during the scan
    pub errors: Vec<ScanError>,
}

impl ScanStats {
    /// Whether any per-file or per-root failure occurred.
    #[must_use]
    pub fn had_errors(&self) -> bool {
        self.failed_files > 0 || self.failed_roots > 0
    }

    /// Merge two stats values, consuming both.
    #[must_use]
    fn merged(mut self, mut other: Self) -> Self {
        self.files_seen += other.files_seen;
        self.files_indexed += other.files_indexed;
        self.failed_files += other.failed_files;
        self.failed_roots += other.failed_roots;
        self.errors.append(&mut other.errors);
        self
    }
}

/// Scan a set of roots, populating the shared index.
///
/// Roots are processed in parallel, and the files within each root are
/// fingerprinted in parallel, on one pool sized by `options.threads`.
/// Every worker appends into `index` through its synchronized append
/// operation.
///
/// A per-file failure (unreadable file, metadata failure, fingerprint
/// failure) is logged, counted, and skipped; it never aborts sibling
/// files or other roots. A root that cannot be enumerated is recorded as
/// a failed root and the remaining roots still run.
///
/// The function returns only after every root's traversal and every
/// file's fingerprinting has finished or failed, so the index is frozen
/// from the caller's point of view once this returns.
pub fn scan(roots: &[PathBuf], options: &ScanOptions, index: &DuplicateIndex) -> ScanStats {
    if roots.is_empty() {
        return ScanStats::default();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()
        .unwrap_or_else(|_| {
            log::warn!(
                "Failed to create scan thread pool, using default with {} threads",
                rayon::current_num_threads()
            );
            rayon::ThreadPoolBuilder::new().build().unwrap()
        });

    log::info!(
        "Scanning {} root(s), recursive={}",
        roots.len(),
        options.recursive
    );

    pool.install(|| {
        roots
            .par_iter()
            .map(|root| scan_root(root, options.recursive, index))
            .reduce(ScanStats::default, ScanStats::merged)
    })
}

/// Scan one root: enumerate its regular files, fingerprint them in
/// parallel, and append each record to the index.
fn scan_root(root: &Path, recursive: bool, index: &DuplicateIndex) -> ScanStats {
    let mut stats = ScanStats::default();

    if let Err(e) = check_root(root) {
        log::error!("Skipping root: {}", e);
        stats.failed_roots += 1;
        stats.errors.push(e);
        return stats;
    }

    let walker = Walker::new(root, recursive);
    let mut entries = Vec::new();
    for item in walker.walk() {
        match item {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                log::warn!("Skipping entry: {}", e);
                stats.failed_files += 1;
                stats.errors.push(e);
            }
        }
    }
    stats.files_seen = entries.len();

    log::debug!("{}: {} regular files discovered", root.display(), stats.files_seen);

    // Fan out fingerprinting across the pool; successful workers append
    // straight into the shared index, failures come back for the stats.
    let failures: Vec<ScanError> = entries
        .into_par_iter()
        .filter_map(|entry| match fingerprint_file(&entry.path) {
            Ok(fingerprint) => {
                let record = FileRecord::new(entry, fingerprint);
                log::debug!(
                    "{} :: {} :: {} :: {}",
                    record.path.display(),
                    fingerprint_to_hex(&record.fingerprint),
                    record.size,
                    record.created_display()
                );
                index.append(record.fingerprint, record);
                None
            }
            Err(e) => {
                log::warn!("Skipping file: {}", e);
                Some(ScanError::from(e))
            }
        })
        .collect();

    stats.files_indexed = stats.files_seen - failures.len();
    stats.failed_files += failures.len();
    stats.errors.extend(failures);
    stats
}

/// Verify that a root is an enumerable directory.
fn check_root(root: &Path) -> Result<(), ScanError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::NotADirectory(root.to_path_buf())),
        Err(e) => Err(match e.kind() {
            io::ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
            io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(root.to_path_buf()),
            _ => ScanError::Io {
                path: root.to_path_buf(),
                source: e,
            },
        }),
    }
}
