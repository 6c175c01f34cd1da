//! Directory walker implementation using jwalk for parallel traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for enumerating the regular
//! files under one scan root. Directories, symbolic links, and special
//! files are skipped silently; unreadable entries are yielded as
//! [`ScanError`] values so the caller can report them without aborting
//! the traversal.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), true);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use jwalk::WalkDir;

use super::{FileEntry, ScanError};

/// Directory walker for file discovery under a single root.
///
/// Uses jwalk for parallel traversal of the directory tree. When
/// `recursive` is false only the direct children of the root are
/// considered.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Whether to descend into subdirectories
    recursive: bool,
}

impl Walker {
    /// Create a new walker for the given root.
    #[must_use]
    pub fn new(root: &Path, recursive: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            recursive,
        }
    }

    /// Walk the root, yielding one entry per regular file.
    ///
    /// Returns an iterator over [`FileEntry`] results. Errors are yielded
    /// as [`ScanError`] values rather than stopping iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        // jwalk skips hidden entries by default; the scan must see
        // every regular file.
        let mut walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(false);

        if !self.recursive {
            walk_dir = walk_dir.max_depth(1);
        }

        walk_dir.into_iter().filter_map(move |entry_result| {
            match entry_result {
                Ok(entry) => {
                    let path = entry.path();

                    // Skip the root directory itself
                    if path == self.root {
                        return None;
                    }

                    let file_type = entry.file_type();

                    // Regular files only; directories and symlinks are
                    // skipped silently, not reported as errors.
                    if file_type.is_dir() || file_type.is_symlink() {
                        return None;
                    }

                    let metadata = match std::fs::symlink_metadata(&path) {
                        Ok(m) => m,
                        Err(e) => return Some(self.handle_metadata_error(&path, e)),
                    };

                    // Sockets, FIFOs, and device nodes fall out here.
                    if !metadata.is_file() {
                        return None;
                    }

                    Some(Ok(file_entry_from_metadata(path, &metadata)))
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    Some(self.handle_jwalk_error(path, e))
                }
            }
        })
    }

    /// Handle failures reading an entry's metadata.
    fn handle_metadata_error(&self, path: &Path, error: io::Error) -> Result<FileEntry, ScanError> {
        match error.kind() {
            io::ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                Err(ScanError::PermissionDenied(path.to_path_buf()))
            }
            io::ErrorKind::NotFound => {
                log::debug!("File vanished during walk: {}", path.display());
                Err(ScanError::NotFound(path.to_path_buf()))
            }
            _ => {
                log::warn!("Metadata unreadable for {}: {}", path.display(), error);
                Err(ScanError::Metadata {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        }
    }

    /// Handle jwalk traversal errors.
    fn handle_jwalk_error(
        &self,
        path: PathBuf,
        error: jwalk::Error,
    ) -> Result<FileEntry, ScanError> {
        log::warn!("Walker error for {}: {}", path.display(), error);
        Err(ScanError::Io {
            path,
            source: io::Error::other(error.to_string()),
        })
    }
}

/// Build a [`FileEntry`] from a path and its metadata.
///
/// Creation time is unsupported on some filesystems; it falls back to the
/// modification time so the entry stays total.
fn file_entry_from_metadata(path: PathBuf, metadata: &Metadata) -> FileEntry {
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    let created = metadata.created().unwrap_or(modified);

    FileEntry {
        path,
        size: metadata.len(),
        created,
        modified,
    }
}
