//! Streaming MD5 content fingerprinter.
//!
//! # Overview
//!
//! This module computes the 128-bit content fingerprint used to group
//! files. The file is streamed through the digest in fixed-size chunks,
//! so memory usage is constant regardless of file size.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{fingerprint_file, fingerprint_to_hex};
//! use std::path::Path;
//!
//! let fp = fingerprint_file(Path::new("/path/to/file.txt")).unwrap();
//! println!("{}", fingerprint_to_hex(&fp));
//! ```

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use thiserror::Error;

/// A 128-bit content fingerprint (MD5 digest).
///
/// Two files with identical byte content always produce identical
/// fingerprints; differing content produces differing fingerprints
/// barring a hash collision.
pub type Fingerprint = [u8; 16];

/// Chunk size for streaming reads.
const READ_BUF_SIZE: usize = 64 * 1024;

/// Errors that can occur while fingerprinting a file.
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// The file was not found (may have been deleted mid-scan).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when opening or reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl FingerprintError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Compute the content fingerprint of a file.
///
/// Streams the file through an MD5 digest in 64 KiB chunks. The
/// fingerprint is a deterministic pure function of the file's bytes.
///
/// # Errors
///
/// Returns [`FingerprintError`] if the file cannot be opened or a read
/// fails mid-stream. Callers treat this as a per-file failure, never as
/// a reason to abort the scan.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint, FingerprintError> {
    let mut file = File::open(path).map_err(|e| FingerprintError::from_io(path, e))?;
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];

    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| FingerprintError::from_io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize().into())
}

/// Render a fingerprint as a lowercase hex string.
#[must_use]
pub fn fingerprint_to_hex(fingerprint: &Fingerprint) -> String {
    let mut hex = String::with_capacity(fingerprint.len() * 2);
    for byte in fingerprint {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_known_md5_vector() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "hello.txt", b"hello world");

        let fp = fingerprint_file(&path).unwrap();

        assert_eq!(fingerprint_to_hex(&fp), "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn test_identical_content_identical_fingerprint() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.bin", b"same bytes");
        let b = write_file(&dir, "b.bin", b"same bytes");

        assert_eq!(fingerprint_file(&a).unwrap(), fingerprint_file(&b).unwrap());
    }

    #[test]
    fn test_different_content_different_fingerprint() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.bin", b"first");
        let b = write_file(&dir, "b.bin", b"second");

        assert_ne!(fingerprint_file(&a).unwrap(), fingerprint_file(&b).unwrap());
    }

    #[test]
    fn test_empty_file_fingerprint() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty", b"");

        let fp = fingerprint_file(&path).unwrap();

        // MD5 of the empty input
        assert_eq!(fingerprint_to_hex(&fp), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_large_file_streams() {
        let dir = TempDir::new().unwrap();
        // Bigger than one read buffer so the loop runs more than once.
        let content = vec![0xABu8; READ_BUF_SIZE * 3 + 17];
        let path = write_file(&dir, "large.bin", &content);

        let streamed = fingerprint_file(&path).unwrap();
        let oneshot: Fingerprint = Md5::digest(&content).into();

        assert_eq!(streamed, oneshot);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = fingerprint_file(&missing).unwrap_err();

        assert!(matches!(err, FingerprintError::NotFound(_)));
    }
}
