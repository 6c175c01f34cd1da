//! Retention-based deletion of duplicate files.
//!
//! # Overview
//!
//! For every duplicate group, [`retain`] keeps the most recently
//! modified file and deletes the rest, subject to preserve-path rules
//! and dry-run mode. Directories left empty by deletion are removed
//! afterwards, again subject to preserve rules.
//!
//! # Safety
//!
//! The kept file of a group is never deleted, preserved files are never
//! deleted, and a failed deletion never aborts the processing of other
//! records or groups. In dry-run mode no filesystem mutation occurs.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::actions::{retain, RetentionOptions};
//! use dupesweep::duplicates::DuplicateIndex;
//!
//! let index = DuplicateIndex::new();
//! // ... populate via a scan ...
//! let options = RetentionOptions {
//!     preserve_paths: vec!["/home/user/originals".into()],
//!     dry_run: true,
//! };
//! let report = retain(&index, &options, &mut std::io::stdout()).unwrap();
//! println!("{} file(s) would be deleted", report.decisions.len());
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::duplicates::DuplicateIndex;
use crate::scanner::FileRecord;

/// Terminal outcome of the retention decision for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Most recently modified member of its group; never deleted.
    Kept,
    /// Under a preserve path; left on disk.
    SkippedPreserved,
    /// Would have been deleted, but this is a dry run.
    WouldDelete,
    /// Deleted (or already gone when the delete ran).
    Deleted,
    /// The delete was attempted and failed.
    DeleteFailed,
}

/// The retention decision for one file record.
#[derive(Debug, Clone)]
pub struct RetentionDecision {
    /// Path the decision applies to
    pub path: PathBuf,
    /// What happened to it
    pub outcome: FileOutcome,
}

/// Configuration for a retention run.
#[derive(Debug, Clone, Default)]
pub struct RetentionOptions {
    /// Directory prefixes whose files are never deleted.
    pub preserve_paths: Vec<PathBuf>,

    /// Log every decision but perform no filesystem mutation.
    pub dry_run: bool,
}

/// Results of a retention run.
#[derive(Debug, Default)]
pub struct RetentionReport {
    /// Per-file decisions across all duplicate groups
    pub decisions: Vec<RetentionDecision>,
    /// Files actually deleted
    pub deleted_files: usize,
    /// Bytes reclaimed by deletion
    pub bytes_freed: u64,
    /// Files skipped because they were preserved
    pub skipped_preserved: usize,
    /// Deletions that failed
    pub failed_deletions: usize,
    /// Empty directories removed by the cleanup pass
    pub removed_dirs: usize,
}

impl RetentionReport {
    fn push(&mut self, record: &FileRecord, outcome: FileOutcome) {
        self.decisions.push(RetentionDecision {
            path: record.path.clone(),
            outcome,
        });
    }

    /// Whether every attempted deletion succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed_deletions == 0
    }
}

/// Apply the retention policy to every duplicate group of a finished
/// index.
///
/// Per group: records are stably sorted by modification time, most
/// recent first (the stable sort keeps the stored order as the
/// tie-break). The first record is kept unconditionally. Every other
/// record is skipped if preserved, logged if `dry_run`, and deleted
/// otherwise. A file that vanished before its delete counts as deleted.
/// Groups are independent transactions: a failure in one never blocks
/// another.
///
/// After all groups, unless `dry_run` is set, directories left empty by
/// deletion are removed via [`remove_empty_dirs`].
///
/// # Errors
///
/// Returns an error only if writing the action log to `out` fails;
/// filesystem failures are reported in the log and the report instead.
pub fn retain<W: Write>(
    index: &DuplicateIndex,
    options: &RetentionOptions,
    out: &mut W,
) -> io::Result<RetentionReport> {
    let mut report = RetentionReport::default();
    let mut cleanup_candidates: BTreeSet<PathBuf> = BTreeSet::new();

    for (_, mut records) in index.duplicate_groups() {
        // Most recently modified first. SystemTime comparison, not a
        // comparison of formatted timestamp strings.
        records.sort_by(|a, b| b.modified.cmp(&a.modified));

        for (i, record) in records.iter().enumerate() {
            if i == 0 {
                writeln!(out, "[+] Kept: {}", record.path.display())?;
                report.push(record, FileOutcome::Kept);
                continue;
            }

            if is_preserved(&record.path, &options.preserve_paths) {
                writeln!(
                    out,
                    "[!] Skipped deletion from preserved directory: {}",
                    record.path.display()
                )?;
                report.skipped_preserved += 1;
                report.push(record, FileOutcome::SkippedPreserved);
            } else if options.dry_run {
                writeln!(out, "[-] Would delete: {}", record.path.display())?;
                report.push(record, FileOutcome::WouldDelete);
            } else {
                match remove_file_if_exists(&record.path) {
                    Ok(()) => {
                        writeln!(out, "[-] Deleted: {}", record.path.display())?;
                        report.deleted_files += 1;
                        report.bytes_freed += record.size;
                        report.push(record, FileOutcome::Deleted);
                        if let Some(parent) = record.path.parent() {
                            cleanup_candidates.insert(parent.to_path_buf());
                        }
                    }
                    Err(e) => {
                        writeln!(out, "Failed to delete: {} ({})", record.path.display(), e)?;
                        log::warn!("Failed to delete {}: {}", record.path.display(), e);
                        report.failed_deletions += 1;
                        report.push(record, FileOutcome::DeleteFailed);
                    }
                }
            }
        }
    }

    if !options.dry_run {
        report.removed_dirs =
            remove_empty_dirs(&cleanup_candidates, &options.preserve_paths, out)?;
    }

    Ok(report)
}

/// Remove directories left empty by deletion.
///
/// Each candidate that still exists and is not preserved has its
/// directory subtree visited deepest-first; every directory that is now
/// empty is removed, each directory checked at most once per pass.
/// A directory that vanished mid-pass is not an error. The pass is
/// idempotent: running it twice on the same candidates has no
/// additional effect.
///
/// Returns the number of directories removed.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub fn remove_empty_dirs<W: Write>(
    candidates: &BTreeSet<PathBuf>,
    preserve_paths: &[PathBuf],
    out: &mut W,
) -> io::Result<usize> {
    let mut checked: BTreeSet<PathBuf> = BTreeSet::new();
    let mut removed = 0usize;

    for candidate in candidates {
        if !candidate.exists() || is_preserved(candidate, preserve_paths) {
            continue;
        }

        // Reverse lexical order puts children before their parents, so a
        // directory that empties out can take its parent with it.
        let mut dirs = collect_dirs(candidate, out)?;
        dirs.sort();
        for dir in dirs.into_iter().rev() {
            if !checked.insert(dir.clone()) {
                continue;
            }
            if is_preserved(&dir, preserve_paths) {
                continue;
            }
            match remove_if_empty(&dir) {
                Ok(true) => {
                    writeln!(out, "Deleted empty directory: {}", dir.display())?;
                    log::info!("Deleted empty directory: {}", dir.display());
                    removed += 1;
                }
                Ok(false) => {}
                Err(e) => report_dir_error(&dir, &e, out)?,
            }
        }
    }

    Ok(removed)
}

/// Collect `root` and every directory below it (symlinks not followed).
fn collect_dirs<W: Write>(root: &Path, out: &mut W) -> io::Result<Vec<PathBuf>> {
    let mut dirs = vec![root.to_path_buf()];
    let mut i = 0;
    while i < dirs.len() {
        match fs::read_dir(&dirs[i]) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                    if is_dir {
                        dirs.push(entry.path());
                    }
                }
            }
            Err(e) => {
                let path = dirs[i].clone();
                report_dir_error(&path, &e, out)?;
            }
        }
        i += 1;
    }
    Ok(dirs)
}

/// Remove `dir` if it has no entries. Returns whether it was removed.
fn remove_if_empty(dir: &Path) -> io::Result<bool> {
    if fs::read_dir(dir)?.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir)?;
    Ok(true)
}

/// Report a directory-cleanup failure without aborting the pass.
fn report_dir_error<W: Write>(path: &Path, error: &io::Error, out: &mut W) -> io::Result<()> {
    match error.kind() {
        // Raced with an earlier removal; nothing to report.
        io::ErrorKind::NotFound => Ok(()),
        io::ErrorKind::PermissionDenied => {
            writeln!(out, "Access denied! Cannot delete: {}", path.display())
        }
        _ => writeln!(
            out,
            "Failed to process directory: {} ({})",
            path.display(),
            error
        ),
    }
}

/// Delete a file, treating an already-missing target as success.
fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Whether `path` lies under any preserve prefix.
fn is_preserved(path: &Path, preserve_paths: &[PathBuf]) -> bool {
    preserve_paths.iter().any(|prefix| path.starts_with(prefix))
}
