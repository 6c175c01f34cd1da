//! dupesweep - concurrent duplicate file finder with safe deletion.
//!
//! dupesweep walks one or more directory trees, content-fingerprints
//! every regular file, groups files by fingerprint, reports groups with
//! more than one member, and can delete all but one member of each
//! group while respecting preserve directories and cleaning up
//! directories left empty by deletion.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod scanner;

use std::io;

use anyhow::Result;

use crate::actions::{retain, RetentionOptions};
use crate::cli::Cli;
use crate::config::Options;
use crate::duplicates::{write_report, DuplicateIndex};
use crate::error::ExitCode;
use crate::scanner::{scan, ScanOptions};

/// Run one dupesweep invocation: scan, report, optionally delete.
///
/// # Errors
///
/// Returns an error only on unexpected failures (for example stdout
/// going away); per-file and per-root scan or deletion failures are
/// reported inline and reflected in the exit code instead.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let options = Options::from_cli(cli);
    log::debug!("Resolved options: {:?}", options);

    let index = DuplicateIndex::new();
    let stats = scan(
        &options.roots,
        &ScanOptions {
            recursive: options.recursive,
            threads: options.threads,
        },
        &index,
    );
    // scan() has joined every worker; the index is frozen from here on.
    log::info!(
        "Scan complete: {} of {} files indexed, {} distinct fingerprints",
        stats.files_indexed,
        stats.files_seen,
        index.len()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&index, options.summary, &mut out)?;

    if options.delete {
        let retention = RetentionOptions {
            preserve_paths: options.preserve_paths.clone(),
            dry_run: options.dry_run,
        };
        let report = retain(&index, &retention, &mut out)?;
        log::info!(
            "Retention complete: {} deleted ({} bytes), {} preserved, {} failed, {} empty directories removed",
            report.deleted_files,
            report.bytes_freed,
            report.skipped_preserved,
            report.failed_deletions,
            report.removed_dirs
        );
    }

    Ok(if stats.had_errors() {
        ExitCode::PartialSuccess
    } else if index.has_duplicates() {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    })
}
