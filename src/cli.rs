//! Command-line interface definitions for dupesweep.
//!
//! This is a thin, config-only layer: it parses flags into a [`Cli`]
//! value that the application converts into one immutable
//! [`crate::config::Options`] before any scanning starts.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates under two trees, recursively
//! dupesweep -r ~/documents ~/backups
//!
//! # Only list the directories that contain duplicates
//! dupesweep -rs ~/documents
//!
//! # Delete duplicates, preserving one tree, previewing first
//! dupesweep -rd -n -p ~/originals ~/documents
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Concurrent duplicate file finder with retention-based safe deletion.
///
/// dupesweep fingerprints every regular file under the given roots,
/// groups files by content, reports groups with more than one member,
/// and can delete all but the most recently modified member of each
/// group.
#[derive(Debug, Parser)]
#[command(name = "dupesweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan for duplicate files
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Print only the directories that contain duplicates
    #[arg(short, long)]
    pub summary: bool,

    /// Delete all but the most recently modified file in each group
    #[arg(short, long)]
    pub delete: bool,

    /// Log every deletion decision without touching the filesystem
    #[arg(short = 'n', long, requires = "delete")]
    pub dry_run: bool,

    /// Directory prefix whose files are never deleted (repeatable)
    #[arg(short, long = "preserve", value_name = "PATH")]
    pub preserve_paths: Vec<PathBuf>,

    /// Worker threads for scanning (0 = available CPU cores)
    #[arg(long, value_name = "N", default_value = "0")]
    pub threads: usize,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
