//! Immutable run configuration.
//!
//! The CLI layer produces one [`Options`] value here, and the rest of
//! the application receives it explicitly; nothing in the core reads
//! ambient or global configuration.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Everything one invocation needs, resolved up front.
#[derive(Debug, Clone)]
pub struct Options {
    /// Root directories to scan, canonicalized where possible
    pub roots: Vec<PathBuf>,
    /// Traverse full subtrees rather than direct children only
    pub recursive: bool,
    /// Report directories containing duplicates instead of per-group detail
    pub summary: bool,
    /// Run the retention deleter after reporting
    pub delete: bool,
    /// Compute and log deletions without mutating the filesystem
    pub dry_run: bool,
    /// Directory prefixes whose files are never deleted
    pub preserve_paths: Vec<PathBuf>,
    /// Scan pool size (0 = available CPU cores)
    pub threads: usize,
}

impl Options {
    /// Build the run configuration from parsed CLI arguments.
    ///
    /// Roots and preserve paths are canonicalized so that record paths
    /// are absolute and preserve-prefix matching is reliable. A root
    /// that fails to canonicalize is kept as given; the scanner reports
    /// it as a failed root without blocking the others.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            roots: cli.paths.iter().map(|p| normalize(p)).collect(),
            recursive: cli.recursive,
            summary: cli.summary,
            delete: cli.delete,
            dry_run: cli.dry_run,
            preserve_paths: cli.preserve_paths.iter().map(|p| normalize(p)).collect(),
            threads: cli.threads,
        }
    }
}

/// Canonicalize a path, falling back to it unchanged if resolution
/// fails (missing path, permission error).
fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_options_carry_cli_flags() {
        let cli = Cli::try_parse_from(["dupesweep", "-rsd", "--threads", "2", "/missing/root"])
            .unwrap();
        let options = Options::from_cli(&cli);

        assert!(options.recursive);
        assert!(options.summary);
        assert!(options.delete);
        assert!(!options.dry_run);
        assert_eq!(options.threads, 2);
        // unresolvable path passes through unchanged
        assert_eq!(options.roots, vec![PathBuf::from("/missing/root")]);
    }

    #[test]
    fn test_existing_roots_become_absolute() {
        let dir = TempDir::new().unwrap();
        let cli =
            Cli::try_parse_from(["dupesweep", dir.path().to_str().unwrap()]).unwrap();
        let options = Options::from_cli(&cli);

        assert!(options.roots[0].is_absolute());
        assert_eq!(options.roots[0], fs::canonicalize(dir.path()).unwrap());
    }
}
