//! Duplicate report rendering.
//!
//! Two modes over a finished [`DuplicateIndex`], both pure reads:
//! a detailed per-group listing with `[+]`/`[-]` markers, and a summary
//! of the directories that contain duplicates. The `[+]` marker in the
//! detailed listing flags the first record in the group's stored order;
//! it is presentational only and says nothing about which file a later
//! deletion pass would keep.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::scanner::fingerprint_to_hex;

use super::DuplicateIndex;

/// Write a duplicate report for a finished index.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub fn write_report<W: Write>(
    index: &DuplicateIndex,
    summary_only: bool,
    out: &mut W,
) -> io::Result<()> {
    if summary_only {
        write_summary(index, out)
    } else {
        write_detailed(index, out)
    }
}

/// Per-group listing: fingerprint header, then one line per member.
fn write_detailed<W: Write>(index: &DuplicateIndex, out: &mut W) -> io::Result<()> {
    for (fingerprint, records) in index.duplicate_groups() {
        writeln!(out, "Duplicates for hash {}:", fingerprint_to_hex(&fingerprint))?;
        for (i, record) in records.iter().enumerate() {
            let marker = if i == 0 { "[+]" } else { "[-]" };
            writeln!(out, "{} {}", marker, record.path.display())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Deduplicated parent directories of every duplicate-group member.
fn write_summary<W: Write>(index: &DuplicateIndex, out: &mut W) -> io::Result<()> {
    let mut directories: BTreeSet<PathBuf> = BTreeSet::new();
    for (_, records) in index.duplicate_groups() {
        for record in &records {
            if let Some(parent) = record.path.parent() {
                directories.insert(parent.to_path_buf());
            }
        }
    }

    writeln!(out, "Directories containing duplicates:")?;
    for directory in directories {
        writeln!(out, "{}", directory.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{FileRecord, Fingerprint};
    use std::time::SystemTime;

    fn record(path: &str, fingerprint: Fingerprint) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            fingerprint,
            size: 10,
            created: SystemTime::UNIX_EPOCH,
            modified: SystemTime::UNIX_EPOCH,
        }
    }

    fn sample_index() -> DuplicateIndex {
        let index = DuplicateIndex::new();
        let fp = [0xAAu8; 16];
        index.append(fp, record("/d/a.txt", fp));
        index.append(fp, record("/d/sub/b.txt", fp));
        // a unique file that must not be reported
        index.append([1u8; 16], record("/d/c.txt", [1u8; 16]));
        index
    }

    fn render(index: &DuplicateIndex, summary: bool) -> String {
        let mut buf = Vec::new();
        write_report(index, summary, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_detailed_marks_first_kept_rest_duplicate() {
        let output = render(&sample_index(), false);

        assert!(output.contains(&format!(
            "Duplicates for hash {}:",
            fingerprint_to_hex(&[0xAAu8; 16])
        )));
        assert_eq!(output.matches("[+]").count(), 1);
        assert_eq!(output.matches("[-]").count(), 1);
        assert!(!output.contains("/d/c.txt"));
    }

    #[test]
    fn test_detailed_kept_marker_is_first_stored_record() {
        let output = render(&sample_index(), false);

        assert!(output.contains("[+] /d/a.txt"));
        assert!(output.contains("[-] /d/sub/b.txt"));
    }

    #[test]
    fn test_summary_lists_each_directory_once() {
        let index = sample_index();
        // second group in the same directories
        let fp = [0xBBu8; 16];
        index.append(fp, record("/d/x.txt", fp));
        index.append(fp, record("/d/y.txt", fp));

        let output = render(&index, true);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Directories containing duplicates:");
        assert_eq!(
            lines[1..].iter().filter(|l| **l == "/d").count(),
            1,
            "each directory is printed once"
        );
        assert!(lines[1..].contains(&"/d/sub"));
    }

    #[test]
    fn test_empty_index_report() {
        let index = DuplicateIndex::new();

        assert!(render(&index, false).is_empty());
        assert_eq!(
            render(&index, true),
            "Directories containing duplicates:\n"
        );
    }
}
