//! Concurrency-safe fingerprint index.
//!
//! # Overview
//!
//! [`DuplicateIndex`] maps a content fingerprint to the ordered list of
//! file records sharing it. All scan workers mutate one shared instance
//! through [`DuplicateIndex::append`]; the map is sharded internally so
//! concurrent appends under different fingerprints do not contend, while
//! appends under the same fingerprint serialize on that key's shard.
//!
//! Once scanning has joined, the index is read-only by convention and
//! the group accessors are safe for any number of readers.

use dashmap::DashMap;

use crate::scanner::{FileRecord, Fingerprint};

/// Mapping from fingerprint to the ordered sequence of files sharing it.
///
/// Insertion order within one key is "first worker to finish that file
/// first" and is not deterministic across runs; callers must not depend
/// on it except as the retention tie-break.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    map: DashMap<Fingerprint, Vec<FileRecord>>,
}

impl DuplicateIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    /// Atomically append `record` to the list keyed by `fingerprint`,
    /// creating the list if absent.
    ///
    /// Safe under arbitrarily many concurrent callers, including the
    /// same fingerprint from multiple callers at once: the entry API
    /// holds the key's shard lock for the whole append, so no append is
    /// lost and per-key ordering is never torn.
    pub fn append(&self, fingerprint: Fingerprint, record: FileRecord) {
        self.map.entry(fingerprint).or_default().push(record);
    }

    /// Number of distinct fingerprints observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if nothing has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Total number of file records across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.map.iter().map(|entry| entry.value().len()).sum()
    }

    /// Whether any group has two or more members.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.map.iter().any(|entry| entry.value().len() > 1)
    }

    /// All groups, duplicates or not. Intended for use after scanning
    /// has joined.
    #[must_use]
    pub fn groups(&self) -> Vec<(Fingerprint, Vec<FileRecord>)> {
        self.map
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    /// Groups with two or more members, sorted by fingerprint so
    /// downstream output is stable.
    #[must_use]
    pub fn duplicate_groups(&self) -> Vec<(Fingerprint, Vec<FileRecord>)> {
        let mut groups: Vec<_> = self
            .map
            .iter()
            .filter(|entry| entry.value().len() > 1)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;
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

    #[test]
    fn test_append_creates_and_extends_groups() {
        let index = DuplicateIndex::new();
        let fp = [1u8; 16];

        index.append(fp, record("/a", fp));
        index.append(fp, record("/b", fp));
        index.append([2u8; 16], record("/c", [2u8; 16]));

        assert_eq!(index.len(), 2);
        assert_eq!(index.file_count(), 3);
        assert!(index.has_duplicates());

        let dupes = index.duplicate_groups();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].1.len(), 2);
    }

    #[test]
    fn test_append_preserves_per_key_order() {
        let index = DuplicateIndex::new();
        let fp = [3u8; 16];

        for i in 0..5 {
            index.append(fp, record(&format!("/f{i}"), fp));
        }

        let groups = index.groups();
        let paths: Vec<_> = groups[0].1.iter().map(|r| r.path.clone()).collect();
        assert_eq!(
            paths,
            (0..5)
                .map(|i| PathBuf::from(format!("/f{i}")))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_no_duplicates_when_all_unique() {
        let index = DuplicateIndex::new();
        index.append([1u8; 16], record("/a", [1u8; 16]));
        index.append([2u8; 16], record("/b", [2u8; 16]));

        assert!(!index.has_duplicates());
        assert!(index.duplicate_groups().is_empty());
        assert_eq!(index.groups().len(), 2);
    }

    #[test]
    fn test_duplicate_groups_sorted_by_fingerprint() {
        let index = DuplicateIndex::new();
        for fp in [[9u8; 16], [1u8; 16], [5u8; 16]] {
            index.append(fp, record("/x", fp));
            index.append(fp, record("/y", fp));
        }

        let fingerprints: Vec<_> = index.duplicate_groups().into_iter().map(|g| g.0).collect();
        assert_eq!(fingerprints, vec![[1u8; 16], [5u8; 16], [9u8; 16]]);
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let index = Arc::new(DuplicateIndex::new());
        let threads = 8;
        let appends_per_thread = 200;
        // Every thread hammers the same two fingerprints.
        let shared = [[7u8; 16], [8u8; 16]];

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let index = Arc::clone(&index);
                std::thread::spawn(move || {
                    for i in 0..appends_per_thread {
                        let fp = shared[i % 2];
                        index.append(fp, record(&format!("/t{t}/f{i}"), fp));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(index.file_count(), threads * appends_per_thread);
        assert_eq!(index.len(), 2);
    }
}
