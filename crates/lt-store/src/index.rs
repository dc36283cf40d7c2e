//! Content index: host → known dates, rebuilt by full scan.
//!
//! The index is a derived, ephemeral view. Every call walks all three
//! artifact roots, so cost is O(total files) per request; nothing is
//! cached or persisted between calls.

use crate::error::{Result, StoreError};
use crate::store::{ArtifactStore, ARTIFACT_ROOTS};
use lt_common::LOGS_SUFFIX;
use std::collections::BTreeMap;
use tracing::debug;
use walkdir::WalkDir;

/// Mapping from host name to the dates with known log artifacts.
///
/// Dates carry no ordering guarantee; duplicates are suppressed.
pub type HostIndex = BTreeMap<String, Vec<String>>;

/// Full-scan index builder over an artifact store.
pub struct ContentIndex<'a> {
    store: &'a ArtifactStore,
}

impl<'a> ContentIndex<'a> {
    pub fn new(store: &'a ArtifactStore) -> Self {
        ContentIndex { store }
    }

    /// Scan all artifact roots and build the host → dates mapping.
    ///
    /// Any traversal error (unreadable root, permission failure) is
    /// propagated; a missing artifact is never an error here.
    pub fn build(&self) -> Result<HostIndex> {
        let mut index = HostIndex::new();
        for root in ARTIFACT_ROOTS {
            let dir = self.store.root_dir(root);
            for entry in WalkDir::new(&dir) {
                let entry = entry.map_err(|source| StoreError::Walk {
                    root: dir.display().to_string(),
                    source,
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy();
                let Some((host, date)) = split_logs_name(&name) else {
                    continue;
                };
                let dates = index.entry(host.to_string()).or_default();
                // Linear membership check; per-host date cardinality is low.
                if !dates.iter().any(|known| known == date) {
                    dates.push(date.to_string());
                }
            }
        }
        debug!(hosts = index.len(), "content index built");
        Ok(index)
    }
}

/// Split `<host>--<date>.logs.txt` into `(host, date)`.
///
/// Returns `None` for files without the logs suffix or the `--`
/// delimiter; those are simply not index entries.
fn split_logs_name(name: &str) -> Option<(&str, &str)> {
    let stem = name.strip_suffix(LOGS_SUFFIX)?;
    stem.split_once("--")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> (TempDir, ArtifactStore) {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.ensure_roots().unwrap();
        (dir, store)
    }

    #[test]
    fn test_split_logs_name() {
        assert_eq!(
            split_logs_name("alpha--2025-01-01.logs.txt"),
            Some(("alpha", "2025-01-01"))
        );
        assert_eq!(split_logs_name("alpha--2025-01-01.report.txt"), None);
        assert_eq!(split_logs_name("no-delimiter.logs.txt"), None);
    }

    #[test]
    fn test_build_collects_hosts_and_dates() {
        let (_dir, store) = store();
        let uploads = store.root_dir(crate::store::ArtifactRoot::Uploads);
        fs::write(uploads.join("alpha--2025-01-01.logs.txt"), "x").unwrap();
        fs::write(uploads.join("alpha--2025-01-02.logs.txt"), "x").unwrap();
        fs::write(uploads.join("beta--2025-02-01.logs.txt"), "x").unwrap();

        let index = ContentIndex::new(&store).build().unwrap();
        assert_eq!(index.len(), 2);
        let mut alpha = index["alpha"].clone();
        alpha.sort();
        assert_eq!(alpha, vec!["2025-01-01", "2025-01-02"]);
        assert_eq!(index["beta"], vec!["2025-02-01"]);
    }

    #[test]
    fn test_build_suppresses_duplicates_across_roots() {
        let (_dir, store) = store();
        let uploads = store.root_dir(crate::store::ArtifactRoot::Uploads);
        let reports = store.root_dir(crate::store::ArtifactRoot::Reports);
        fs::write(uploads.join("alpha--2025-01-01.logs.txt"), "x").unwrap();
        fs::write(uploads.join("alpha--2025-01-02.logs.txt"), "x").unwrap();
        fs::write(reports.join("alpha--2025-01-01.logs.txt"), "x").unwrap();
        fs::write(reports.join("alpha--2025-01-02.logs.txt"), "x").unwrap();

        let index = ContentIndex::new(&store).build().unwrap();
        let mut alpha = index["alpha"].clone();
        alpha.sort();
        assert_eq!(alpha, vec!["2025-01-01", "2025-01-02"]);
    }

    #[test]
    fn test_build_ignores_non_log_files() {
        let (_dir, store) = store();
        let reports = store.root_dir(crate::store::ArtifactRoot::Reports);
        fs::write(reports.join("alpha--2025-01-01.report.txt"), "x").unwrap();
        fs::write(reports.join("notes.txt"), "x").unwrap();

        let index = ContentIndex::new(&store).build().unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_build_descends_into_subdirectories() {
        let (_dir, store) = store();
        let archive = store.root_dir(crate::store::ArtifactRoot::Archive);
        fs::create_dir_all(archive.join("2025")).unwrap();
        fs::write(archive.join("2025/gamma--2025-03-01.logs.txt"), "x").unwrap();

        let index = ContentIndex::new(&store).build().unwrap();
        assert_eq!(index["gamma"], vec!["2025-03-01"]);
    }

    #[test]
    fn test_build_fails_on_missing_root() {
        let dir = TempDir::new().unwrap();
        // No ensure_roots: the uploads directory does not exist.
        let store = ArtifactStore::new(dir.path());
        let err = ContentIndex::new(&store).build().unwrap_err();
        assert!(matches!(err, StoreError::Walk { .. }));
    }
}
