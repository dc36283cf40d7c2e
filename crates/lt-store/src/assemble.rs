//! Report data assembly.
//!
//! Pulls together everything known for one artifact key: the raw log
//! section, the (currently unsurfaced) system information section and
//! any previously generated report. Retrieval is fail-soft: missing
//! artifacts become empty fields, and the UI renders a "no data yet"
//! state instead of an error page.

use crate::store::ArtifactStore;
use lt_common::ArtifactKey;
use serde::{Deserialize, Serialize};

/// Literal marker separating the log section from the system
/// information section inside an uploaded logs artifact.
pub const SECTION_MARKER: &str =
    "============================================\n= Begin System Information Report";

/// Flat string view of everything known for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub host: String,
    pub date: String,
    pub logs: String,
    pub specs: String,
    pub report: String,
}

/// Assemble the report payload for `key`. Never fails; absent artifacts
/// yield empty fields.
pub fn assemble(store: &ArtifactStore, key: &ArtifactKey) -> ReportPayload {
    let logs = match store.read_raw_logs(key) {
        // Text before the marker is the log section. The remainder is
        // recognized but intentionally not surfaced through `specs`.
        Some(content) => match content.split_once(SECTION_MARKER) {
            Some((logs, _specs)) => logs.to_string(),
            None => content,
        },
        None => String::new(),
    };

    let report = store.read_report(key).unwrap_or_default();

    ReportPayload {
        host: key.host().to_string(),
        date: key.date().to_string(),
        logs,
        specs: String::new(),
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ArtifactRoot;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> (TempDir, ArtifactStore) {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.ensure_roots().unwrap();
        (dir, store)
    }

    #[test]
    fn test_assemble_missing_artifacts_yield_empty_fields() {
        let (_dir, store) = store();
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        let payload = assemble(&store, &key);
        assert_eq!(payload.host, "alpha");
        assert_eq!(payload.date, "2025-01-01");
        assert_eq!(payload.logs, "");
        assert_eq!(payload.specs, "");
        assert_eq!(payload.report, "");
    }

    #[test]
    fn test_assemble_splits_at_section_marker() {
        let (_dir, store) = store();
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        let content = format!("LINE1\n{}\nLINE2", SECTION_MARKER);
        fs::write(store.logs_path(ArtifactRoot::Uploads, &key), content).unwrap();

        let payload = assemble(&store, &key);
        assert_eq!(payload.logs, "LINE1\n");
        assert_eq!(payload.specs, "");
    }

    #[test]
    fn test_assemble_without_marker_keeps_full_content() {
        let (_dir, store) = store();
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        fs::write(store.logs_path(ArtifactRoot::Uploads, &key), "just logs\n").unwrap();

        let payload = assemble(&store, &key);
        assert_eq!(payload.logs, "just logs\n");
    }

    #[test]
    fn test_assemble_later_root_overwrites_earlier() {
        let (_dir, store) = store();
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        fs::write(store.logs_path(ArtifactRoot::Uploads, &key), "old").unwrap();
        fs::write(store.logs_path(ArtifactRoot::Archive, &key), "archived").unwrap();

        let payload = assemble(&store, &key);
        assert_eq!(payload.logs, "archived");
    }

    #[test]
    fn test_assemble_includes_generated_report() {
        let (_dir, store) = store();
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        fs::write(store.logs_path(ArtifactRoot::Uploads, &key), "logs").unwrap();
        store.write_report(&key, "all clear").unwrap();

        let payload = assemble(&store, &key);
        assert_eq!(payload.logs, "logs");
        assert_eq!(payload.report, "all clear");
    }

    #[test]
    fn test_payload_serializes_flat_strings() {
        let payload = ReportPayload {
            host: "alpha".into(),
            date: "2025-01-01".into(),
            logs: "l".into(),
            specs: String::new(),
            report: "r".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["host"], "alpha");
        assert_eq!(json["specs"], "");
        assert_eq!(json["report"], "r");
    }
}
