//! Filesystem layout and per-key artifact access.

use crate::error::Result;
use lt_common::ArtifactKey;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One of the three artifact roots scanned for host/date-keyed files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRoot {
    Uploads,
    Reports,
    Archive,
}

/// Scan order for the artifact roots. When the same key exists in more
/// than one root, the later root wins.
pub const ARTIFACT_ROOTS: [ArtifactRoot; 3] = [
    ArtifactRoot::Uploads,
    ArtifactRoot::Reports,
    ArtifactRoot::Archive,
];

impl ArtifactRoot {
    /// Directory name of this root under the ingest root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ArtifactRoot::Uploads => "uploads",
            ArtifactRoot::Reports => "reports",
            ArtifactRoot::Archive => "archive",
        }
    }
}

/// Handle to the artifact filesystem under a configured ingest root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    ingest_root: PathBuf,
}

impl ArtifactStore {
    /// Create a store over the given ingest root.
    pub fn new(ingest_root: impl Into<PathBuf>) -> Self {
        ArtifactStore {
            ingest_root: ingest_root.into(),
        }
    }

    /// The configured ingest root.
    pub fn ingest_root(&self) -> &Path {
        &self.ingest_root
    }

    /// Absolute directory of one artifact root.
    pub fn root_dir(&self, root: ArtifactRoot) -> PathBuf {
        self.ingest_root.join(root.dir_name())
    }

    /// Create the three artifact roots if they do not exist yet.
    pub fn ensure_roots(&self) -> Result<()> {
        for root in ARTIFACT_ROOTS {
            fs::create_dir_all(self.root_dir(root))?;
        }
        Ok(())
    }

    /// Path of the logs artifact for `key` under one root.
    pub fn logs_path(&self, root: ArtifactRoot, key: &ArtifactKey) -> PathBuf {
        self.root_dir(root).join(key.logs_file_name())
    }

    /// Path of the report artifact for `key` (reports root only).
    pub fn report_path(&self, key: &ArtifactKey) -> PathBuf {
        self.root_dir(ArtifactRoot::Reports).join(key.report_file_name())
    }

    /// Read the raw logs artifact for `key`, scanning every root.
    ///
    /// The last root holding a readable file wins. Read failures on an
    /// existing file are logged and skipped rather than propagated.
    pub fn read_raw_logs(&self, key: &ArtifactKey) -> Option<String> {
        let mut content = None;
        for root in ARTIFACT_ROOTS {
            let path = self.logs_path(root, key);
            if !path.is_file() {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(text) => {
                    debug!(path = %path.display(), bytes = text.len(), "read logs artifact");
                    content = Some(text);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable logs artifact");
                }
            }
        }
        content
    }

    /// Read the generated report artifact for `key`, if present.
    pub fn read_report(&self, key: &ArtifactKey) -> Option<String> {
        let path = self.report_path(key);
        if !path.is_file() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable report artifact");
                None
            }
        }
    }

    /// Persist a generated report for `key`, overwriting any prior one.
    pub fn write_report(&self, key: &ArtifactKey, content: &str) -> Result<PathBuf> {
        let path = self.report_path(key);
        fs::create_dir_all(self.root_dir(ArtifactRoot::Reports))?;
        fs::write(&path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "report artifact written");
        Ok(path)
    }
}
