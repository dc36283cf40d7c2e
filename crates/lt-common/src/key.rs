//! Artifact keys.
//!
//! A key is the `(host, date)` pair identifying one log/report series.
//! Keys are only constructed through sanitizing constructors, so a key
//! held anywhere in the system is safe to embed in a file name.

use crate::sanitize::{sanitize_param, sanitize_upload};
use serde::{Deserialize, Serialize};
use std::fmt;

/// File name suffix for raw log artifacts.
pub const LOGS_SUFFIX: &str = ".logs.txt";

/// File name suffix for generated report artifacts.
pub const REPORT_SUFFIX: &str = ".report.txt";

/// Identifies one host/date log series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    host: String,
    date: String,
}

impl ArtifactKey {
    /// Build a key from query parameters (alphanumerics plus `.-`).
    pub fn from_params(host: &str, date: &str) -> Self {
        ArtifactKey {
            host: sanitize_param(host),
            date: sanitize_param(date),
        }
    }

    /// Build a key from upload form values (alphanumerics only).
    pub fn from_upload(host: &str, date: &str) -> Self {
        ArtifactKey {
            host: sanitize_upload(host),
            date: sanitize_upload(date),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// File name of the raw log artifact for this key.
    pub fn logs_file_name(&self) -> String {
        format!("{}--{}{}", self.host, self.date, LOGS_SUFFIX)
    }

    /// File name of the generated report artifact for this key.
    pub fn report_file_name(&self) -> String {
        format!("{}--{}{}", self.host, self.date, REPORT_SUFFIX)
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--{}", self.host, self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_params_sanitizes() {
        let key = ArtifactKey::from_params("web-01/../", "2025-01-01\n");
        assert_eq!(key.host(), "web-01..");
        assert_eq!(key.date(), "2025-01-01");
    }

    #[test]
    fn test_key_from_upload_sanitizes() {
        let key = ArtifactKey::from_upload("web-01", "2025-01-01");
        assert_eq!(key.host(), "web01");
        assert_eq!(key.date(), "20250101");
    }

    #[test]
    fn test_key_file_names() {
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        assert_eq!(key.logs_file_name(), "alpha--2025-01-01.logs.txt");
        assert_eq!(key.report_file_name(), "alpha--2025-01-01.report.txt");
    }
}
