//! Report generation.
//!
//! Loads the raw logs artifact for a key, submits it with the fixed
//! instruction preamble to the text-generation backend, and persists the
//! reply as the report artifact. Regeneration always re-calls the
//! backend; there is no response cache. A per-key in-flight guard keeps
//! two concurrent generations for the same key from racing on the same
//! output file.

use crate::backend::BackendClient;
use crate::error::GenerateError;
use lt_common::ArtifactKey;
use lt_store::ArtifactStore;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};

/// Instruction preamble prepended to the raw log content on every
/// generation request.
const INSTRUCTIONS: &str = "You are a devops system administrator in charge of monitoring logs \
for issues and suggesting resolutions. Go through all of the following log information, generate \
a detailed report about the issues found, and include suggestions for resolutions of the issues.\n\
Do not explain what each log file is for. Provide a summary of issues and stay focused on \
explaining those issues with examples of resolutions.\n---\n";

/// Outcome of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    /// The report text returned by the backend.
    pub report: String,
    /// Where the report artifact was written.
    pub path: PathBuf,
}

/// Report generator bound to one store and one backend endpoint.
pub struct ReportGenerator {
    store: ArtifactStore,
    client: BackendClient,
    in_flight: Mutex<HashSet<String>>,
}

impl ReportGenerator {
    pub fn new(store: ArtifactStore, client: BackendClient) -> Self {
        ReportGenerator {
            store,
            client,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Generate and persist a report for `key`.
    ///
    /// Fails without side effects when no logs artifact exists, when the
    /// same key is already being generated, or when the backend call
    /// does not produce a usable reply. On success the report artifact
    /// is created or overwritten.
    pub fn generate(&self, key: &ArtifactKey) -> Result<GeneratedReport, GenerateError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, key)?;

        let logs = self
            .store
            .read_raw_logs(key)
            .ok_or(GenerateError::MissingLogs)?;

        let prompt = format!("{INSTRUCTIONS}{logs}");
        let report = self.client.complete(&prompt).inspect_err(|err| {
            warn!(key = %key, error = %err, "report generation failed");
        })?;

        let path = self.store.write_report(key, &report)?;
        info!(key = %key, bytes = report.len(), "report generated");
        Ok(GeneratedReport { report, path })
    }
}

/// RAII membership in the in-flight key set.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    key: String,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(
        set: &'a Mutex<HashSet<String>>,
        key: &ArtifactKey,
    ) -> Result<Self, GenerateError> {
        let token = key.to_string();
        let mut held = set.lock().expect("in-flight set poisoned");
        if !held.insert(token.clone()) {
            return Err(GenerateError::InFlight);
        }
        Ok(InFlightGuard { set, key: token })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut held) = self.set.lock() {
            held.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lt_store::ArtifactRoot;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    fn store_with_logs(key: &ArtifactKey, content: &str) -> (TempDir, ArtifactStore) {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.ensure_roots().unwrap();
        fs::write(store.logs_path(ArtifactRoot::Uploads, key), content).unwrap();
        (dir, store)
    }

    /// Serve exactly `hits` requests with a fixed status/body, then stop.
    fn fake_backend(status: u16, body: &'static str, hits: usize) -> (String, thread::JoinHandle<Vec<String>>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let url = format!("http://{}/api/generate", addr);
        let handle = thread::spawn(move || {
            let mut prompts = Vec::new();
            for _ in 0..hits {
                let mut request = server.recv().unwrap();
                let mut received = String::new();
                use std::io::Read;
                let _ = request.as_reader().read_to_string(&mut received);
                prompts.push(received);
                let response =
                    tiny_http::Response::from_string(body).with_status_code(status);
                let _ = request.respond(response);
            }
            prompts
        });
        (url, handle)
    }

    #[test]
    fn test_generate_missing_logs_fails_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.ensure_roots().unwrap();
        let key = ArtifactKey::from_params("alpha", "2025-01-01");

        // The backend must never be contacted; an unroutable URL proves it.
        let client = BackendClient::new("http://127.0.0.1:1/api/generate", "gemma3");
        let generator = ReportGenerator::new(store.clone(), client);

        let err = generator.generate(&key).unwrap_err();
        assert!(matches!(err, GenerateError::MissingLogs));
        assert!(!store.report_path(&key).exists());
    }

    #[test]
    fn test_generate_success_persists_report() {
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        let (_dir, store) = store_with_logs(&key, "kernel: oops\n");
        let (url, handle) = fake_backend(
            200,
            r#"{"model":"gemma3","created_at":"2025-01-01T00:00:00Z","response":"all clear","done":true}"#,
            1,
        );

        let generator = ReportGenerator::new(store.clone(), BackendClient::new(url, "gemma3"));
        let generated = generator.generate(&key).unwrap();

        assert_eq!(generated.report, "all clear");
        assert_eq!(store.read_report(&key).as_deref(), Some("all clear"));

        // The submitted prompt is the preamble plus the raw log content.
        let prompts = handle.join().unwrap();
        assert!(prompts[0].contains("kernel: oops"));
        assert!(prompts[0].contains("\"stream\":false"));
    }

    #[test]
    fn test_generate_backend_error_writes_nothing() {
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        let (_dir, store) = store_with_logs(&key, "kernel: oops\n");
        let (url, handle) = fake_backend(500, "overloaded", 1);

        let generator = ReportGenerator::new(store.clone(), BackendClient::new(url, "gemma3"));
        let err = generator.generate(&key).unwrap_err();

        assert!(matches!(err, GenerateError::Backend { status: 500, .. }));
        assert!(!store.report_path(&key).exists());
        handle.join().unwrap();
    }

    #[test]
    fn test_generate_malformed_body_writes_nothing() {
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        let (_dir, store) = store_with_logs(&key, "kernel: oops\n");
        let (url, handle) = fake_backend(200, "not json at all", 1);

        let generator = ReportGenerator::new(store.clone(), BackendClient::new(url, "gemma3"));
        let err = generator.generate(&key).unwrap_err();

        assert!(matches!(err, GenerateError::MalformedResponse { .. }));
        assert!(!store.report_path(&key).exists());
        handle.join().unwrap();
    }

    #[test]
    fn test_generate_overwrites_prior_report() {
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        let (_dir, store) = store_with_logs(&key, "kernel: oops\n");
        store.write_report(&key, "stale").unwrap();
        let (url, handle) = fake_backend(200, r#"{"response":"fresh"}"#, 1);

        let generator = ReportGenerator::new(store.clone(), BackendClient::new(url, "gemma3"));
        generator.generate(&key).unwrap();

        assert_eq!(store.read_report(&key).as_deref(), Some("fresh"));
        handle.join().unwrap();
    }

    #[test]
    fn test_second_generation_for_same_key_is_rejected_while_in_flight() {
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        let (_dir, store) = store_with_logs(&key, "kernel: oops\n");
        let generator = ReportGenerator::new(
            store.clone(),
            BackendClient::new("http://127.0.0.1:1/api/generate", "gemma3"),
        );

        let _guard = InFlightGuard::acquire(&generator.in_flight, &key).unwrap();
        let err = generator.generate(&key).unwrap_err();
        assert!(matches!(err, GenerateError::InFlight));
        assert!(!store.report_path(&key).exists());
    }

    #[test]
    fn test_in_flight_guard_releases_on_drop() {
        let set = Mutex::new(HashSet::new());
        let key = ArtifactKey::from_params("alpha", "2025-01-01");
        {
            let _guard = InFlightGuard::acquire(&set, &key).unwrap();
            assert!(matches!(
                InFlightGuard::acquire(&set, &key),
                Err(GenerateError::InFlight)
            ));
        }
        assert!(InFlightGuard::acquire(&set, &key).is_ok());
    }

    #[test]
    fn test_distinct_keys_do_not_contend() {
        let set = Mutex::new(HashSet::new());
        let first = ArtifactKey::from_params("alpha", "2025-01-01");
        let second = ArtifactKey::from_params("alpha", "2025-01-02");
        let _a = InFlightGuard::acquire(&set, &first).unwrap();
        assert!(InFlightGuard::acquire(&set, &second).is_ok());
    }
}
