//! Log Triage report generation and page rendering.
//!
//! Two halves live here:
//! - `backend` + `generator`: submit raw logs to the external
//!   text-generation service and persist the returned diagnostic report
//! - `markup` + `render`: merge content documents into the site template
//!
//! # Example
//!
//! ```no_run
//! use lt_report::{BackendClient, ReportGenerator};
//! use lt_store::ArtifactStore;
//! use lt_common::ArtifactKey;
//!
//! let store = ArtifactStore::new("/srv/logtriage/ingest");
//! let client = BackendClient::new("http://127.0.0.1:11434/api/generate", "gemma3");
//! let generator = ReportGenerator::new(store, client);
//! let key = ArtifactKey::from_params("web-01", "2025-01-01");
//! match generator.generate(&key) {
//!     Ok(generated) => println!("{}", generated.report),
//!     Err(err) => eprintln!("generation failed: {err}"),
//! }
//! ```

pub mod backend;
pub mod error;
pub mod generator;
pub mod markup;
pub mod render;

pub use backend::BackendClient;
pub use error::{GenerateError, RenderError};
pub use generator::{GeneratedReport, ReportGenerator};
pub use render::PageRenderer;
