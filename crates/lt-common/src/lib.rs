//! Log Triage shared types.
//!
//! This crate provides foundational pieces shared across lt-* crates:
//! - Artifact keys identifying one host/date log series
//! - Input sanitization for the two accepted alphabets
//! - HTML text escaping for rendered output

pub mod escape;
pub mod key;
pub mod sanitize;

pub use escape::escape_html;
pub use key::{ArtifactKey, LOGS_SUFFIX, REPORT_SUFFIX};
pub use sanitize::{sanitize_param, sanitize_upload};
