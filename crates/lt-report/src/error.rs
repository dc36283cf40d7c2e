//! Error types for report generation and page rendering.

use thiserror::Error;

/// Errors that can occur while generating a report.
///
/// Every variant is a typed outcome the caller can branch on; nothing in
/// the generation path panics or aborts the serving process.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// No logs artifact exists for the requested key in any root.
    #[error("no logs artifact for key")]
    MissingLogs,

    /// Another generation for the same key is already running.
    #[error("generation already in flight for key")]
    InFlight,

    /// The backend answered with a non-success HTTP status.
    #[error("backend request failed with status {status}: {body}")]
    Backend { status: u16, body: String },

    /// The backend could not be reached at all.
    #[error("backend transport failure: {reason}")]
    Transport { reason: String },

    /// The backend answered 2xx but the body was not a valid reply.
    #[error("malformed backend response: {reason}")]
    MalformedResponse { reason: String },

    /// Writing the report artifact failed.
    #[error("failed to persist report: {0}")]
    Store(#[from] lt_store::StoreError),
}

/// Errors that can occur while rendering a page through the template.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The site template file could not be read.
    #[error("failed to read site template: {0}")]
    Io(#[from] std::io::Error),

    /// A document lacks the structure needed for merging.
    #[error("failed to parse {doc} document: {reason}")]
    Parse { doc: &'static str, reason: String },

    /// A required marker node is absent from the site template.
    #[error("site template is missing its {0}")]
    MissingContainer(&'static str),
}
