//! Error types for artifact store operations.

use thiserror::Error;

/// Errors that can occur while working with the artifact store.
///
/// Walk and I/O failures are surfaced as explicit errors (a 500-class
/// condition at the HTTP layer); a merely missing artifact is not an
/// error anywhere in this crate.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Directory traversal failed while scanning an artifact root.
    #[error("failed to walk artifact root '{root}': {source}")]
    Walk {
        root: String,
        #[source]
        source: walkdir::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
