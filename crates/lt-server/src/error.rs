//! Error types for the HTTP front end.

use thiserror::Error;

/// Errors that can occur while starting or running the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration failed to resolve or validate.
    #[error("configuration error: {0}")]
    Config(#[from] lt_config::ConfigError),

    /// The listen socket could not be bound.
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    /// Artifact store preparation failed.
    #[error("artifact store error: {0}")]
    Store(#[from] lt_store::StoreError),

    /// Background thread could not be spawned.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
