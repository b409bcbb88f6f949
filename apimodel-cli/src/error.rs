//! Error types for the `apimodel` command.

use std::sync::Arc;

use apimodel::ModelError;
use thiserror::Error;

/// Errors surfaced by a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading, resolving or materialising failed.
    #[error(transparent)]
    Model(#[from] Arc<ModelError>),

    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading input or writing output failed.
    #[error("I/O error on {target}: {source}")]
    Io {
        /// What was being read or written.
        target: &'static str,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}
