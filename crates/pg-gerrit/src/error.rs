//! Gerrit error types.

use pg_core::TransportError;
use thiserror::Error;

/// Errors that can occur when talking to Gerrit over SSH.
#[derive(Debug, Error)]
pub enum GerritError {
    /// The ssh process could not be started.
    #[error("failed to run ssh: {0}")]
    Io(#[from] std::io::Error),

    /// The remote command exited with a non-zero status.
    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Gerrit answered a query with an error row.
    #[error("query error: {0}")]
    Query(String),

    /// A query row is not valid JSON or is not a change.
    #[error("invalid query output: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<GerritError> for TransportError {
    fn from(error: GerritError) -> Self {
        Self::new("gerrit", error.to_string())
    }
}
