//! Bugzilla error types.

use pg_core::TransportError;
use thiserror::Error;

/// Errors that can occur when talking to Bugzilla.
#[derive(Debug, Error)]
pub enum BugzillaError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Bugzilla answered with a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by Bugzilla.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The JSON-RPC call itself failed.
    #[error("fault {code}: {message}")]
    Fault { code: i64, message: String },

    /// Failed to parse a Bugzilla response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl BugzillaError {
    /// Bugzilla's codes for "invalid bug id" and "access denied".
    #[must_use]
    pub const fn is_missing_bug(&self) -> bool {
        matches!(self, Self::Fault { code: 101 | 102, .. })
    }
}

impl From<BugzillaError> for TransportError {
    fn from(error: BugzillaError) -> Self {
        Self::new("bugzilla", error.to_string())
    }
}
