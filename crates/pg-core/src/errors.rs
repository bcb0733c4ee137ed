//! Errors raised at the collaborator boundary.
//!
//! Transport crates keep their own detailed error enums and convert into
//! [`TransportError`] when they implement a collaborator trait, so the engine
//! only ever sees one failure shape for "the remote call did not complete".

use thiserror::Error;

/// A remote call to Bugzilla, Gerrit or the git repository failed.
#[derive(Debug, Error)]
#[error("{service} unavailable: {message}")]
pub struct TransportError {
    /// Which collaborator failed (`bugzilla`, `gerrit`, `git`).
    pub service: &'static str,
    pub message: String,
}

impl TransportError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}
