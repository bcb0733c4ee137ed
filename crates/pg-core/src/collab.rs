//! Collaborator traits implemented by the transport crates.
//!
//! Every method is a single blocking remote call. Implementations do not
//! retry; a failed call comes back as [`TransportError`].

use crate::entities::{Bug, Change, ExternalTracker};
use crate::enums::BugStatus;
use crate::errors::TransportError;

/// Query access to the code-review system.
pub trait ChangeSource {
    /// Changes matching a free-form query (a commit sha, a Change-Id, a
    /// change number, optionally scoped with `project:<name>`).
    fn query_changes(&self, query: &str) -> Result<Vec<Change>, TransportError>;
}

/// Branch listing for the repository the hook runs against.
pub trait BranchSource {
    /// Short branch names (`master`, `ovirt-engine-4.1`, ...).
    fn list_branches(&self) -> Result<Vec<String>, TransportError>;
}

/// Read/write access to the bug tracker.
pub trait BugTracker {
    /// `Ok(None)` means the bug is private or does not exist.
    fn get_bug(&self, bug_id: u64) -> Result<Option<Bug>, TransportError>;

    fn update_bug_status(&self, bug_id: u64, status: &BugStatus) -> Result<(), TransportError>;

    /// Attach a new tracker record to `bug_id`.
    fn add_external_tracker(
        &self,
        bug_id: u64,
        record: &ExternalTracker,
    ) -> Result<(), TransportError>;

    /// Overwrite the stored record identified by
    /// `(record.ext_type_id, record.ext_bz_bug_id)` on `bug_id`.
    fn update_external_tracker(
        &self,
        bug_id: u64,
        record: &ExternalTracker,
    ) -> Result<(), TransportError>;
}
