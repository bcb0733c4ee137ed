//! In-memory fakes for the collaborator traits (testing only)
//!
//! Provides `StaticBranches`, `MemoryChanges`, and `MemoryBugzilla` that
//! satisfy the trait contracts without SSH, HTTP or a git repository.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use pg_core::{
    BranchSource, Bug, BugStatus, BugTracker, Change, ChangeSource, ChangeStatus, ExternalTracker,
    TransportError,
};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A change on `branch` with `status`; `open` follows from the status.
pub fn change(number: u64, change_id: &str, branch: &str, status: ChangeStatus) -> Change {
    let open = matches!(status, ChangeStatus::New | ChangeStatus::Draft);
    Change {
        number,
        id: change_id.to_string(),
        project: "ovirt-engine".to_string(),
        branch: branch.to_string(),
        subject: format!("change {number}"),
        status,
        open,
        kind: None,
        commit_message: None,
        url: None,
    }
}

/// A relevant (`oVirt` / `ovirt-engine`) bug with no flags or trackers.
pub fn bug(id: u64, status: BugStatus, milestone: &str) -> Bug {
    Bug {
        id,
        product: "ovirt-engine".to_string(),
        classification: "oVirt".to_string(),
        status,
        target_milestone: milestone.to_string(),
        flags: Vec::new(),
        external_bugs: Vec::new(),
    }
}

pub fn tracker(ext_type_id: u32, number: u64, status: &str, branch: &str) -> ExternalTracker {
    ExternalTracker {
        ext_type_id,
        ext_bz_bug_id: number.to_string(),
        ext_description: Some(format!("change {number}")),
        ext_status: Some(status.to_string()),
        ext_priority: Some(branch.to_string()),
        ext_type: None,
    }
}

// ---------------------------------------------------------------------------
// StaticBranches
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StaticBranches {
    branches: Vec<String>,
}

impl StaticBranches {
    pub fn new<I, S>(branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            branches: branches.into_iter().map(Into::into).collect(),
        }
    }
}

impl BranchSource for StaticBranches {
    fn list_branches(&self) -> Result<Vec<String>, TransportError> {
        Ok(self.branches.clone())
    }
}

// ---------------------------------------------------------------------------
// MemoryChanges
// ---------------------------------------------------------------------------

/// Canned answers keyed by the exact query string. Unknown queries return no
/// changes; a failing source rejects every query, or only the queries named
/// with [`MemoryChanges::failing_on`].
#[derive(Debug, Default)]
pub struct MemoryChanges {
    responses: HashMap<String, Vec<Change>>,
    failing: bool,
    failing_queries: HashSet<String>,
    queries: Mutex<Vec<String>>,
}

impl MemoryChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_string());
        self
    }

    #[must_use]
    pub fn with_response(mut self, query: &str, changes: Vec<Change>) -> Self {
        self.responses.insert(query.to_string(), changes);
        self
    }

    /// Every query issued so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl ChangeSource for MemoryChanges {
    fn query_changes(&self, query: &str) -> Result<Vec<Change>, TransportError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.failing || self.failing_queries.contains(query) {
            return Err(TransportError::new("gerrit", "connection refused"));
        }
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// MemoryBugzilla
// ---------------------------------------------------------------------------

/// A write issued against [`MemoryBugzilla`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BugWrite {
    Status(u64, BugStatus),
    AddTracker(u64, ExternalTracker),
    UpdateTracker(u64, ExternalTracker),
}

/// Bug store backed by a `BTreeMap<bug id, Bug>`. Writes are applied to the
/// stored bugs and recorded in order.
#[derive(Debug, Default)]
pub struct MemoryBugzilla {
    bugs: Mutex<BTreeMap<u64, Bug>>,
    writes: Mutex<Vec<BugWrite>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryBugzilla {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bug(self, bug: Bug) -> Self {
        self.bugs.lock().unwrap().insert(bug.id, bug);
        self
    }

    #[must_use]
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    #[must_use]
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn bug(&self, bug_id: u64) -> Option<Bug> {
        self.bugs.lock().unwrap().get(&bug_id).cloned()
    }

    pub fn writes(&self) -> Vec<BugWrite> {
        self.writes.lock().unwrap().clone()
    }

    fn check_write(&self) -> Result<(), TransportError> {
        if self.fail_writes {
            Err(TransportError::new("bugzilla", "connection reset by peer"))
        } else {
            Ok(())
        }
    }
}

impl BugTracker for MemoryBugzilla {
    fn get_bug(&self, bug_id: u64) -> Result<Option<Bug>, TransportError> {
        if self.fail_reads {
            return Err(TransportError::new("bugzilla", "name or service not known"));
        }
        Ok(self.bug(bug_id))
    }

    fn update_bug_status(&self, bug_id: u64, status: &BugStatus) -> Result<(), TransportError> {
        self.check_write()?;
        if let Some(bug) = self.bugs.lock().unwrap().get_mut(&bug_id) {
            bug.status = status.clone();
        }
        self.writes
            .lock()
            .unwrap()
            .push(BugWrite::Status(bug_id, status.clone()));
        Ok(())
    }

    fn add_external_tracker(
        &self,
        bug_id: u64,
        record: &ExternalTracker,
    ) -> Result<(), TransportError> {
        self.check_write()?;
        if let Some(bug) = self.bugs.lock().unwrap().get_mut(&bug_id) {
            bug.external_bugs.push(record.clone());
        }
        self.writes
            .lock()
            .unwrap()
            .push(BugWrite::AddTracker(bug_id, record.clone()));
        Ok(())
    }

    fn update_external_tracker(
        &self,
        bug_id: u64,
        record: &ExternalTracker,
    ) -> Result<(), TransportError> {
        self.check_write()?;
        if let Some(bug) = self.bugs.lock().unwrap().get_mut(&bug_id) {
            for stored in &mut bug.external_bugs {
                if stored.ext_type_id == record.ext_type_id
                    && stored.ext_bz_bug_id == record.ext_bz_bug_id
                {
                    *stored = record.clone();
                }
            }
        }
        self.writes
            .lock()
            .unwrap()
            .push(BugWrite::UpdateTracker(bug_id, record.clone()));
        Ok(())
    }
}
