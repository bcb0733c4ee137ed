//! Status enums for bugs and changes.
//!
//! Both enums serialize to the upper-case strings used by the remote systems
//! (`"POST"`, `"MERGED"`, ...). Statuses this crate does not model survive a
//! round trip through the `Other` variant so they can still be reported.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// BugStatus
// ---------------------------------------------------------------------------

/// Status of a Bugzilla bug.
///
/// Hooks only ever move a bug forward along two edges:
///
/// ```text
/// NEW      ─┐
///           ├→ POST → MODIFIED
/// ASSIGNED ─┘
/// ```
///
/// Everything past `MODIFIED` is owned by QE and release tooling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BugStatus {
    New,
    Assigned,
    Post,
    Modified,
    OnQa,
    Verified,
    ReleasePending,
    Closed,
    Other(String),
}

impl BugStatus {
    /// Check whether a hook may move a bug from this status to `next`.
    #[must_use]
    pub const fn can_transition_to(&self, next: &Self) -> bool {
        matches!(
            (self, next),
            (Self::New | Self::Assigned, Self::Post) | (Self::Post, Self::Modified)
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "NEW",
            Self::Assigned => "ASSIGNED",
            Self::Post => "POST",
            Self::Modified => "MODIFIED",
            Self::OnQa => "ON_QA",
            Self::Verified => "VERIFIED",
            Self::ReleasePending => "RELEASE_PENDING",
            Self::Closed => "CLOSED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for BugStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "NEW" => Self::New,
            "ASSIGNED" => Self::Assigned,
            "POST" => Self::Post,
            "MODIFIED" => Self::Modified,
            "ON_QA" => Self::OnQa,
            "VERIFIED" => Self::Verified,
            "RELEASE_PENDING" => Self::ReleasePending,
            "CLOSED" => Self::Closed,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for BugStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<BugStatus> for String {
    fn from(status: BugStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChangeStatus
// ---------------------------------------------------------------------------

/// Status of a Gerrit change as reported by `gerrit query`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeStatus {
    New,
    Draft,
    Merged,
    Abandoned,
    Other(String),
}

impl ChangeStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "NEW",
            Self::Draft => "DRAFT",
            Self::Merged => "MERGED",
            Self::Abandoned => "ABANDONED",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged)
    }
}

impl From<String> for ChangeStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "NEW" => Self::New,
            "DRAFT" => Self::Draft,
            "MERGED" => Self::Merged,
            "ABANDONED" => Self::Abandoned,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for ChangeStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<ChangeStatus> for String {
    fn from(status: ChangeStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
