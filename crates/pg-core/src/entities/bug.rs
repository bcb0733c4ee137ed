use serde::{Deserialize, Serialize};

use crate::entities::ExternalTracker;
use crate::enums::BugStatus;

/// Bugzilla's placeholder for "no target milestone".
pub const UNSET_MILESTONE: &str = "---";

/// A flag set on a bug (`name` like `ovirt-4.1.z`, `status` like `?` or `+`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BugFlag {
    pub name: String,
    #[serde(default)]
    pub status: String,
}

/// A Bugzilla bug as returned by `Bug.get` with `external_bugs` requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bug {
    pub id: u64,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub classification: String,
    pub status: BugStatus,
    #[serde(default)]
    pub target_milestone: String,
    #[serde(default)]
    pub flags: Vec<BugFlag>,
    #[serde(default)]
    pub external_bugs: Vec<ExternalTracker>,
}

impl Bug {
    /// The target milestone, or `None` when it is empty or `---`.
    #[must_use]
    pub fn milestone(&self) -> Option<&str> {
        let milestone = self.target_milestone.trim();
        if milestone.is_empty() || milestone == UNSET_MILESTONE {
            None
        } else {
            Some(milestone)
        }
    }

    /// External tracker records of the given tracker type.
    pub fn trackers_of_type(&self, ext_type_id: u32) -> impl Iterator<Item = &ExternalTracker> {
        self.external_bugs
            .iter()
            .filter(move |tracker| tracker.ext_type_id == ext_type_id)
    }

    /// The record for `(ext_type_id, ext_bz_bug_id)`, if the bug carries one.
    #[must_use]
    pub fn find_tracker(&self, ext_type_id: u32, ext_bz_bug_id: &str) -> Option<&ExternalTracker> {
        self.trackers_of_type(ext_type_id)
            .find(|tracker| tracker.ext_bz_bug_id == ext_bz_bug_id)
    }
}
