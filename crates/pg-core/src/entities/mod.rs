//! Records for the external entities a hook reads and writes.
//!
//! Each record has fixed fields with explicit optionality. They deserialize
//! straight from the JSON returned by `gerrit query` and Bugzilla `Bug.get`.

mod bug;
mod change;
mod tracker;

pub use bug::{Bug, BugFlag, UNSET_MILESTONE};
pub use change::Change;
pub use tracker::{ExternalTracker, TrackerType, TrackerUpdate};
