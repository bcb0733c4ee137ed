use pg_core::{Bug, BugTracker, ExternalTracker, TrackerUpdate};
use tracing::{debug, info};

use crate::error::HookError;

/// Whether [`upsert_tracker`] created a record or rewrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerOutcome {
    pub kind: UpsertKind,
    /// The record as written.
    pub record: ExternalTracker,
}

/// Create or update the tracker record `(update.ext_type_id,
/// update.ext_bz_bug_id)` on `bug_id`.
///
/// The stored record is re-read first, so fields the update leaves out keep
/// their current value. Two hooks racing on the same record both read before
/// either writes; the last write wins.
///
/// # Errors
///
/// [`HookError::Transport`] if the bug cannot be read or the write fails,
/// [`HookError::BugNotFound`] if the bug is private or does not exist.
pub fn upsert_tracker(
    tracker: &dyn BugTracker,
    bug_id: u64,
    update: &TrackerUpdate,
) -> Result<TrackerOutcome, HookError> {
    let bug = tracker
        .get_bug(bug_id)?
        .ok_or(HookError::BugNotFound(bug_id))?;
    upsert_tracker_on(tracker, &bug, update)
}

/// [`upsert_tracker`] against an already fetched `bug`.
///
/// # Errors
///
/// [`HookError::Transport`] if the write fails.
pub fn upsert_tracker_on(
    tracker: &dyn BugTracker,
    bug: &Bug,
    update: &TrackerUpdate,
) -> Result<TrackerOutcome, HookError> {
    let existing = bug.find_tracker(update.ext_type_id, &update.ext_bz_bug_id);
    let record = ExternalTracker::merged(existing, update);

    let kind = if existing.is_some() {
        tracker.update_external_tracker(bug.id, &record)?;
        UpsertKind::Updated
    } else {
        tracker.add_external_tracker(bug.id, &record)?;
        UpsertKind::Created
    };

    info!(bug_id = bug.id, tracker = %record.ext_bz_bug_id, ?kind, "upserted external tracker");
    debug!(?record, "tracker record written");
    Ok(TrackerOutcome { kind, record })
}
