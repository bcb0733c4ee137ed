//! Forward-only bug status synchronization driven by change events.
//!
//! `set_post` runs when a patch set is uploaded, `set_modified` when a change
//! merges. Each call yields one [`Verdict`] per bug and writes to Bugzilla
//! only when the transition is legal; everything else is reported, never
//! raised.

use pg_core::{Bug, BugStatus, BugTracker, Change, ChangeSource, ChangeStatus, Verdict};
use tracing::{debug, info, warn};

use crate::classifier::Relevance;
use crate::milestone::match_milestone;

/// Fetch `bug_id`, turning "not there" and "not reachable" into the WARN
/// verdict every hook reports for them.
///
/// # Errors
///
/// The WARN verdict, already tagged with the bug id.
pub fn fetch_bug(bugs: &dyn BugTracker, bug_id: u64) -> Result<Bug, Verdict> {
    match bugs.get_bug(bug_id) {
        Ok(Some(bug)) => Ok(bug),
        Ok(None) => Err(Verdict::warn(
            "failed to get bug info (private bug or bug doesn't exist)",
        )
        .for_bug(bug_id)),
        Err(error) => {
            warn!(bug_id, %error, "bug lookup failed");
            Err(Verdict::warn("failed to get bug info (network issues)").for_bug(bug_id))
        }
    }
}

/// The status a newly uploaded patch moves `bug` to, or the IGNORE verdict
/// explaining why it does not.
///
/// # Errors
///
/// An IGNORE verdict when the bug or the patch is in the wrong state.
pub fn decide_post(bug: &Bug, change: &Change, draft: bool) -> Result<BugStatus, Verdict> {
    let next = BugStatus::Post;
    if bug.status == next {
        return Err(Verdict::ignore(format!(
            "bug is already on '{}' status",
            bug.status
        )));
    }
    if !bug.status.can_transition_to(&next) {
        return Err(Verdict::ignore(format!(
            "not relevant for bug with '{}' status",
            bug.status
        )));
    }
    if draft || change.status == ChangeStatus::Draft {
        return Err(Verdict::ignore("not relevant for draft patch"));
    }
    if change.status != ChangeStatus::New {
        return Err(Verdict::ignore(format!(
            "not relevant for patch with '{}' status",
            change.status
        )));
    }
    Ok(next)
}

/// Status-only half of the `POST → MODIFIED` decision. The tracker and
/// milestone gates are checked by [`StatusSyncEngine::set_modified`].
///
/// # Errors
///
/// An IGNORE verdict when the bug or the patch is in the wrong state.
pub fn decide_modified(bug: &Bug, change: &Change) -> Result<BugStatus, Verdict> {
    let next = BugStatus::Modified;
    if bug.status == next {
        return Err(Verdict::ignore(format!(
            "bug is already on '{}' status",
            bug.status
        )));
    }
    if !bug.status.can_transition_to(&next) {
        return Err(Verdict::ignore(format!(
            "not relevant for bug with '{}' status",
            bug.status
        )));
    }
    if !change.status.is_merged() {
        return Err(Verdict::ignore(format!(
            "not relevant for patch with '{}' status",
            change.status
        )));
    }
    Ok(next)
}

fn blocked(reason: &str) -> Verdict {
    Verdict::warn(format!(
        "can't change bug status to '{}' ({reason})",
        BugStatus::Modified
    ))
}

pub struct StatusSyncEngine<'a> {
    bugs: &'a dyn BugTracker,
    changes: &'a dyn ChangeSource,
    relevance: &'a Relevance,
    tracker_id: u32,
}

impl<'a> StatusSyncEngine<'a> {
    pub const fn new(
        bugs: &'a dyn BugTracker,
        changes: &'a dyn ChangeSource,
        relevance: &'a Relevance,
        tracker_id: u32,
    ) -> Self {
        Self {
            bugs,
            changes,
            relevance,
            tracker_id,
        }
    }

    /// `NEW|ASSIGNED → POST` for a non-draft `NEW` patch.
    #[must_use]
    pub fn set_post(&self, bug_id: u64, change: &Change, draft: bool) -> Verdict {
        let bug = match self.relevant_bug(bug_id) {
            Ok(bug) => bug,
            Err(verdict) => return verdict,
        };
        match decide_post(&bug, change, draft) {
            Ok(next) => self.write(bug_id, &next),
            Err(verdict) => verdict.for_bug(bug_id),
        }
    }

    /// `POST → MODIFIED` for a merged patch, once every gerrit tracker on the
    /// bug is merged on the same branch and the target milestone fits.
    #[must_use]
    pub fn set_modified(&self, bug_id: u64, change: &Change) -> Verdict {
        let bug = match self.relevant_bug(bug_id) {
            Ok(bug) => bug,
            Err(verdict) => return verdict,
        };
        let next = match decide_modified(&bug, change) {
            Ok(next) => next,
            Err(verdict) => return verdict.for_bug(bug_id),
        };
        if let Err(verdict) = self.trackers_merged(&bug, &change.branch) {
            return verdict.for_bug(bug_id);
        }
        let milestone = match_milestone(&bug, &change.branch);
        if milestone.is_warn() {
            return Verdict::warn(format!(
                "bug status won't be changed to '{next}' ({})",
                milestone.detail
            ))
            .for_bug(bug_id);
        }
        self.write(bug_id, &next)
    }

    fn relevant_bug(&self, bug_id: u64) -> Result<Bug, Verdict> {
        let bug = fetch_bug(self.bugs, bug_id)?;
        if self.relevance.is_relevant(&bug) {
            debug!(bug_id, status = %bug.status, "bug is relevant");
            Ok(bug)
        } else {
            Err(Verdict::ignore(Relevance::not_relevant_detail(&bug)).for_bug(bug_id))
        }
    }

    /// Every gerrit tracker on `bug` must point at changes that are merged on
    /// `branch`. Changes on other branches do not block.
    fn trackers_merged(&self, bug: &Bug, branch: &str) -> Result<(), Verdict> {
        let mut trackers = bug.trackers_of_type(self.tracker_id).peekable();
        if trackers.peek().is_none() {
            return Err(blocked("no external tracker info found"));
        }

        for tracker in trackers {
            let changes = self
                .changes
                .query_changes(&tracker.ext_bz_bug_id)
                .map_err(|error| {
                    warn!(tracker = %tracker.ext_bz_bug_id, %error, "tracker query failed");
                    blocked(&format!(
                        "failed to query change '{}'",
                        tracker.ext_bz_bug_id
                    ))
                })?;
            let open = changes
                .iter()
                .any(|change| change.branch == branch && !change.status.is_merged());
            if open {
                debug!(tracker = %tracker.ext_bz_bug_id, branch, "tracker still open");
                return Err(blocked("There are still open patches"));
            }
        }
        Ok(())
    }

    fn write(&self, bug_id: u64, next: &BugStatus) -> Verdict {
        match self.bugs.update_bug_status(bug_id, next) {
            Ok(()) => {
                info!(bug_id, status = %next, "bug status updated");
                Verdict::ok(format!("bug status updated to '{next}'")).for_bug(bug_id)
            }
            Err(error) => {
                warn!(bug_id, %error, "bug status update failed");
                Verdict::error(format!("failed to change bug status ({error})")).for_bug(bug_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pg_core::Level;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fakes::{BugWrite, MemoryBugzilla, MemoryChanges, bug, change, tracker};

    const TRACKER_ID: u32 = 81;
    const BUG_ID: u64 = 1_234_567;
    const BRANCH: &str = "ovirt-engine-4.1";

    fn relevance() -> Relevance {
        Relevance::new(["oVirt"], ["vdsm"])
    }

    fn merged_change() -> Change {
        change(74242, "Iabc", BRANCH, ChangeStatus::Merged)
    }

    fn post_bug_with_trackers(trackers: Vec<pg_core::ExternalTracker>) -> Bug {
        Bug {
            external_bugs: trackers,
            ..bug(BUG_ID, BugStatus::Post, "ovirt-4.1.3")
        }
    }

    #[test]
    fn post_from_new_for_fresh_patch() {
        let bugzilla = MemoryBugzilla::new().with_bug(bug(BUG_ID, BugStatus::New, "---"));
        let changes = MemoryChanges::new();
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_post(BUG_ID, &change(1, "Iabc", BRANCH, ChangeStatus::New), false);

        assert_eq!(verdict.message(), "OK, bug status updated to 'POST'");
        assert_eq!(verdict.subject.as_deref(), Some("#1234567"));
        assert_eq!(bugzilla.writes(), [BugWrite::Status(BUG_ID, BugStatus::Post)]);
    }

    #[test]
    fn post_skips_draft_patches() {
        let bugzilla = MemoryBugzilla::new().with_bug(bug(BUG_ID, BugStatus::Assigned, "---"));
        let changes = MemoryChanges::new();
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_post(BUG_ID, &change(1, "Iabc", BRANCH, ChangeStatus::New), true);

        assert_eq!(verdict.level, Level::Ignore);
        assert!(bugzilla.writes().is_empty());
    }

    #[test]
    fn post_never_regresses() {
        let change = change(1, "Iabc", BRANCH, ChangeStatus::New);
        for status in [BugStatus::Post, BugStatus::Modified, BugStatus::OnQa] {
            let verdict = decide_post(&bug(BUG_ID, status.clone(), "---"), &change, false)
                .unwrap_err();
            assert_eq!(verdict.level, Level::Ignore, "{status}");
        }
        assert_eq!(
            decide_post(&bug(BUG_ID, BugStatus::Post, "---"), &change, false)
                .unwrap_err()
                .detail,
            "bug is already on 'POST' status"
        );
    }

    #[test]
    fn modified_when_all_trackers_merged() {
        let bugzilla = MemoryBugzilla::new().with_bug(post_bug_with_trackers(vec![
            tracker(TRACKER_ID, 74242, "MERGED", BRANCH),
            tracker(TRACKER_ID, 74243, "MERGED", BRANCH),
        ]));
        let changes = MemoryChanges::new()
            .with_response("74242", vec![merged_change()])
            .with_response(
                "74243",
                vec![change(74243, "Idef", BRANCH, ChangeStatus::Merged)],
            );
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_modified(BUG_ID, &merged_change());

        assert_eq!(verdict.message(), "OK, bug status updated to 'MODIFIED'");
        assert_eq!(bugzilla.bug(BUG_ID).unwrap().status, BugStatus::Modified);
        assert_eq!(changes.queries(), ["74242", "74243"]);
    }

    #[test]
    fn modified_blocked_by_open_sibling_on_same_branch() {
        let bugzilla = MemoryBugzilla::new().with_bug(post_bug_with_trackers(vec![
            tracker(TRACKER_ID, 74242, "MERGED", BRANCH),
            tracker(TRACKER_ID, 74250, "POST", BRANCH),
        ]));
        let changes = MemoryChanges::new()
            .with_response("74242", vec![merged_change()])
            .with_response(
                "74250",
                vec![change(74250, "Ixyz", BRANCH, ChangeStatus::New)],
            );
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_modified(BUG_ID, &merged_change());

        assert_eq!(
            verdict.message(),
            "WARN, can't change bug status to 'MODIFIED' (There are still open patches)"
        );
        assert!(bugzilla.writes().is_empty());
    }

    #[test]
    fn open_change_on_other_branch_does_not_block() {
        let bugzilla = MemoryBugzilla::new().with_bug(post_bug_with_trackers(vec![tracker(
            TRACKER_ID, 74250, "POST", "master",
        )]));
        let changes = MemoryChanges::new().with_response(
            "74250",
            vec![change(74250, "Ixyz", "master", ChangeStatus::New)],
        );
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_modified(BUG_ID, &merged_change());
        assert_eq!(verdict.level, Level::Ok);
    }

    #[test]
    fn modified_blocked_when_tracker_query_fails() {
        let bugzilla = MemoryBugzilla::new().with_bug(post_bug_with_trackers(vec![
            tracker(TRACKER_ID, 74242, "MERGED", BRANCH),
            tracker(TRACKER_ID, 74250, "POST", BRANCH),
        ]));
        let changes = MemoryChanges::new()
            .with_response("74242", vec![merged_change()])
            .failing_on("74250");
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_modified(BUG_ID, &merged_change());

        assert_eq!(
            verdict.message(),
            "WARN, can't change bug status to 'MODIFIED' (failed to query change '74250')"
        );
        assert_eq!(verdict.subject.as_deref(), Some("#1234567"));
        assert!(bugzilla.writes().is_empty());
        assert_eq!(bugzilla.bug(BUG_ID).unwrap().status, BugStatus::Post);
    }

    #[test]
    fn modified_needs_gerrit_trackers() {
        let bugzilla = MemoryBugzilla::new().with_bug(post_bug_with_trackers(vec![tracker(
            7, 74242, "MERGED", BRANCH,
        )]));
        let changes = MemoryChanges::new();
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_modified(BUG_ID, &merged_change());

        assert_eq!(
            verdict.detail,
            "can't change bug status to 'MODIFIED' (no external tracker info found)"
        );
        assert!(changes.queries().is_empty());
    }

    #[test]
    fn modified_blocked_by_milestone() {
        let bugzilla = MemoryBugzilla::new().with_bug(Bug {
            target_milestone: "ovirt-4.2.0".to_string(),
            ..post_bug_with_trackers(vec![tracker(TRACKER_ID, 74242, "MERGED", BRANCH)])
        });
        let changes = MemoryChanges::new().with_response("74242", vec![merged_change()]);
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_modified(BUG_ID, &merged_change());

        assert_eq!(
            verdict.detail,
            "bug status won't be changed to 'MODIFIED' (wrong target milestone: 'ovirt-4.2.0')"
        );
        assert!(bugzilla.writes().is_empty());
    }

    #[test]
    fn already_modified_is_ignored_without_writes() {
        let bugzilla = MemoryBugzilla::new().with_bug(bug(BUG_ID, BugStatus::Modified, "ovirt-4.1.3"));
        let changes = MemoryChanges::new();
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_modified(BUG_ID, &merged_change());

        assert_eq!(verdict.message(), "IGNORE, bug is already on 'MODIFIED' status");
        assert!(bugzilla.writes().is_empty());
    }

    #[test]
    fn unmerged_patch_is_ignored() {
        let verdict = decide_modified(
            &bug(BUG_ID, BugStatus::Post, "---"),
            &change(1, "Iabc", BRANCH, ChangeStatus::Abandoned),
        )
        .unwrap_err();
        assert_eq!(verdict.detail, "not relevant for patch with 'ABANDONED' status");
    }

    #[test]
    fn irrelevant_bug_is_ignored() {
        let bugzilla = MemoryBugzilla::new().with_bug(Bug {
            classification: "Red Hat".to_string(),
            product: "rhevm".to_string(),
            ..bug(BUG_ID, BugStatus::New, "---")
        });
        let changes = MemoryChanges::new();
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_post(BUG_ID, &change(1, "Iabc", BRANCH, ChangeStatus::New), false);
        assert_eq!(
            verdict.detail,
            "not relevant for classification: 'Red Hat', product: 'rhevm'"
        );
    }

    #[test]
    fn failed_write_is_an_error_verdict() {
        let bugzilla = MemoryBugzilla::new()
            .with_bug(bug(BUG_ID, BugStatus::New, "---"))
            .failing_writes();
        let changes = MemoryChanges::new();
        let relevance = relevance();
        let engine = StatusSyncEngine::new(&bugzilla, &changes, &relevance, TRACKER_ID);

        let verdict = engine.set_post(BUG_ID, &change(1, "Iabc", BRANCH, ChangeStatus::New), false);

        assert_eq!(verdict.level, Level::Error);
        assert!(verdict.detail.starts_with("failed to change bug status ("));
    }

    #[test]
    fn unreachable_or_missing_bug_warns() {
        let missing = MemoryBugzilla::new();
        let unreachable = MemoryBugzilla::new().failing_reads();

        assert_eq!(
            fetch_bug(&missing, 9).unwrap_err().detail,
            "failed to get bug info (private bug or bug doesn't exist)"
        );
        assert_eq!(
            fetch_bug(&unreachable, 9).unwrap_err().detail,
            "failed to get bug info (network issues)"
        );
    }
}
