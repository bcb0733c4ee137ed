//! One runner per hook: gather the change and its bugs, run the check, and
//! collect the verdicts into a [`Report`].

use std::collections::HashSet;

use pg_core::{
    BranchSource, BugTracker, Change, ChangeSource, ChangeStatus, HookContext, HookKind, Level,
    Report, TrackerUpdate, Verdict,
};
use tracing::{debug, info, warn};

use crate::backport::BackportReconciler;
use crate::bug_url::{bug_ids, bug_urls, reverted_commit};
use crate::catalog::BranchCatalog;
use crate::classifier::Relevance;
use crate::error::HookError;
use crate::milestone::match_milestone;
use crate::status::{StatusSyncEngine, fetch_bug};
use crate::tracker::upsert_tracker_on;
use crate::version::MASTER;

/// Branches where a missing `Bug-Url` is not a problem.
const BUG_URL_OPTIONAL: [&str; 3] = [MASTER, "refs/meta/config", "meta/config"];

/// The remote systems a hook talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub changes: &'a dyn ChangeSource,
    pub branches: &'a dyn BranchSource,
    pub bugs: &'a dyn BugTracker,
}

/// Settings every hook reads.
#[derive(Debug, Clone)]
pub struct HookSettings {
    pub relevance: Relevance,
    /// Bugzilla's external tracker type id for the Gerrit instance.
    pub tracker_id: u32,
    /// Only `Bug-Url` trailers pointing at this server are considered.
    pub bz_server: String,
}

/// The Gerrit hook arguments a runner needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEvent {
    pub project: String,
    pub branch: String,
    pub commit: String,
    /// `--private` / `--is-draft` from Gerrit.
    pub draft: bool,
}

pub struct HookRunner<'a> {
    collab: Collaborators<'a>,
    settings: &'a HookSettings,
}

impl<'a> HookRunner<'a> {
    pub const fn new(collab: Collaborators<'a>, settings: &'a HookSettings) -> Self {
        Self { collab, settings }
    }

    /// Run the hook named by `context` for `event`.
    ///
    /// Per-bug problems become verdicts. Only failures that leave nothing to
    /// report on are returned as errors.
    ///
    /// # Errors
    ///
    /// [`HookError::Transport`] if Gerrit cannot be queried for the change,
    /// [`HookError::ChangeNotFound`] if the commit is unknown to Gerrit.
    pub fn run(&self, context: HookContext, event: &HookEvent) -> Result<Report, HookError> {
        let hook = context.hook;
        info!(%hook, project = %event.project, branch = %event.branch, commit = %event.commit, "running hook");

        if hook.ignores_master() && event.branch.contains(MASTER) {
            return Ok(Report::single(
                context,
                Verdict::ignore(format!("not relevant for branch: {}", event.branch)),
            ));
        }

        let change = self.change_for(event)?;
        match hook {
            HookKind::CheckBackport => {
                let reconciler = BackportReconciler::new(
                    BranchCatalog::new(self.collab.branches),
                    self.collab.changes,
                );
                let verdict = reconciler.reconcile(&change.id, &event.project, &event.branch)?;
                Ok(Report::single(context, verdict))
            }
            HookKind::CheckBugUrl => {
                let urls = self.resolve_bug_urls(&change);
                Ok(self.check_bug_url(context, &urls, &event.branch))
            }
            HookKind::CheckProduct => Ok(self.per_bug(context, &change, |bug_id| {
                self.check_product(bug_id, &event.project)
            })),
            HookKind::CheckTargetMilestone => Ok(self.per_bug(context, &change, |bug_id| {
                self.check_target_milestone(bug_id, &event.branch)
            })),
            HookKind::SetPost => Ok(self.per_bug(context, &change, |bug_id| {
                self.engine().set_post(bug_id, &change, event.draft)
            })),
            HookKind::SetModified => Ok(self.per_bug(context, &change, |bug_id| {
                self.engine().set_modified(bug_id, &change)
            })),
            HookKind::UpdateTracker => Ok(self.per_bug(context, &change, |bug_id| {
                self.update_tracker(bug_id, &change, event)
            })),
        }
    }

    /// Run `check` once per bug referenced by `change`.
    fn per_bug(
        &self,
        context: HookContext,
        change: &Change,
        check: impl Fn(u64) -> Verdict,
    ) -> Report {
        let ids = bug_ids(&self.resolve_bug_urls(change));
        if ids.is_empty() {
            return Report::single(context, Verdict::ignore("no bug url/s found"));
        }
        debug!(?ids, "bugs referenced by the change");

        let mut report = Report::new(context);
        for bug_id in ids {
            report.push(check(bug_id));
        }
        report
    }

    fn engine(&self) -> StatusSyncEngine<'_> {
        StatusSyncEngine::new(
            self.collab.bugs,
            self.collab.changes,
            &self.settings.relevance,
            self.settings.tracker_id,
        )
    }

    /// The change for `event.commit`, preferring the one on `event.branch`
    /// when the commit was pushed to several branches.
    fn change_for(&self, event: &HookEvent) -> Result<Change, HookError> {
        let mut changes = self.collab.changes.query_changes(&event.commit)?;
        if changes.is_empty() {
            return Err(HookError::ChangeNotFound(event.commit.clone()));
        }
        let index = changes
            .iter()
            .position(|change| change.branch == event.branch)
            .unwrap_or(0);
        Ok(changes.swap_remove(index))
    }

    /// `Bug-Url`s of `change`. A revert carries the bugs of the commit it
    /// reverts; chains are followed until a commit without a revert line, an
    /// unknown or unreachable commit, or a commit already seen.
    fn resolve_bug_urls(&self, change: &Change) -> Vec<String> {
        let mut message = change.commit_message.clone().unwrap_or_default();
        let mut seen = HashSet::new();

        while let Some(sha) = reverted_commit(&message).map(str::to_string) {
            if !seen.insert(sha.clone()) {
                warn!(%sha, "revert cycle detected");
                break;
            }
            let reverted = match self.collab.changes.query_changes(&sha) {
                Ok(reverted) => reverted,
                Err(error) => {
                    warn!(%sha, %error, "reverted commit lookup failed, keeping current message");
                    break;
                }
            };
            let Some(original) = reverted.into_iter().find_map(|c| c.commit_message) else {
                debug!(%sha, "reverted commit not found, keeping current message");
                break;
            };
            debug!(%sha, "following revert");
            message = original;
        }

        bug_urls(&message, &self.settings.bz_server)
    }

    fn check_bug_url(&self, context: HookContext, urls: &[String], branch: &str) -> Report {
        let optional = BUG_URL_OPTIONAL.contains(&branch);
        if urls.is_empty() {
            let verdict = if optional {
                Verdict::ignore(format!(
                    "no bug url/s found (optional for '{branch}' branch, \
                     but mandatory for 'stable' branches)"
                ))
            } else {
                Verdict::warn("no bug url/s found")
            };
            return Report::single(context, verdict);
        }

        let mut report = Report::new(context);
        for url in urls {
            let Some(bug_id) = crate::bug_url::bug_id(url) else {
                report.push(Verdict::warn(format!("unable to find a bug id in '{url}'")));
                continue;
            };
            let verdict = match fetch_bug(self.collab.bugs, bug_id) {
                Ok(bug) if self.settings.relevance.is_relevant(&bug) => Verdict::ok(format!(
                    "classification: '{}', product: '{}'",
                    bug.classification, bug.product
                ))
                .for_bug(bug_id),
                Ok(bug) => Verdict::ignore(Relevance::not_relevant_detail(&bug)).for_bug(bug_id),
                // reported, but not held against the change where urls are optional
                Err(verdict) if optional => Verdict {
                    level: Level::Ignore,
                    ..verdict
                },
                Err(verdict) => verdict,
            };
            report.push(verdict);
        }
        report
    }

    fn check_product(&self, bug_id: u64, project: &str) -> Verdict {
        let bug = match fetch_bug(self.collab.bugs, bug_id) {
            Ok(bug) => bug,
            Err(verdict) => return verdict,
        };
        let verdict = if !self.settings.relevance.classification_allowed(&bug) {
            Verdict::ignore(format!(
                "not relevant for '{}' classification",
                bug.classification
            ))
        } else if bug.product == project {
            Verdict::ok(format!("product: {}", bug.product))
        } else {
            Verdict::warn(format!("wrong product: {}", bug.product))
        };
        verdict.for_bug(bug_id)
    }

    fn check_target_milestone(&self, bug_id: u64, branch: &str) -> Verdict {
        let bug = match fetch_bug(self.collab.bugs, bug_id) {
            Ok(bug) => bug,
            Err(verdict) => return verdict,
        };
        if !self.settings.relevance.classification_allowed(&bug) {
            return Verdict::ignore(format!(
                "not relevant for '{}' classification",
                bug.classification
            ))
            .for_bug(bug_id);
        }
        match_milestone(&bug, branch).for_bug(bug_id)
    }

    fn update_tracker(&self, bug_id: u64, change: &Change, event: &HookEvent) -> Verdict {
        let bug = match fetch_bug(self.collab.bugs, bug_id) {
            Ok(bug) => bug,
            Err(verdict) => return verdict,
        };
        if !self.settings.relevance.is_relevant(&bug) {
            return Verdict::ignore(Relevance::not_relevant_detail(&bug)).for_bug(bug_id);
        }

        let status = tracker_status(change, event.draft);
        let update = TrackerUpdate {
            ext_type_id: self.settings.tracker_id,
            ext_bz_bug_id: change.number.to_string(),
            description: Some(change.subject.clone()),
            status: Some(status.clone()),
            priority: Some(event.branch.clone()),
        };
        match upsert_tracker_on(self.collab.bugs, &bug, &update) {
            Ok(_) => Verdict::ok(format!("tracker status updated to '{status}'")).for_bug(bug_id),
            Err(error) => {
                warn!(bug_id, %error, "tracker update failed");
                Verdict::warn(format!("failed to update external tracker ({error})")).for_bug(bug_id)
            }
        }
    }
}

/// The status mirrored into the tracker: an uploaded, non-draft patch is
/// `POST`; anything else is reported as Gerrit has it.
fn tracker_status(change: &Change, draft: bool) -> String {
    if change.status == ChangeStatus::New && !draft {
        "POST".to_string()
    } else {
        change.status.to_string()
    }
}
