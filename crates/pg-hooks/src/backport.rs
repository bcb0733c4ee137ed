//! Backport completeness: is a change present on every newer stable branch?

use std::collections::BTreeSet;

use pg_core::{Change, ChangeSource, Verdict};
use tracing::debug;

use crate::catalog::BranchCatalog;
use crate::error::HookError;

/// Where the siblings of a change (same Change-Id, other branches) stand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchBuckets {
    /// Newer branches with no sibling at all.
    pub missing: BTreeSet<String>,
    /// Newer branches whose sibling is still under review.
    pub open_on_sibling: BTreeSet<String>,
    /// Newer branches whose sibling is merged.
    pub closed_on_sibling: BTreeSet<String>,
    /// Branches carrying a sibling without being newer than the current one.
    pub not_relevant: BTreeSet<String>,
}

impl BranchBuckets {
    /// Sort `changes` into buckets relative to `newer`, ignoring the change on
    /// `current` itself.
    ///
    /// A sibling on a newer branch that is neither merged nor open (for
    /// instance abandoned) leaves `missing` without joining another bucket.
    #[must_use]
    pub fn partition(changes: &[Change], newer: &BTreeSet<String>, current: &str) -> Self {
        let mut buckets = Self {
            missing: newer.clone(),
            ..Self::default()
        };

        for change in changes {
            let branch = &change.branch;
            if branch == current {
                continue;
            }
            if !newer.contains(branch) {
                buckets.not_relevant.insert(branch.clone());
                continue;
            }
            if change.status.is_merged() {
                buckets.closed_on_sibling.insert(branch.clone());
            } else if change.open {
                buckets.open_on_sibling.insert(branch.clone());
            }
            buckets.missing.remove(branch);
        }
        buckets
    }

    /// `missing` or `open_on_sibling` warn; otherwise OK. Siblings on
    /// unrelated branches are reported either way.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        let mut verdict = if !self.missing.is_empty() || !self.open_on_sibling.is_empty() {
            let mut detail =
                String::from("The patch wasn't backported to all the relevant stable branches.");
            if !self.open_on_sibling.is_empty() {
                detail.push_str(&format!(
                    " It is still open in the following {}.",
                    join_branches(&self.open_on_sibling)
                ));
            }
            if !self.missing.is_empty() {
                detail.push_str(&format!(
                    " It is missing from the following {}.",
                    join_branches(&self.missing)
                ));
            }
            Verdict::warn(detail)
        } else if !self.closed_on_sibling.is_empty() {
            Verdict::ok("The patch was backported to all the relevant stable branches.")
        } else {
            Verdict::ok("No newer stable branches require this patch.")
        };

        if !self.not_relevant.is_empty() {
            verdict.detail.push_str(&format!(
                " In addition the patch was found in the following {}.",
                join_branches(&self.not_relevant)
            ));
        }
        verdict
    }
}

/// `branch: 'a'` or `branches: 'a, b'`.
fn join_branches(branches: &BTreeSet<String>) -> String {
    let word = if branches.len() > 1 { "branches" } else { "branch" };
    let names = branches.iter().map(String::as_str).collect::<Vec<_>>();
    format!("{word}: '{}'", names.join(", "))
}

pub struct BackportReconciler<'a> {
    catalog: BranchCatalog<'a>,
    changes: &'a dyn ChangeSource,
}

impl<'a> BackportReconciler<'a> {
    pub const fn new(catalog: BranchCatalog<'a>, changes: &'a dyn ChangeSource) -> Self {
        Self { catalog, changes }
    }

    /// Check that `change_id` reached every branch newer than
    /// `current_branch` within `project`.
    ///
    /// # Errors
    ///
    /// [`HookError::Transport`] if the branch listing or the change query
    /// fails; there is no meaningful verdict without them.
    pub fn reconcile(
        &self,
        change_id: &str,
        project: &str,
        current_branch: &str,
    ) -> Result<Verdict, HookError> {
        if current_branch.contains(crate::version::MASTER) {
            return Ok(Verdict::ignore(format!(
                "not relevant for branch: {current_branch}"
            )));
        }

        let newer = self.catalog.newer_branches(current_branch)?;
        let siblings = self
            .changes
            .query_changes(&format!("{change_id} project:{project}"))?;
        let buckets = BranchBuckets::partition(&siblings, &newer, current_branch);
        debug!(?buckets, "partitioned sibling changes");
        Ok(buckets.verdict())
    }
}
