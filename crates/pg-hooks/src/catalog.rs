//! Which release branches are newer than a given one.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use pg_core::BranchSource;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::HookError;
use crate::version::is_newer;

/// `ovirt-engine-4.1.2`: a micro-point release branch, never a backport target.
static MICRO_BRANCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^.]*-\d+\.\d+\.").expect("valid micro branch pattern"));

pub struct BranchCatalog<'a> {
    source: &'a dyn BranchSource,
}

impl<'a> BranchCatalog<'a> {
    pub fn new(source: &'a dyn BranchSource) -> Self {
        Self { source }
    }

    /// Branches newer than `current`, micro-point branches excluded.
    ///
    /// Branches whose names cannot be compared are dropped and logged rather
    /// than failing the whole check.
    ///
    /// # Errors
    ///
    /// [`HookError::Transport`] if the branch listing fails.
    pub fn newer_branches(&self, current: &str) -> Result<BTreeSet<String>, HookError> {
        let mut newer = BTreeSet::new();
        for branch in self.source.list_branches()? {
            if is_micro_branch(&branch) {
                continue;
            }
            match is_newer(&branch, current) {
                Ok(true) => {
                    newer.insert(branch);
                }
                Ok(false) => {}
                Err(error) => warn!(%branch, %error, "skipping branch with unparseable version"),
            }
        }
        debug!(current, ?newer, "resolved newer branches");
        Ok(newer)
    }
}

#[must_use]
pub fn is_micro_branch(branch: &str) -> bool {
    MICRO_BRANCH.is_match(branch)
}
