//! Target milestone versus branch.
//!
//! Both sides are reduced to their first `X.Y` signature. A side without one
//! (`master`, `ovirt-future`) counts as [`SENTINEL`], newer than any release.

use std::cmp::Ordering;
use std::sync::LazyLock;

use pg_core::{Bug, Verdict, entities::UNSET_MILESTONE};
use regex::Regex;
use tracing::debug;

static MAJOR_MINOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)").expect("valid major.minor pattern"));

/// Signature of anything without an `X.Y` in it.
pub const SENTINEL: MajorMinor = MajorMinor {
    major: 999,
    minor: 999,
};

/// An `X.Y` release signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MajorMinor {
    pub major: u32,
    pub minor: u32,
}

impl std::fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// First `X.Y` in `name`, or [`SENTINEL`].
#[must_use]
pub fn major_minor(name: &str) -> MajorMinor {
    MAJOR_MINOR
        .captures(name)
        .and_then(|caps| {
            Some(MajorMinor {
                major: caps[1].parse().ok()?,
                minor: caps[2].parse().ok()?,
            })
        })
        .unwrap_or(SENTINEL)
}

/// `release` appears in `name` without a digit glued to either side, so
/// `4.1` is found in `ovirt-4.1.z?` but not in `ovirt-4.10.z?`.
fn names_release(name: &str, release: &str) -> bool {
    name.match_indices(release).any(|(start, _)| {
        let before = name[..start].chars().next_back();
        let after = name[start + release.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
    })
}

/// Does the bug's target milestone fit a change on `branch`?
///
/// A branch newer than the milestone is still fine when the bug carries a
/// clone-candidate flag for the milestone's release.
#[must_use]
pub fn match_milestone(bug: &Bug, branch: &str) -> Verdict {
    let Some(milestone) = bug.milestone() else {
        return Verdict::warn(format!("target milestone: '{UNSET_MILESTONE}'"));
    };

    let on_branch = major_minor(branch);
    let on_milestone = major_minor(milestone);
    debug!(%on_branch, %on_milestone, "comparing release signatures");

    let verdict = match on_branch.cmp(&on_milestone) {
        Ordering::Equal => Verdict::ok("target milestone"),
        Ordering::Greater => {
            let release = on_milestone.to_string();
            match bug.flags.iter().find(|flag| names_release(&flag.name, &release)) {
                Some(flag) => Verdict::ok(format!(
                    "found clone candidate '{}' for target milestone",
                    flag.name
                )),
                None => Verdict::warn("no clone candidate for target milestone"),
            }
        }
        Ordering::Less => Verdict::warn("wrong target milestone"),
    };
    Verdict {
        detail: format!("{}: '{milestone}'", verdict.detail),
        ..verdict
    }
}

#[cfg(test)]
mod tests {
    use pg_core::{BugFlag, BugStatus, Level};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fakes::bug;

    fn flagged(milestone: &str, flags: &[&str]) -> Bug {
        Bug {
            flags: flags
                .iter()
                .map(|name| BugFlag {
                    name: (*name).to_string(),
                    status: "?".to_string(),
                })
                .collect(),
            ..bug(1, BugStatus::New, milestone)
        }
    }

    #[test]
    fn signatures() {
        assert_eq!(major_minor("ovirt-engine-4.1"), MajorMinor { major: 4, minor: 1 });
        assert_eq!(major_minor("ovirt-4.1.3"), MajorMinor { major: 4, minor: 1 });
        assert_eq!(major_minor("ovirt-engine-4.10"), MajorMinor { major: 4, minor: 10 });
        assert_eq!(major_minor("master"), SENTINEL);
        assert_eq!(major_minor("ovirt-future"), SENTINEL);
    }

    #[test]
    fn integer_comparison_not_decimal() {
        assert!(major_minor("4.10") > major_minor("4.9"));
    }

    #[test]
    fn unset_milestone_warns() {
        let verdict = match_milestone(&bug(1, BugStatus::New, "---"), "ovirt-engine-4.1");
        assert_eq!(verdict, Verdict::warn("target milestone: '---'"));

        let verdict = match_milestone(&bug(1, BugStatus::New, ""), "ovirt-engine-4.1");
        assert!(verdict.is_warn());
    }

    #[test]
    fn same_release_is_ok() {
        let verdict = match_milestone(&bug(1, BugStatus::New, "ovirt-4.1.3"), "ovirt-engine-4.1");
        assert_eq!(verdict, Verdict::ok("target milestone: 'ovirt-4.1.3'"));
    }

    #[test]
    fn newer_branch_with_clone_candidate_is_ok() {
        let verdict = match_milestone(
            &flagged("ovirt-4.1.3", &["blocker", "clone-4.1"]),
            "ovirt-engine-4.2",
        );
        assert_eq!(
            verdict,
            Verdict::ok("found clone candidate 'clone-4.1' for target milestone: 'ovirt-4.1.3'")
        );
    }

    #[test]
    fn newer_branch_without_clone_candidate_warns() {
        let verdict = match_milestone(&flagged("ovirt-4.1.3", &["ovirt-4.2?"]), "ovirt-engine-4.2");
        assert_eq!(
            verdict,
            Verdict::warn("no clone candidate for target milestone: 'ovirt-4.1.3'")
        );
    }

    #[test]
    fn clone_candidate_needs_the_exact_release() {
        let verdict = match_milestone(
            &flagged("ovirt-4.1.3", &["ovirt-4.10.z?", "ovirt-14.1?"]),
            "ovirt-engine-4.2",
        );
        assert_eq!(
            verdict,
            Verdict::warn("no clone candidate for target milestone: 'ovirt-4.1.3'")
        );

        let verdict = match_milestone(
            &flagged("ovirt-4.1.3", &["ovirt-4.10.z?", "ovirt-4.1.z?"]),
            "ovirt-engine-4.2",
        );
        assert_eq!(
            verdict,
            Verdict::ok("found clone candidate 'ovirt-4.1.z?' for target milestone: 'ovirt-4.1.3'")
        );
    }

    #[test]
    fn release_boundaries() {
        assert!(names_release("clone-4.1", "4.1"));
        assert!(names_release("4.1", "4.1"));
        assert!(!names_release("ovirt-4.10", "4.1"));
        assert!(!names_release("ovirt-14.1", "4.1"));
    }

    #[test]
    fn master_counts_as_newest() {
        let verdict = match_milestone(&bug(1, BugStatus::New, "ovirt-4.2.0"), "master");
        assert_eq!(verdict.level, Level::Warn);
        assert!(verdict.detail.starts_with("no clone candidate"));
    }

    #[test]
    fn older_branch_is_wrong_milestone() {
        let verdict = match_milestone(&bug(1, BugStatus::New, "ovirt-4.2.0"), "ovirt-engine-4.1");
        assert_eq!(verdict, Verdict::warn("wrong target milestone: 'ovirt-4.2.0'"));
    }
}
