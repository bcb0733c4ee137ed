//! Hook identity, threaded through every check as an explicit value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The gating checks a Gerrit hook invocation can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    CheckBugUrl,
    CheckProduct,
    CheckTargetMilestone,
    CheckBackport,
    SetPost,
    SetModified,
    UpdateTracker,
}

impl HookKind {
    pub const ALL: [Self; 7] = [
        Self::CheckBugUrl,
        Self::CheckProduct,
        Self::CheckTargetMilestone,
        Self::CheckBackport,
        Self::SetPost,
        Self::SetModified,
        Self::UpdateTracker,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CheckBugUrl => "check_bug_url",
            Self::CheckProduct => "check_product",
            Self::CheckTargetMilestone => "check_target_milestone",
            Self::CheckBackport => "check_backport",
            Self::SetPost => "set_post",
            Self::SetModified => "set_modified",
            Self::UpdateTracker => "update_tracker",
        }
    }

    /// Header prefixed to every message this hook produces.
    #[must_use]
    pub const fn default_header(self) -> &'static str {
        match self {
            Self::CheckBugUrl => "* Check Bug-Url",
            Self::CheckProduct => "* Check Product",
            Self::CheckTargetMilestone => "* Check TM",
            Self::CheckBackport => "* Check Backport",
            Self::SetPost => "* Update BZ to POST",
            Self::SetModified => "* Set MODIFIED",
            Self::UpdateTracker => "* Update Tracker",
        }
    }

    /// Hooks that are not a gating concern on mainline branches.
    #[must_use]
    pub const fn ignores_master(self) -> bool {
        matches!(
            self,
            Self::CheckProduct | Self::CheckTargetMilestone | Self::SetModified
        )
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookKind {
    type Err = String;

    /// Accepts both `set_post` and `set-post`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown hook '{s}'"))
    }
}

/// Which hook is running and how its messages are tagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookContext {
    pub hook: HookKind,
    pub header: String,
}

impl HookContext {
    #[must_use]
    pub fn new(hook: HookKind) -> Self {
        Self {
            hook,
            header: hook.default_header().to_string(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_spellings() {
        assert_eq!("set_post".parse::<HookKind>(), Ok(HookKind::SetPost));
        assert_eq!(
            "check-target-milestone".parse::<HookKind>(),
            Ok(HookKind::CheckTargetMilestone)
        );
        assert!("set_verified".parse::<HookKind>().is_err());
    }

    #[test]
    fn every_kind_round_trips_through_its_name() {
        for kind in HookKind::ALL {
            assert_eq!(kind.as_str().parse::<HookKind>(), Ok(kind));
        }
    }

    #[test]
    fn context_header_override() {
        let ctx = HookContext::new(HookKind::CheckBackport);
        assert_eq!(ctx.header, "* Check Backport");
        let ctx = ctx.with_header("* Backport");
        assert_eq!(ctx.header, "* Backport");
        assert_eq!(ctx.hook, HookKind::CheckBackport);
    }
}
