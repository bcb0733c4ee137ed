use clap::{ArgAction, Args, Subcommand};
use pg_core::HookKind;

/// One subcommand per hook.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Require a Bug-Url trailer on stable branches and check the bugs exist.
    CheckBugUrl(HookArgs),
    /// Check that each bug's product matches the project.
    CheckProduct(HookArgs),
    /// Check that each bug targets a milestone for the change's branch.
    CheckTargetMilestone(HookArgs),
    /// Check that the change was cherry-picked to every newer stable branch.
    CheckBackport(HookArgs),
    /// Move referenced bugs to POST.
    SetPost(HookArgs),
    /// Move referenced bugs to MODIFIED once every tracked patch is merged.
    SetModified(HookArgs),
    /// Add or refresh the Gerrit tracker record on referenced bugs.
    UpdateTracker(HookArgs),
}

impl Commands {
    #[must_use]
    pub const fn hook(&self) -> (HookKind, &HookArgs) {
        match self {
            Self::CheckBugUrl(args) => (HookKind::CheckBugUrl, args),
            Self::CheckProduct(args) => (HookKind::CheckProduct, args),
            Self::CheckTargetMilestone(args) => (HookKind::CheckTargetMilestone, args),
            Self::CheckBackport(args) => (HookKind::CheckBackport, args),
            Self::SetPost(args) => (HookKind::SetPost, args),
            Self::SetModified(args) => (HookKind::SetModified, args),
            Self::UpdateTracker(args) => (HookKind::UpdateTracker, args),
        }
    }
}

/// Arguments Gerrit passes to `patchset-created`, `change-merged` and
/// `comment-added` hooks.
#[derive(Args, Clone, Debug)]
pub struct HookArgs {
    /// Change identifier (`project~branch~I...`).
    #[arg(long)]
    pub change: String,

    #[arg(long)]
    pub project: String,

    #[arg(long)]
    pub branch: String,

    /// Commit sha of the patch set.
    #[arg(long)]
    pub commit: String,

    #[arg(long)]
    pub change_url: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub uploader: Option<String>,

    #[arg(long)]
    pub patchset: Option<String>,

    #[arg(long)]
    pub topic: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,

    #[arg(long)]
    pub change_owner: Option<String>,

    /// Change is private.
    #[arg(long, action = ArgAction::Set, default_value_t = false, value_name = "BOOL")]
    pub private: bool,

    /// Patch set is a draft (older Gerrit releases).
    #[arg(long, action = ArgAction::Set, default_value_t = false, value_name = "BOOL")]
    pub is_draft: bool,

    #[arg(long, hide = true)]
    pub kind: Option<String>,

    #[arg(long, hide = true)]
    pub change_owner_username: Option<String>,

    #[arg(long, hide = true)]
    pub uploader_username: Option<String>,

    #[arg(long, hide = true)]
    pub author_username: Option<String>,

    #[arg(long, hide = true)]
    pub submitter: Option<String>,

    #[arg(long, hide = true)]
    pub submitter_username: Option<String>,

    #[arg(long, hide = true)]
    pub newrev: Option<String>,
}

impl HookArgs {
    /// Either flag marks the patch set as not yet public.
    #[must_use]
    pub const fn draft(&self) -> bool {
        self.private || self.is_draft
    }

    #[must_use]
    pub fn event(&self) -> pg_hooks::HookEvent {
        pg_hooks::HookEvent {
            project: self.project.clone(),
            branch: self.branch.clone(),
            commit: self.commit.clone(),
            draft: self.draft(),
        }
    }
}
