use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use pg_bugzilla::BugzillaClient;
use pg_config::PatchgateConfig;
use pg_core::{HookContext, HookKind, Report};
use pg_gerrit::{GerritClient, ReviewRequest};
use pg_hooks::{Collaborators, GitBranches, HookRunner, HookSettings, Relevance};
use tracing::{debug, info};

use crate::cli::{GlobalFlags, HookArgs};
use crate::output::{output, review_message};

/// Run one hook against the live Bugzilla, Gerrit and repository.
pub fn run(hook: HookKind, args: &HookArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let git_dir = flags.git_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = PatchgateConfig::load(Some(git_dir.as_path()), flags.config.as_deref())
        .context("failed to load patchgate configuration")?;
    config.ensure_complete()?;
    debug!(
        change = %args.change,
        patchset = ?args.patchset,
        kind = ?args.kind,
        change_url = ?args.change_url,
        change_owner = ?args.change_owner.as_ref().or(args.change_owner_username.as_ref()),
        uploader = ?args.uploader.as_ref().or(args.uploader_username.as_ref()),
        author = ?args.author.as_ref().or(args.author_username.as_ref()),
        submitter = ?args.submitter.as_ref().or(args.submitter_username.as_ref()),
        newrev = ?args.newrev,
        topic = ?args.topic,
        comment = ?args.comment,
        tracker = %config.tracker.description,
        "hook arguments"
    );

    let bugzilla = BugzillaClient::new(
        config.bugzilla.endpoint(),
        Duration::from_secs(config.bugzilla.timeout_secs),
    )
    .context("failed to create Bugzilla client")?
    .with_credentials(&config.bugzilla.user, &config.bugzilla.password);
    let gerrit = GerritClient::new(&config.gerrit.server, config.gerrit.port);
    let branches = GitBranches::new(&git_dir);
    debug!(
        bugzilla = bugzilla.endpoint(),
        gerrit = gerrit.server(),
        git_dir = %branches.git_dir().display(),
        "collaborators"
    );

    let settings = HookSettings {
        relevance: Relevance::new(
            config.relevance.classifications.iter().map(String::as_str),
            config.relevance.products.iter().map(String::as_str),
        ),
        tracker_id: config.tracker.id,
        bz_server: config.bugzilla.server.clone(),
    };
    let collab = Collaborators {
        changes: &gerrit,
        branches: &branches,
        bugs: &bugzilla,
    };

    let context = match &flags.header {
        Some(header) => HookContext::new(hook).with_header(header),
        None => HookContext::new(hook),
    };
    let event = args.event();
    let report = HookRunner::new(collab, &settings)
        .run(context, &event)
        .with_context(|| format!("hook {hook} failed for commit {}", event.commit))?;

    output(&report, flags.format)?;
    if flags.post_review {
        post_review(&gerrit, &report, args)?;
    }
    Ok(())
}

fn post_review(gerrit: &GerritClient, report: &Report, args: &HookArgs) -> anyhow::Result<()> {
    let message = review_message(report);
    let review = ReviewRequest {
        commit: &args.commit,
        project: &args.project,
        message: &message,
        scores: report.scores(),
    };
    gerrit
        .review(&review)
        .with_context(|| format!("failed to post review on {}", args.commit))?;
    info!(commit = %args.commit, verified = review.scores.verified, "review posted");
    Ok(())
}
