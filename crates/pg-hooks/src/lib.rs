//! # pg-hooks
//!
//! The checks and status updates behind each patchgate Gerrit hook.
//!
//! - Release-branch ordering and the set of branches newer than a given one
//! - Backport completeness across those branches
//! - Bug relevance, target milestone and product checks
//! - Forward-only bug status sync and external tracker upsert
//! - `Bug-Url` extraction with revert following
//!
//! Remote systems are reached only through the `pg_core` collaborator
//! traits. The `gix` dependency is isolated here behind [`GitBranches`].

pub mod backport;
pub mod bug_url;
pub mod catalog;
pub mod classifier;
pub mod error;
pub mod fakes;
pub mod hooks;
pub mod milestone;
pub mod repo;
pub mod status;
pub mod tracker;
pub mod version;

pub use backport::{BackportReconciler, BranchBuckets};
pub use catalog::BranchCatalog;
pub use classifier::Relevance;
pub use error::HookError;
pub use hooks::{Collaborators, HookEvent, HookRunner, HookSettings};
pub use milestone::match_milestone;
pub use repo::GitBranches;
pub use status::StatusSyncEngine;
pub use tracker::{TrackerOutcome, UpsertKind, upsert_tracker};
pub use version::is_newer;
