//! # pg-core
//!
//! Core types shared across every patchgate crate:
//! - Records for the external entities a hook reads and writes
//!   (`Change`, `Bug`, `ExternalTracker`)
//! - Status enums with their transition tables
//! - `Verdict` and `Report`, the uniform output of every check
//! - `HookKind` / `HookContext`, threaded through each component call
//! - Collaborator traits implemented by the transport crates

pub mod collab;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod hook;
pub mod serde_ext;
pub mod verdict;

pub use collab::{BranchSource, BugTracker, ChangeSource};
pub use entities::{Bug, BugFlag, Change, ExternalTracker, TrackerType, TrackerUpdate};
pub use enums::{BugStatus, ChangeStatus};
pub use errors::TransportError;
pub use hook::{HookContext, HookKind};
pub use verdict::{Level, Report, ReviewScores, Verdict};
