use std::path::PathBuf;

use pg_core::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("unable to compare versions ('{left}', '{right}')")]
    NotComparable { left: String, right: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("git error: {0}")]
    Git(String),
    #[error("not a git repository: {0}")]
    NotGitRepo(PathBuf),
    #[error("bug {0} not found (private bug or bug doesn't exist)")]
    BugNotFound(u64),
    #[error("no change found for commit {0}")]
    ChangeNotFound(String),
}
