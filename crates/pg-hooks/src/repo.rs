use std::path::{Path, PathBuf};

use pg_core::{BranchSource, TransportError};
use tracing::debug;

use crate::error::HookError;

/// Local branches of the repository a hook runs against.
///
/// Gerrit runs hooks with `GIT_DIR` pointing at the bare repository, so the
/// path is opened as-is instead of being discovered from a work tree.
#[derive(Debug, Clone)]
pub struct GitBranches {
    git_dir: PathBuf,
}

impl GitBranches {
    pub fn new(git_dir: impl Into<PathBuf>) -> Self {
        Self {
            git_dir: git_dir.into(),
        }
    }

    #[must_use]
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Short names of every `refs/heads/*` reference.
    ///
    /// # Errors
    ///
    /// [`HookError::NotGitRepo`] if the path is not a repository,
    /// [`HookError::Git`] if the references cannot be read.
    pub fn branches(&self) -> Result<Vec<String>, HookError> {
        let repo =
            gix::open(&self.git_dir).map_err(|_| HookError::NotGitRepo(self.git_dir.clone()))?;
        let references = repo
            .references()
            .map_err(|e| HookError::Git(format!("read references: {e}")))?;

        let mut branches = Vec::new();
        for reference in references
            .local_branches()
            .map_err(|e| HookError::Git(format!("iterate branches: {e}")))?
        {
            let reference = reference.map_err(|e| HookError::Git(format!("read branch: {e}")))?;
            branches.push(reference.name().shorten().to_string());
        }
        debug!(count = branches.len(), git_dir = %self.git_dir.display(), "listed branches");
        Ok(branches)
    }
}

impl BranchSource for GitBranches {
    fn list_branches(&self) -> Result<Vec<String>, TransportError> {
        self.branches()
            .map_err(|e| TransportError::new("git", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::process::Command;

    use super::*;

    fn run_git(repo_path: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_path)
            .output()
            .unwrap_or_else(|e| panic!("git {} failed: {}", args.join(" "), e));
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    #[test]
    fn lists_local_branches_by_short_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let repo_path = dir.path();
        run_git(repo_path, &["init", "--initial-branch=master"]);
        run_git(repo_path, &["config", "user.email", "hooks@example.org"]);
        run_git(repo_path, &["config", "user.name", "Hooks Test"]);
        std::fs::write(repo_path.join("README"), "readme\n").unwrap();
        run_git(repo_path, &["add", "."]);
        run_git(repo_path, &["commit", "-m", "initial commit"]);
        run_git(repo_path, &["branch", "ovirt-engine-4.1"]);
        run_git(repo_path, &["branch", "ovirt-engine-4.1.3"]);
        run_git(repo_path, &["tag", "ovirt-engine-4.1.2"]);

        let mut branches = GitBranches::new(repo_path.join(".git"))
            .list_branches()
            .unwrap();
        branches.sort();
        assert_eq!(branches, ["master", "ovirt-engine-4.1", "ovirt-engine-4.1.3"]);
    }

    #[test]
    fn not_a_repository() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = GitBranches::new(dir.path()).branches().unwrap_err();
        assert!(matches!(err, HookError::NotGitRepo(_)));
    }
}
