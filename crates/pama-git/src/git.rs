//! Git backend driven through the `git` binary

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use git2::{ErrorCode, Repository};

use crate::{Error, Result, controller::RevisionController};

/// Directories git creates while a rebase is paused.
const REBASE_MARKERS: [&str; 2] = ["rebase-merge", "rebase-apply"];

/// Revision controller for a git working tree.
///
/// Every call runs `git -C <root> ...` and blocks until it exits. History
/// rewrites are not retried.
#[derive(Debug, Clone)]
pub struct GitController {
    root: PathBuf,
}

impl GitController {
    /// Create a controller for the working tree at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Working tree root this controller operates on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the top-level work directory of the repository containing `path`.
    ///
    /// Returns `None` for bare repositories and paths outside any repository.
    /// Other discovery failures, such as a corrupt `.git`, are errors.
    pub fn discover(path: &Path) -> Result<Option<PathBuf>> {
        let repo = match Repository::discover(path) {
            Ok(repo) => repo,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // git2 reports the workdir with a trailing separator
        Ok(repo.workdir().map(|workdir| workdir.components().collect()))
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::trace!(root = %self.root.display(), ?args, "Running git");
        Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(|source| Error::Spawn {
                args: args.join(" "),
                source,
            })
    }

    /// Run a git command and return its trimmed stdout.
    fn git(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(Error::Command {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// Run a git command whose output is informational only.
    fn git_or_empty(&self, args: &[&str]) -> String {
        self.git(args).unwrap_or_default()
    }

    fn rebase_in_progress(&self) -> bool {
        REBASE_MARKERS.iter().any(|marker| {
            let Ok(rel) = self.git(&["rev-parse", "--git-path", marker]) else {
                return false;
            };
            let exists = self.root.join(rel).exists();
            if exists {
                tracing::error!(marker, "Another rebase in progress");
            }
            exists
        })
    }
}

impl RevisionController for GitController {
    fn head(&self) -> Result<String> {
        self.git(&["rev-list", "-n", "1", "HEAD"])
    }

    fn history(&self, commit: &str) -> Result<Vec<String>> {
        let range = format!("{commit}..HEAD");
        let out = self.git(&["rev-list", "--reverse", &range])?;
        Ok(out.split_whitespace().map(String::from).collect())
    }

    fn clean(&self) -> bool {
        if self.rebase_in_progress() {
            return false;
        }
        matches!(self.git(&["diff-index", "HEAD"]), Ok(out) if out.is_empty())
    }

    fn exists(&self, commit: &str) -> bool {
        self.output(&["merge-base", "--is-ancestor", commit, "HEAD"])
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn subject(&self, commit: &str) -> String {
        self.git_or_empty(&["log", "-1", "--pretty=%s", commit])
    }

    fn author(&self, commit: &str) -> String {
        self.git_or_empty(&["log", "-1", "--pretty=%an", commit])
    }

    fn date(&self, commit: &str) -> String {
        self.git_or_empty(&["log", "-1", "--pretty=%as", commit])
    }

    fn remove(&self, commit: &str) -> Result<()> {
        let parent = format!("{commit}^");
        let output = self.output(&["rebase", "--onto", &parent, commit])?;
        if !output.status.success() {
            tracing::warn!(
                commit,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git rebase failed"
            );
            return Err(Error::RemoveFailed {
                id: commit.to_string(),
            });
        }
        Ok(())
    }

    fn apply_cmd(&self) -> String {
        format!("git -C {} am -3 --empty drop", self.root.display())
    }

    fn create_worktree(&self, target: &Path, commit: &str) -> Result<()> {
        tracing::debug!(target = %target.display(), commit, "Creating worktree");
        let target = target.to_string_lossy();
        self.git(&["worktree", "add", "--detach", &target, commit])?;
        Ok(())
    }

    fn delete_worktree(&self, target: &Path) -> Result<()> {
        tracing::debug!(target = %target.display(), "Removing worktree");
        let target = target.to_string_lossy();
        self.git(&["worktree", "remove", "--force", &target])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_cmd_substitutes_root() {
        let rc = GitController::new("/src/project");
        assert_eq!(rc.apply_cmd(), "git -C /src/project am -3 --empty drop");
    }

    #[test]
    fn discover_outside_repository_is_none() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(GitController::discover(temp.path()).unwrap().is_none());
    }
}
