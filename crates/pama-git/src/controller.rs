//! Revision controller trait

use std::path::Path;

use crate::Result;

/// Trait for backend-agnostic revision control operations.
///
/// Commit ids are the backend's content-addressed hashes. They are not
/// stable: any history rewrite (`remove`, `drop_commit`, an external
/// rebase) reassigns the ids of every commit after the rewritten one.
pub trait RevisionController {
    /// Id of the HEAD commit.
    fn head(&self) -> Result<String>;

    /// Ids between `commit` (exclusive) and HEAD (inclusive).
    ///
    /// Ordered from "earlier" to "later"; the last element is HEAD.
    fn history(&self, commit: &str) -> Result<Vec<String>>;

    /// True when there are no unstaged changes and no history rewrite is
    /// in progress.
    fn clean(&self) -> bool;

    /// True if `commit` is reachable from HEAD.
    fn exists(&self, commit: &str) -> bool;

    /// Subject line of `commit`, empty if unavailable.
    fn subject(&self, commit: &str) -> String;

    /// Author name of `commit`, empty if unavailable.
    fn author(&self, commit: &str) -> String;

    /// Short date of `commit`, empty if unavailable.
    fn date(&self, commit: &str) -> String;

    /// Excise `commit` from history, rewriting all descendants.
    fn remove(&self, commit: &str) -> Result<()>;

    /// Discard `commit` from history.
    ///
    /// Shrinks history by exactly one commit, like [`remove`](Self::remove).
    fn drop_commit(&self, commit: &str) -> Result<()> {
        self.remove(commit)
    }

    /// Shell command that applies a mailbox read from stdin.
    fn apply_cmd(&self) -> String;

    /// Check out `commit` into a new detached worktree at `target`.
    fn create_worktree(&self, target: &Path, commit: &str) -> Result<()>;

    /// Remove the worktree at `target`.
    fn delete_worktree(&self, target: &Path) -> Result<()>;
}
