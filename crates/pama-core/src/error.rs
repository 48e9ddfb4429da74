//! Error types for pama-core

use std::path::PathBuf;

use crate::store::StoreError;

/// Result type for pama-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pama-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Persistent store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Revision control failure, surfaced verbatim
    #[error("revision control error: {0}")]
    RevCtrl(#[from] pama_git::Error),

    #[error("no current project set. Run `pama init` first")]
    NoCurrentProject,

    #[error("project '{name}' does not exist anymore. Run `pama init` or `pama switch`")]
    ProjectGone { name: String },

    #[error("Project '{name}' not found")]
    ProjectNotFound { name: String },

    #[error("No projects found.")]
    NoProjectsFound,

    #[error("Patch '{patch}' not found in project '{project}'")]
    PatchNotFound { patch: String, project: String },

    #[error("Patch name '{patch}' already exists.")]
    PatchExists { patch: String },

    #[error("no commits found for patch {patch}")]
    NothingApplied { patch: String },

    #[error("Aborting... There are unstaged changes or a rebase in progress")]
    NotClean,

    #[error("Cannot {action} patch. Please rebase first with `pama rebase`")]
    RebaseRequired { action: &'static str },

    #[error("Failed to {action} commits. {done} {removed} of {total}.")]
    PartialRemoval {
        action: &'static str,
        done: &'static str,
        removed: usize,
        total: usize,
    },

    #[error("cannot rebase on {id}. commit does not exist")]
    BaseNotFound { id: String },

    #[error("Commit hash is too short.")]
    HashTooShort,

    #[error("No commit found for hash {hash}")]
    CommitNotFound { hash: String },

    #[error("Project '{name}' has worktrees: {children}; unlink them first")]
    HasWorktrees { name: String, children: String },

    #[error("This is already a worktree.")]
    AlreadyWorktree,

    #[error("Unable to find the cache directory")]
    NoCacheDir,

    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
