//! Error types for pama-git

use std::path::PathBuf;

/// Result type for pama-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pama-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("failed to run `git {args}`: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {args}` failed: {stderr}")]
    Command { args: String, stderr: String },

    #[error("failed to remove commit {id}")]
    RemoveFailed { id: String },

    #[error("no supported repository found in {path}")]
    Unsupported { path: PathBuf },

    #[error("cannot create revision control instance for backend '{id}'")]
    UnknownBackend { id: String },
}
