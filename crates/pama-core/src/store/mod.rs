//! Persistent project storage
//!
//! Projects are a cache, not a source of truth: the repository itself is
//! authoritative. Stores keep one record per project plus a pointer to the
//! current project, and wipe everything when the schema version changes.
//!
//! No inter-process locking is performed. Two processes mutating the same
//! store concurrently can lose updates.

mod sqlite;

pub use sqlite::SqliteStore;

use crate::model::Project;

/// Key prefix of project records.
pub const KEY_PREFIX: &str = "project.";

/// Key holding the key of the current project.
pub const CURRENT_KEY: &str = "current.project";

/// Key holding the schema version.
pub const VERSION_KEY: &str = "version.tag";

/// Schema version; bump whenever the encoded [`Project`] layout changes.
pub const VERSION_TAG: &str = "0001";

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Project '{name}' already exists.")]
    ProjectExists { name: String },

    #[error("Project '{name}' does not exist.")]
    ProjectNotFound { name: String },

    #[error("No (current) project found; run `pama init` first.")]
    NoCurrentProject,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable storage for [`Project`] records.
pub trait PersistentStorer {
    /// Save `project`. Fails if it exists and `overwrite` is false.
    fn store_project(&self, project: &Project, overwrite: bool) -> StoreResult<()>;

    fn delete_project(&self, name: &str) -> StoreResult<()>;

    /// Name of the current project, if one is set.
    fn current_name(&self) -> StoreResult<Option<String>>;

    /// Make `name` the current project.
    fn set_current(&self, name: &str) -> StoreResult<()>;

    /// Forget the current project pointer.
    fn clear_current(&self) -> StoreResult<()>;

    /// Record of the current project.
    fn current(&self) -> StoreResult<Project>;

    fn project(&self, name: &str) -> StoreResult<Project>;

    /// Names of all stored projects in key order.
    fn names(&self) -> StoreResult<Vec<String>>;

    /// All stored projects in key order.
    fn projects(&self) -> StoreResult<Vec<Project>>;
}

pub fn project_key(name: &str) -> String {
    format!("{KEY_PREFIX}{name}")
}

/// Project name from a project key; other keys yield `None`.
pub fn parse_key(key: &str) -> Option<&str> {
    key.strip_prefix(KEY_PREFIX)
}

pub(crate) fn encode(project: &Project) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(project)?)
}

pub(crate) fn decode(data: &[u8]) -> StoreResult<Project> {
    Ok(serde_json::from_slice(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        assert_eq!(project_key("aerc"), "project.aerc");
        assert_eq!(parse_key("project.aerc"), Some("aerc"));
        assert_eq!(parse_key(CURRENT_KEY), None);
        assert_eq!(parse_key(VERSION_KEY), None);
    }
}
