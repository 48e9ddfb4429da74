//! Patch tracking across history rewrites
//!
//! `pama-core` remembers which commits of a repository came from which
//! emailed patch set, and keeps that knowledge valid while the history is
//! rewritten by drops, removals and rebases.
//!
//! # Architecture
//!
//! ```text
//!                  pama-cli
//!                     |
//!                 pama-core
//!        +------+-----+------+-------+
//!        |      |     |      |       |
//!     manager store sheet naming  config
//!        |
//!     pama-git (RevisionController)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pama_core::{Config, PatchManager};
//!
//! let manager = PatchManager::new(&Config::load()?)?;
//! let project = manager.init("aerc", std::path::Path::new("."), false)?;
//! println!("{project}");
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod naming;
pub mod sheet;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use manager::PatchManager;
pub use model::{Commit, CommitsExt, Project, ProjectView, UNTRACKED, WorktreeParent};
pub use naming::{make_unique, project_from_subject, propose_patch_names};
pub use sheet::RebaseSheet;
pub use store::{PersistentStorer, SqliteStore, StoreError};
