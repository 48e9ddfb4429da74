//! Revision control abstraction for the patch manager
//!
//! Supports multiple version control backends through a unified interface.
//! Backends are looked up by id in a [`Registry`]; `git` is the only one
//! shipped today.

pub mod controller;
pub mod error;
pub mod git;
pub mod registry;

pub use controller::RevisionController;
pub use error::{Error, Result};
pub use git::GitController;
pub use registry::{Backend, Registry};
