//! Shared test utilities for the pama workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] : real git repositories with scripted history
//! - [`mocks`] : in-memory [`MockRevCtrl`] and [`MockStore`] plus a
//!   [`manager`] wired to them

pub mod git;
pub mod mocks;

pub use mocks::{MockRevCtrl, MockStore, commit, manager, project};
