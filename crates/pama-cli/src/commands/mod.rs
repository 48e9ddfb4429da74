//! Command implementations for pama-cli

pub mod apply;
pub mod excise;
pub mod find;
pub mod project;
pub mod propose;
pub mod rebase;

pub use apply::{ApplyArgs, run_apply};
pub use excise::{run_drop, run_remove};
pub use find::run_find;
pub use project::{run_delete, run_init, run_list, run_switch, run_unlink};
pub use propose::run_propose;
pub use rebase::run_rebase;
