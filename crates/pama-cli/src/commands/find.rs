//! Find command

use colored::Colorize;
use pama_core::PatchManager;

use crate::error::Result;

/// Run the find command
pub fn run_find(mgr: &PatchManager, hash: &str) -> Result<()> {
    let p = mgr.current_project()?;
    let commit = mgr.find(hash.trim(), &p)?;

    println!("{commit}");
    if commit.untracked() {
        println!("   Patch: {}", "(untracked)".dimmed());
    } else {
        println!("   Patch: {}", commit.tag.cyan());
    }
    Ok(())
}
