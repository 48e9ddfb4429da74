//! Drop and remove commands

use colored::Colorize;
use pama_core::PatchManager;

use crate::error::Result;

/// Run the drop command
pub fn run_drop(mgr: &PatchManager, tag: &str) -> Result<()> {
    mgr.drop_patch(tag)?;
    println!("{} Patch {} dropped", "OK".green().bold(), tag.cyan());
    Ok(())
}

/// Run the remove command
pub fn run_remove(mgr: &PatchManager, tag: &str) -> Result<()> {
    mgr.remove_patch(tag)?;
    println!("{} Patch {} removed", "OK".green().bold(), tag.cyan());
    Ok(())
}
