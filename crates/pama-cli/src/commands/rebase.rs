//! Rebase command: edit patch tags of the commits since the base

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use colored::Colorize;
use pama_core::{PatchManager, RebaseSheet};

use crate::error::{CliError, Result};

/// Run the rebase command
pub fn run_rebase(mgr: &PatchManager, editor: &str, commit: Option<&str>) -> Result<()> {
    let current = mgr.current_project()?;
    let base = commit.unwrap_or(&current.base.id).to_string();

    let commits = mgr.rebase_commits(&current, &base)?;
    if commits.is_empty() {
        mgr.save_rebased(current, &base, Vec::new())?;
        println!("{} No commits to rebase.", "=>".blue().bold());
        return Ok(());
    }

    let sheet = RebaseSheet::new(commits);
    let mut file = tempfile::Builder::new()
        .prefix("pama-rebase-")
        .tempfile()?;
    file.write_all(sheet.render().as_bytes())?;
    file.flush()?;

    edit(editor, file.path())?;

    let edited = fs::read_to_string(file.path())?;
    let p = mgr.save_rebased(current, &base, sheet.parse(&edited))?;
    println!(
        "{} Successfully rebased on {:<6.6} ({} tracked commit(s))",
        "OK".green().bold(),
        p.base.id,
        p.commits.len()
    );
    Ok(())
}

/// Open `path` in `editor` and wait for it to exit.
fn edit(editor: &str, path: &Path) -> Result<()> {
    let script = format!("{editor} '{}'", path.display());
    tracing::debug!(%script, "Running editor");
    let status = Command::new("sh").arg("-c").arg(&script).status()?;
    if !status.success() {
        return Err(CliError::user("Quitting rebase without saving."));
    }
    Ok(())
}
