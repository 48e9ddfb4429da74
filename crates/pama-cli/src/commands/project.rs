//! Project commands: init, list, switch, delete, unlink

use std::path::Path;

use colored::Colorize;
use pama_core::PatchManager;

use crate::error::{CliError, Result};

/// Run the init command
pub fn run_init(mgr: &PatchManager, cwd: &Path, name: Option<&str>, force: bool) -> Result<()> {
    let name = match name {
        Some(name) => name.to_string(),
        None => cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| CliError::user("Cannot derive a project name from this directory"))?,
    };

    let project = mgr.init(&name, cwd, force)?;
    println!(
        "{} Project {} initialized at {}",
        "OK".green().bold(),
        project.name.cyan(),
        project.root
    );
    println!("   Base: {}", project.base);
    Ok(())
}

/// Run the list command
pub fn run_list(mgr: &PatchManager, all: bool, filter: Option<&str>) -> Result<()> {
    let current = mgr.current_project()?;
    let projects = if all || filter.is_some() {
        mgr.projects(filter.unwrap_or(""))?
    } else {
        vec![current.clone()]
    };

    println!("{} Current project: {}", "=>".blue().bold(), current.name.cyan());
    print!("{}", mgr.list_projects(&projects));
    Ok(())
}

/// Run the switch command
pub fn run_switch(mgr: &PatchManager, name: &str) -> Result<()> {
    mgr.switch_project(name)?;
    println!("{} Switched to project {}", "OK".green().bold(), name.cyan());
    Ok(())
}

/// Resolve an optional project name to the current project.
fn name_or_current(mgr: &PatchManager, name: Option<&str>) -> Result<String> {
    match name {
        Some(name) => Ok(name.to_string()),
        None => Ok(mgr.current_project()?.name),
    }
}

/// Run the delete command
pub fn run_delete(mgr: &PatchManager, name: Option<&str>) -> Result<()> {
    let name = name_or_current(mgr, name)?;
    mgr.delete(&name)?;
    println!("{} Project {} deleted", "OK".green().bold(), name.cyan());
    Ok(())
}

/// Run the unlink command
pub fn run_unlink(mgr: &PatchManager, name: Option<&str>) -> Result<()> {
    let name = name_or_current(mgr, name)?;
    mgr.unlink(&name)?;
    println!("{} Project {} unlinked", "OK".green().bold(), name.cyan());
    Ok(())
}
