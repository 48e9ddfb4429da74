//! Propose command: suggest patch tags for email subjects

use std::io::{self, BufRead};

use pama_core::{PatchManager, project_from_subject, propose_patch_names};

use crate::error::Result;

/// Run the propose command, reading one subject per line from stdin
pub fn run_propose(mgr: &PatchManager, project: bool) -> Result<()> {
    let subjects = io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<Vec<String>>>()?;

    let names = if project {
        subject_projects(&subjects)
    } else {
        let existing = mgr.current_patches().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "No current patches to avoid");
            Vec::new()
        });
        propose_patch_names(&existing, &subjects)
    };

    for name in names {
        println!("{name}");
    }
    Ok(())
}

/// Distinct project names found in `subjects`, in first-seen order.
fn subject_projects(subjects: &[String]) -> Vec<String> {
    let mut projects: Vec<String> = Vec::new();
    for name in subjects.iter().filter_map(|s| project_from_subject(s)) {
        if !projects.iter().any(|p| p == name) {
            projects.push(name.to_string());
        }
    }
    projects
}
