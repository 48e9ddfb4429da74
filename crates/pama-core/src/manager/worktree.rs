//! Worktree projects

use std::path::Path;

use super::PatchManager;
use crate::config::worktree_root;
use crate::model::{Commit, Project, WorktreeParent};
use crate::naming::worktree_name;
use crate::{Error, Result};

impl PatchManager {
    /// Check out `commit` of `p` into a fresh worktree tracked as its own
    /// project. Worktrees cannot be nested.
    pub fn create_worktree(&self, p: &Project, commit: &str, tag: &str) -> Result<Project> {
        if p.is_worktree() {
            return Err(Error::AlreadyWorktree);
        }

        let name = worktree_name(&p.name, tag);
        let root = worktree_root(&self.cache_dir, &name);
        self.rc(p)?.create_worktree(&root, commit)?;

        let w = Project {
            name,
            root: root.to_string_lossy().into_owned(),
            revctrl_id: p.revctrl_id.clone(),
            base: Commit {
                id: commit.to_string(),
                ..Default::default()
            },
            commits: Vec::new(),
            worktree: Some(WorktreeParent {
                name: p.name.clone(),
                root: p.root.clone(),
            }),
        };
        self.store()?.store_project(&w, true)?;
        tracing::info!(name = %w.name, root = %w.root, parent = %p.name, "Worktree created");
        Ok(w)
    }

    /// Remove the working tree of a worktree project; no-op otherwise.
    pub(crate) fn delete_worktree(&self, p: &Project) -> Result<()> {
        let Some(parent) = p.worktree.as_ref().filter(|_| p.is_worktree()) else {
            return Ok(());
        };
        let rc = self.rc_at(&p.revctrl_id, &parent.root)?;
        rc.delete_worktree(Path::new(&p.root))?;
        tracing::info!(root = %p.root, "Worktree removed");
        Ok(())
    }
}
