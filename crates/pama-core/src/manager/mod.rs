//! Patch manager
//!
//! Orchestrates the revision controller and the project store. Every
//! operation opens its own controller and store through the injected
//! factories, so nothing is held between calls.

mod apply;
mod excise;
mod rebase;
mod worktree;

pub use excise::remap;

use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use pama_git::{Registry, RevisionController};

use crate::config::Config;
use crate::model::{Commit, CommitsExt, Project, ProjectView};
use crate::store::{PersistentStorer, SqliteStore};
use crate::{Error, Result};

/// Finds the backend id and working tree root for a path.
pub type DetectFn = Box<dyn Fn(&Path) -> pama_git::Result<(String, PathBuf)>>;

/// Opens a revision controller for a backend id at a root.
pub type RevCtrlFn = Box<dyn Fn(&str, &Path) -> pama_git::Result<Box<dyn RevisionController>>>;

/// Opens the project store.
pub type StoreFn = Box<dyn Fn() -> Result<Box<dyn PersistentStorer>>>;

/// Minimum number of characters accepted by [`PatchManager::find`].
const MIN_HASH_LEN: usize = 4;

/// Entry point for all patch management operations.
pub struct PatchManager {
    detect: DetectFn,
    revctrl: RevCtrlFn,
    store: StoreFn,
    cache_dir: PathBuf,
}

impl PatchManager {
    /// Manager backed by the built-in backends and the SQLite store.
    pub fn new(config: &Config) -> Result<Self> {
        let cache_dir = config.cache_dir()?;
        let store_path = config.store_path()?;
        let registry = Registry::default();
        let detect_registry = registry.clone();

        Ok(Self::from_fns(
            Box::new(move |path| detect_registry.detect(path)),
            Box::new(move |id, root| registry.open(id, root)),
            Box::new(move || {
                Ok(Box::new(SqliteStore::new(store_path.clone())) as Box<dyn PersistentStorer>)
            }),
            cache_dir,
        ))
    }

    /// Manager with injected factories.
    pub fn from_fns(
        detect: DetectFn,
        revctrl: RevCtrlFn,
        store: StoreFn,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            detect,
            revctrl,
            store,
            cache_dir: cache_dir.into(),
        }
    }

    fn store(&self) -> Result<Box<dyn PersistentStorer>> {
        (self.store)()
    }

    fn rc_at(&self, id: &str, root: &str) -> Result<Box<dyn RevisionController>> {
        Ok((self.revctrl)(id, Path::new(root))?)
    }

    fn rc(&self, p: &Project) -> Result<Box<dyn RevisionController>> {
        self.rc_at(&p.revctrl_id, &p.root)
    }

    /// Start tracking the repository containing `path` as project `name`.
    ///
    /// The current HEAD becomes the base. An existing project of the same
    /// name is only replaced when `force` is set.
    pub fn init(&self, name: &str, path: &Path, force: bool) -> Result<Project> {
        let (revctrl_id, root) = (self.detect)(path)?;
        let root = root.to_string_lossy().into_owned();
        let rc = self.rc_at(&revctrl_id, &root)?;
        let head = rc.head()?;

        let project = Project {
            name: name.to_string(),
            root,
            revctrl_id,
            base: Commit::new(rc.as_ref(), &head, ""),
            commits: Vec::new(),
            worktree: None,
        };

        let store = self.store()?;
        store.store_project(&project, force)?;
        store.set_current(name)?;
        tracing::info!(name, root = %project.root, base = %head, "Project initialized");
        Ok(project)
    }

    pub fn current_project(&self) -> Result<Project> {
        let store = self.store()?;
        let name = store.current_name()?.ok_or(Error::NoCurrentProject)?;
        if !store.names()?.contains(&name) {
            return Err(Error::ProjectGone { name });
        }
        Ok(store.current()?)
    }

    /// Patch tags of the current project.
    pub fn current_patches(&self) -> Result<Vec<String>> {
        Ok(self.current_project()?.commits.tags())
    }

    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self.store()?.names()?)
    }

    /// Stored projects whose name contains `filter`; all of them when the
    /// filter is empty.
    pub fn projects(&self, filter: &str) -> Result<Vec<Project>> {
        let all = self.store()?.projects()?;
        if filter.is_empty() {
            return Ok(all);
        }
        let projects: Vec<_> = all.into_iter().filter(|p| p.name.contains(filter)).collect();
        if projects.is_empty() {
            return Err(Error::NoProjectsFound);
        }
        Ok(projects)
    }

    /// Text listing of `projects`.
    ///
    /// Commits missing from history are annotated as needing a rebase. The
    /// current project is marked active when more than one is listed.
    pub fn list_projects(&self, projects: &[Project]) -> String {
        let current = match self.current_project() {
            Ok(p) => p.name,
            Err(e) => {
                tracing::warn!(error = %e, "could not get current project");
                String::new()
            }
        };

        let mut out = String::new();
        for p in projects {
            let rc = match self.rc(p) {
                Ok(rc) => rc,
                Err(e) => {
                    tracing::error!(project = %p.name, error = %e, "project failed");
                    continue;
                }
            };
            let notes: HashMap<String, String> = p
                .commits
                .iter()
                .filter(|c| !rc.exists(&c.id))
                .map(|c| (c.id.clone(), "Rebase needed".to_string()))
                .collect();
            let active = p.name == current && projects.len() > 1;
            let _ = write!(out, "{}", ProjectView::new(p).active(active).notes(notes));
        }
        out
    }

    pub fn head(&self, p: &Project) -> Result<String> {
        Ok(self.rc(p)?.head()?)
    }

    pub fn clean(&self, p: &Project) -> Result<bool> {
        Ok(self.rc(p)?.clean())
    }

    /// Backend command that applies a mailbox read from stdin.
    pub fn apply_cmd(&self, p: &Project) -> Result<String> {
        Ok(self.rc(p)?.apply_cmd())
    }

    /// Make `name` the current project.
    pub fn switch_project(&self, name: &str) -> Result<()> {
        let store = self.store()?;
        if store.current_name()?.as_deref() == Some(name) {
            tracing::debug!(name, "Project already current");
            return Ok(());
        }
        if !store.names()?.iter().any(|n| n == name) {
            return Err(Error::ProjectNotFound {
                name: name.to_string(),
            });
        }
        store.set_current(name)?;
        tracing::info!(name, "Switched project");
        Ok(())
    }

    /// Forget project `name`.
    ///
    /// Deleting the current project makes another one current, or clears
    /// the pointer when none is left. Projects with worktrees are refused.
    pub fn delete(&self, name: &str) -> Result<()> {
        let store = self.store()?;
        let names = store.names()?;
        if !names.iter().any(|n| n == name) {
            return Err(Error::ProjectNotFound {
                name: name.to_string(),
            });
        }
        ensure_no_worktrees(store.as_ref(), name)?;

        if let Ok(current) = self.current_project()
            && current.name == name
        {
            repoint_current(store.as_ref(), &names, name)?;
        }

        store.delete_project(name)?;
        tracing::info!(name, "Project deleted");
        Ok(())
    }

    /// Like [`delete`](Self::delete), but a worktree project also has its
    /// working tree removed and hands the current pointer to its parent.
    pub fn unlink(&self, name: &str) -> Result<()> {
        let store = self.store()?;
        let names = store.names()?;
        if !names.iter().any(|n| n == name) {
            return Err(Error::ProjectNotFound {
                name: name.to_string(),
            });
        }

        ensure_no_worktrees(store.as_ref(), name)?;

        if store.current_name().ok().flatten().as_deref() == Some(name) {
            repoint_current(store.as_ref(), &names, name)?;
        }

        if let Ok(p) = store.project(name)
            && let Some(parent) = p.worktree.as_ref().filter(|_| p.is_worktree())
        {
            if let Err(e) = self.delete_worktree(&p) {
                tracing::error!(error = %e, "failed to delete worktree");
            }
            if let Err(e) = store.set_current(&parent.name) {
                tracing::error!(error = %e, "failed to set current project");
            }
        }

        store.delete_project(name)?;
        tracing::info!(name, "Project unlinked");
        Ok(())
    }

    /// Look up a commit of `p` by a partial hash.
    ///
    /// Tracked commits are searched first, then the history since the base.
    pub fn find(&self, hash: &str, p: &Project) -> Result<Commit> {
        if hash.len() < MIN_HASH_LEN {
            return Err(Error::HashTooShort);
        }

        if let Some(commit) = p.commits.iter().find(|c| c.id.contains(hash)) {
            return Ok(commit.clone());
        }

        let rc = self.rc(p)?;
        let history = rc.history(&p.base.id)?;
        match history.iter().find(|id| id.contains(hash)) {
            Some(id) => Ok(Commit::new(rc.as_ref(), id, "")),
            None => Err(Error::CommitNotFound {
                hash: hash.to_string(),
            }),
        }
    }
}

/// Worktree projects must keep a parent, so `name` may only go once it has
/// no worktree children.
fn ensure_no_worktrees(store: &dyn PersistentStorer, name: &str) -> Result<()> {
    let children: Vec<String> = store
        .projects()?
        .into_iter()
        .filter(|p| p.worktree.as_ref().is_some_and(|w| w.name == name))
        .map(|p| p.name)
        .collect();
    if children.is_empty() {
        return Ok(());
    }
    Err(Error::HasWorktrees {
        name: name.to_string(),
        children: children.join(", "),
    })
}

/// Point the store at the first project other than `leaving`, or clear it.
fn repoint_current(store: &dyn PersistentStorer, names: &[String], leaving: &str) -> Result<()> {
    match names.iter().find(|n| *n != leaving) {
        Some(next) => store.set_current(next)?,
        None => store.clear_current()?,
    }
    Ok(())
}
