//! In-memory doubles for the revision controller and the project store.
//!
//! Both are cheap to clone and share their state, so a test can keep a
//! handle to inspect what the manager did.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use pama_core::store::{PersistentStorer, StoreError, StoreResult};
use pama_core::{Commit, PatchManager, Project};
use pama_git::RevisionController;

/// Backend id reported by the mock detector.
pub const MOCK_BACKEND: &str = "mock";

/// Root reported by the mock detector.
pub const MOCK_ROOT: &str = "/mock/root";

/// Cache directory of managers built by [`manager`].
pub const MOCK_CACHE: &str = "/mock/cache";

#[derive(Debug, Default)]
struct History {
    ids: Vec<String>,
    subjects: Vec<String>,
    dirty: bool,
    fail_remove: Vec<String>,
    worktrees: Vec<PathBuf>,
}

/// A linear history held in memory.
///
/// Removing a commit appends `_new` to the id of every later commit, the
/// way a real rewrite changes all descendant hashes.
#[derive(Debug, Clone, Default)]
pub struct MockRevCtrl {
    state: Arc<Mutex<History>>,
}

impl MockRevCtrl {
    pub fn new(ids: &[&str], subjects: &[&str]) -> Self {
        assert_eq!(ids.len(), subjects.len(), "one subject per commit");
        let rc = Self::default();
        {
            let mut state = rc.lock();
            state.ids = ids.iter().map(|s| s.to_string()).collect();
            state.subjects = subjects.iter().map(|s| s.to_string()).collect();
        }
        rc
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn position(&self, commit: &str) -> Option<usize> {
        self.lock().ids.iter().position(|id| id == commit)
    }

    /// Current commit ids, oldest first.
    pub fn ids(&self) -> Vec<String> {
        self.lock().ids.clone()
    }

    /// Append a commit, as an apply step would.
    pub fn push(&self, id: &str, subject: &str) {
        let mut state = self.lock();
        state.ids.push(id.to_string());
        state.subjects.push(subject.to_string());
    }

    /// Report unstaged changes from now on.
    pub fn set_dirty(&self, dirty: bool) {
        self.lock().dirty = dirty;
    }

    /// Make removing `id` fail.
    pub fn fail_remove(&self, id: &str) {
        self.lock().fail_remove.push(id.to_string());
    }

    /// Worktrees currently checked out.
    pub fn worktrees(&self) -> Vec<PathBuf> {
        self.lock().worktrees.clone()
    }
}

fn not_found(commit: &str) -> pama_git::Error {
    pama_git::Error::Command {
        args: format!("rev-list {commit}"),
        stderr: "unknown revision".to_string(),
    }
}

impl RevisionController for MockRevCtrl {
    fn head(&self) -> pama_git::Result<String> {
        self.lock().ids.last().cloned().ok_or_else(|| not_found("HEAD"))
    }

    fn history(&self, commit: &str) -> pama_git::Result<Vec<String>> {
        let pos = self.position(commit).ok_or_else(|| not_found(commit))?;
        Ok(self.lock().ids[pos + 1..].to_vec())
    }

    fn clean(&self) -> bool {
        !self.lock().dirty
    }

    fn exists(&self, commit: &str) -> bool {
        self.position(commit).is_some()
    }

    fn subject(&self, commit: &str) -> String {
        match self.position(commit) {
            Some(pos) => self.lock().subjects[pos].clone(),
            None => String::new(),
        }
    }

    fn author(&self, _commit: &str) -> String {
        String::new()
    }

    fn date(&self, _commit: &str) -> String {
        String::new()
    }

    fn remove(&self, commit: &str) -> pama_git::Result<()> {
        let mut state = self.lock();
        if state.fail_remove.iter().any(|id| id == commit) {
            return Err(pama_git::Error::RemoveFailed {
                id: commit.to_string(),
            });
        }
        let pos = state
            .ids
            .iter()
            .position(|id| id == commit)
            .ok_or_else(|| not_found(commit))?;
        state.ids.remove(pos);
        state.subjects.remove(pos);
        for id in &mut state.ids[pos..] {
            id.push_str("_new");
        }
        Ok(())
    }

    fn apply_cmd(&self) -> String {
        "mock apply".to_string()
    }

    fn create_worktree(&self, target: &Path, _commit: &str) -> pama_git::Result<()> {
        self.lock().worktrees.push(target.to_path_buf());
        Ok(())
    }

    fn delete_worktree(&self, target: &Path) -> pama_git::Result<()> {
        self.lock().worktrees.retain(|w| w != target);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Records {
    data: BTreeMap<String, Project>,
    current: Option<String>,
}

/// Project store held in memory, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    state: Arc<Mutex<Records>>,
}

impl MockStore {
    /// Store holding `projects`, with `current` as the current project.
    pub fn with_projects(projects: Vec<Project>, current: &str) -> Self {
        let store = Self::default();
        {
            let mut state = store.lock();
            for p in projects {
                state.data.insert(p.name.clone(), p);
            }
            if !current.is_empty() {
                state.current = Some(current.to_string());
            }
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PersistentStorer for MockStore {
    fn store_project(&self, project: &Project, overwrite: bool) -> StoreResult<()> {
        let mut state = self.lock();
        if state.data.contains_key(&project.name) && !overwrite {
            return Err(StoreError::ProjectExists {
                name: project.name.clone(),
            });
        }
        state.data.insert(project.name.clone(), project.clone());
        Ok(())
    }

    fn delete_project(&self, name: &str) -> StoreResult<()> {
        self.lock()
            .data
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::ProjectNotFound {
                name: name.to_string(),
            })
    }

    fn current_name(&self) -> StoreResult<Option<String>> {
        Ok(self.lock().current.clone())
    }

    fn set_current(&self, name: &str) -> StoreResult<()> {
        self.lock().current = Some(name.to_string());
        Ok(())
    }

    fn clear_current(&self) -> StoreResult<()> {
        self.lock().current = None;
        Ok(())
    }

    fn current(&self) -> StoreResult<Project> {
        let name = self.current_name()?.ok_or(StoreError::NoCurrentProject)?;
        self.project(&name)
    }

    fn project(&self, name: &str) -> StoreResult<Project> {
        self.lock()
            .data
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::ProjectNotFound {
                name: name.to_string(),
            })
    }

    fn names(&self) -> StoreResult<Vec<String>> {
        Ok(self.lock().data.keys().cloned().collect())
    }

    fn projects(&self) -> StoreResult<Vec<Project>> {
        Ok(self.lock().data.values().cloned().collect())
    }
}

/// A manager whose factories hand out `rc` and `store`.
///
/// Detection always succeeds with [`MOCK_BACKEND`] at [`MOCK_ROOT`].
pub fn manager(rc: &MockRevCtrl, store: &MockStore) -> PatchManager {
    let rc = rc.clone();
    let store = store.clone();
    PatchManager::from_fns(
        Box::new(|_| Ok((MOCK_BACKEND.to_string(), PathBuf::from(MOCK_ROOT)))),
        Box::new(move |_, _| Ok(Box::new(rc.clone()) as Box<dyn RevisionController>)),
        Box::new(move || Ok(Box::new(store.clone()) as Box<dyn PersistentStorer>)),
        MOCK_CACHE,
    )
}

/// Commit with only id, subject and tag set.
pub fn commit(id: &str, subject: &str, tag: &str) -> Commit {
    Commit {
        id: id.to_string(),
        subject: subject.to_string(),
        tag: tag.to_string(),
        ..Default::default()
    }
}

/// Project on the mock backend based at `base`.
pub fn project(name: &str, base: &str, commits: Vec<Commit>) -> Project {
    Project {
        name: name.to_string(),
        root: MOCK_ROOT.to_string(),
        revctrl_id: MOCK_BACKEND.to_string(),
        base: commit(base, base, ""),
        commits,
        worktree: None,
    }
}
