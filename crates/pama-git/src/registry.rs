//! Backend registry keyed by revision control id

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{Error, GitController, Result, controller::RevisionController};

/// Constructor for a controller rooted at a working tree.
pub type OpenFn = fn(&Path) -> Box<dyn RevisionController>;

/// Probe returning the working tree root when the backend recognises a path.
pub type DetectFn = fn(&Path) -> Result<Option<PathBuf>>;

/// A named revision control backend.
#[derive(Clone, Copy)]
pub struct Backend {
    pub open: OpenFn,
    pub detect: DetectFn,
}

/// Registry of known backends.
///
/// Iteration follows the backend id order, so detection is deterministic
/// when several backends claim the same directory.
#[derive(Clone)]
pub struct Registry {
    backends: BTreeMap<&'static str, Backend>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(
            "git",
            Backend {
                open: open_git,
                detect: GitController::discover,
            },
        );
        registry
    }
}

impl Registry {
    /// A registry with no backends.
    pub fn empty() -> Self {
        Self {
            backends: BTreeMap::new(),
        }
    }

    /// Add or replace a backend.
    pub fn register(&mut self, id: &'static str, backend: Backend) {
        self.backends.insert(id, backend);
    }

    /// Open a controller for backend `id` at `root`.
    pub fn open(&self, id: &str, root: &Path) -> Result<Box<dyn RevisionController>> {
        let backend = self
            .backends
            .get(id)
            .ok_or_else(|| Error::UnknownBackend { id: id.to_string() })?;
        Ok((backend.open)(root))
    }

    /// Find which backend manages `path` and its working tree root.
    pub fn detect(&self, path: &Path) -> Result<(String, PathBuf)> {
        for (id, backend) in &self.backends {
            if let Some(root) = (backend.detect)(path)? {
                tracing::trace!(backend = id, root = %root.display(), "Repository detected");
                return Ok((id.to_string(), root));
            }
        }
        Err(Error::Unsupported {
            path: path.to_path_buf(),
        })
    }
}

fn open_git(root: &Path) -> Box<dyn RevisionController> {
    Box::new(GitController::new(root))
}
