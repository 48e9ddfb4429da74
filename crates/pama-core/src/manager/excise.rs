//! Dropping and removing patches
//!
//! Excising a commit rewrites the ids of every commit after it. The new ids
//! are recovered positionally: the history after the rewrite ends with the
//! same number of commits that followed the target before it.

use std::collections::{HashMap, HashSet};

use pama_git::RevisionController;

use super::PatchManager;
use crate::model::{Commit, CommitsExt};
use crate::{Error, Result};

#[derive(Clone, Copy)]
enum Excision {
    Drop,
    Remove,
}

impl Excision {
    fn action(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Remove => "remove",
        }
    }

    fn done(self) -> &'static str {
        match self {
            Self::Drop => "Dropped",
            Self::Remove => "Removed",
        }
    }

    fn run(self, rc: &dyn RevisionController, id: &str) -> pama_git::Result<()> {
        match self {
            Self::Drop => rc.drop_commit(id),
            Self::Remove => rc.remove(id),
        }
    }
}

/// Map each id in `before` to the id at the same position from the end of
/// `after`.
pub fn remap(before: &[String], after: &[String]) -> HashMap<String, String> {
    if after.len() < before.len() {
        tracing::warn!(
            before = before.len(),
            after = after.len(),
            "History shorter than expected, remapping from the end"
        );
    }
    let tail = &after[after.len().saturating_sub(before.len())..];
    before
        .iter()
        .rev()
        .zip(tail.iter().rev())
        .map(|(old, new)| (old.clone(), new.clone()))
        .collect()
}

impl PatchManager {
    /// Discard every commit of `patch` from the current project's history.
    pub fn drop_patch(&self, patch: &str) -> Result<()> {
        self.excise(patch, Excision::Drop)
    }

    /// Excise every commit of `patch` from the current project's history.
    pub fn remove_patch(&self, patch: &str) -> Result<()> {
        self.excise(patch, Excision::Remove)
    }

    fn excise(&self, patch: &str, how: Excision) -> Result<()> {
        let mut p = self.current_project()?;
        if !p.commits.has_tag(patch) {
            return Err(Error::PatchNotFound {
                patch: patch.to_string(),
                project: p.name,
            });
        }

        let rc = self.rc(&p)?;
        if !rc.clean() {
            return Err(Error::NotClean);
        }

        let mut targets = Vec::new();
        for c in &p.commits {
            if !rc.exists(&c.id) {
                tracing::error!(commit = %c, "failed to find commit");
                return Err(Error::RebaseRequired {
                    action: how.action(),
                });
            }
            if c.tag == patch {
                targets.push(c.clone());
            }
        }

        let mut removed = HashSet::new();
        for target in targets.iter().rev() {
            let before = match rc.history(&target.id) {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::error!(commit = %target, error = %e, "failed to {} (commits before)", how.action());
                    continue;
                }
            };
            if let Err(e) = how.run(rc.as_ref(), &target.id) {
                tracing::error!(commit = %target, error = %e, "failed to {}", how.action());
                continue;
            }
            removed.insert(target.id.clone());

            let after = match rc.history(&p.base.id) {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::error!(commit = %target, error = %e, "failed to {} (commits after)", how.action());
                    continue;
                }
            };

            let transform = remap(&before, &after);
            for c in p.commits.iter_mut() {
                if let Some(new_id) = transform.get(&c.id) {
                    let message_id = std::mem::take(&mut c.message_id);
                    *c = Commit::new(rc.as_ref(), new_id, &c.tag);
                    c.message_id = message_id;
                }
            }
            tracing::debug!(commit = %target.id, rewritten = transform.len(), "Commit excised");
        }

        if removed.len() < targets.len() {
            return Err(Error::PartialRemoval {
                action: how.action(),
                done: how.done(),
                removed: removed.len(),
                total: targets.len(),
            });
        }

        p.commits.retain(|c| !removed.contains(&c.id));
        self.store()?.store_project(&p, true)?;
        tracing::info!(project = %p.name, patch, count = removed.len(), "Patch {}", how.done().to_lowercase());
        Ok(())
    }
}
