//! Re-reading tracked commits after the history changed

use super::PatchManager;
use crate::model::{Commit, Project, UNTRACKED};
use crate::{Error, Result};

impl PatchManager {
    /// Commits between `base` and HEAD with tags carried over from `p`.
    ///
    /// A commit keeps the tag and message id of the first tracked commit
    /// with the same id or, failing that, the same subject. Everything else
    /// is untracked.
    pub fn rebase_commits(&self, p: &Project, base: &str) -> Result<Vec<Commit>> {
        let rc = self.rc(p)?;
        if !rc.exists(base) {
            return Err(Error::BaseNotFound {
                id: base.to_string(),
            });
        }

        let commits = rc
            .history(base)?
            .iter()
            .map(|id| {
                let mut commit = Commit::new(rc.as_ref(), id, UNTRACKED);
                if let Some(known) = p
                    .commits
                    .iter()
                    .find(|c| c.id == commit.id || c.subject == commit.subject)
                {
                    commit.tag = known.tag.clone();
                    commit.message_id = known.message_id.clone();
                }
                commit
            })
            .collect();
        Ok(commits)
    }

    /// Replace the tracked commits of `p` and move its base to `base`.
    ///
    /// Commits no longer in history are dropped and the rest refreshed. The
    /// base only moves if it exists.
    pub fn save_rebased(&self, mut p: Project, base: &str, commits: Vec<Commit>) -> Result<Project> {
        let rc = self.rc(&p)?;

        p.commits = commits
            .into_iter()
            .filter(|c| rc.exists(&c.id))
            .map(|mut c| {
                c.refresh(rc.as_ref());
                c
            })
            .collect();

        if rc.exists(base) {
            p.base = Commit::new(rc.as_ref(), base, "");
        } else {
            tracing::warn!(base, "Rebase base no longer exists, keeping previous base");
        }

        self.store()?.store_project(&p, true)?;
        tracing::info!(project = %p.name, base = %p.base.id, commits = p.commits.len(), "Rebase saved");
        Ok(p)
    }
}
