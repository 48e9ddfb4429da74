//! Recording commits created by an external apply step

use std::collections::BTreeMap;

use super::PatchManager;
use crate::model::{Commit, CommitsExt, Project};
use crate::naming::make_unique;
use crate::{Error, Result};

impl PatchManager {
    /// Check that `patch` can be applied to `p` and return the HEAD to
    /// pass to [`apply_update`](Self::apply_update) afterwards.
    pub fn begin_apply(&self, p: &Project, patch: &str) -> Result<String> {
        if p.commits.has_tag(patch) {
            return Err(Error::PatchExists {
                patch: patch.to_string(),
            });
        }
        let rc = self.rc(p)?;
        if !rc.clean() {
            return Err(Error::NotClean);
        }
        Ok(rc.head()?)
    }

    /// Track every commit created since `prior_head` under `patch`.
    ///
    /// A tag already used in `p` gets a random suffix instead of failing.
    /// `msgdata` maps email subjects to message ids; a commit takes the id
    /// of the first subject containing its own.
    pub fn apply_update(
        &self,
        mut p: Project,
        patch: &str,
        prior_head: &str,
        msgdata: &BTreeMap<String, String>,
    ) -> Result<Project> {
        let rc = self.rc(&p)?;
        let ids = rc.history(prior_head)?;
        if ids.is_empty() {
            return Err(Error::NothingApplied {
                patch: patch.to_string(),
            });
        }

        let mut tag = patch.to_string();
        if p.commits.has_tag(&tag) {
            tag = make_unique(patch);
            tracing::warn!(patch, tag = %tag, "Patch name already exists, using unique name");
        }

        for id in &ids {
            let mut commit = Commit::new(rc.as_ref(), id, &tag);
            if !commit.subject.is_empty()
                && let Some((_, msgid)) = msgdata
                    .iter()
                    .find(|(subject, _)| subject.contains(&commit.subject))
            {
                commit.message_id = msgid.clone();
            }
            tracing::debug!(%commit, "Tracking applied commit");
            p.commits.push(commit);
        }

        self.store()?.store_project(&p, true)?;
        tracing::info!(project = %p.name, tag = %tag, count = ids.len(), "Patch applied");
        Ok(p)
    }
}
