//! Editable text form of a rebase
//!
//! Each commit becomes one row: tag, short hash, info. The user edits the
//! tag column in an external editor; [`RebaseSheet::parse`] reads the
//! result back into tag assignments.
//!
//! ```text
//! notmuch_v3       1a2b3c     notmuch: fix query, Jane, 2024-01-02
//! untracked        4d5e6f     unrelated fix, Joe, 2024-01-03
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use crate::model::{Commit, UNTRACKED};

/// Number of hash characters shown per row.
pub const SHORT_HASH_LEN: usize = 6;

const FOOTER: &str = "
# Rebase the patch tracking data. The repository itself is not touched.
#
# Edit the first column to assign a tag to a commit. Commits that share a
# tag form one patch.
#
# 'untracked' marks commits without a patch: either their hash changed or
# they were applied without the patch manager.
#
# Only change the tags. Keep the line order as it is in the repository.
#
# Deleting a line, or leaving its tag as 'untracked', stops tracking that
# commit.
#
";

/// First [`SHORT_HASH_LEN`] characters of a commit id.
pub fn short_hash(id: &str) -> &str {
    match id.char_indices().nth(SHORT_HASH_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Commits rendered for editing, with the lookup needed to read them back.
#[derive(Debug, Clone)]
pub struct RebaseSheet {
    commits: Vec<Commit>,
    table: HashMap<String, Commit>,
    order: Vec<String>,
}

impl RebaseSheet {
    pub fn new(commits: Vec<Commit>) -> Self {
        let mut table = HashMap::with_capacity(commits.len());
        let mut order = Vec::with_capacity(commits.len());
        for commit in &commits {
            let hash = short_hash(&commit.id).to_string();
            table.entry(hash.clone()).or_insert_with(|| commit.clone());
            order.push(hash);
        }
        Self {
            commits,
            table,
            order,
        }
    }

    /// Rows plus the instructions footer.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for commit in &self.commits {
            let tag = if commit.tag.is_empty() {
                UNTRACKED
            } else {
                commit.tag.as_str()
            };
            let _ = writeln!(
                out,
                "{tag:<12}     {:>6}     {}",
                short_hash(&commit.id),
                commit.info()
            );
        }
        out.push_str(FOOTER);
        out
    }

    /// Read edited text back into tagged commits.
    ///
    /// `#` starts a comment. Rows tagged `untracked` are dropped, as are
    /// rows whose hash is unknown. Repeated hashes keep the first row. The
    /// result is put back into repository order unless an unknown hash
    /// shows the history changed underneath the edit.
    pub fn parse(&self, text: &str) -> Vec<Commit> {
        let mut commits = Vec::new();
        let mut hashes = Vec::new();
        let mut seen = HashSet::new();

        for line in text.lines() {
            let line = match line.find('#') {
                Some(i) => &line[..i],
                None => line,
            };
            let mut fields = line.split_whitespace();
            let (Some(tag), Some(hash)) = (fields.next(), fields.next()) else {
                continue;
            };
            if tag == UNTRACKED {
                continue;
            }
            if seen.contains(hash) {
                tracing::warn!(hash, "rebase: skipping duplicated hash");
                continue;
            }

            hashes.push(hash.to_string());
            let Some(commit) = self.table.get(hash) else {
                tracing::error!(
                    hash,
                    "Commit hashes changed during the rebase, dropping commit"
                );
                continue;
            };
            tracing::trace!(hash, tag, "Keeping commit");
            let mut commit = commit.clone();
            commit.tag = tag.to_string();
            commits.push(commit);
            seen.insert(hash.to_string());
        }

        reorder(&mut commits, &hashes, &self.order);
        commits
    }
}

/// Sort `items` by the position of their key in `by`.
///
/// `now[i]` is the key of `items[i]`. When any key is missing from `by`,
/// the items are left untouched.
pub fn reorder<T>(items: &mut Vec<T>, now: &[String], by: &[String]) {
    let positions: HashMap<&str, usize> = by
        .iter()
        .enumerate()
        .map(|(i, key)| (key.as_str(), i))
        .collect();

    if now.len() != items.len() || !now.iter().all(|key| positions.contains_key(key.as_str())) {
        return;
    }

    let mut keyed: Vec<(usize, T)> = now
        .iter()
        .map(|key| positions[key.as_str()])
        .zip(items.drain(..))
        .collect();
    keyed.sort_by_key(|(pos, _)| *pos);
    items.extend(keyed.into_iter().map(|(_, item)| item));
}
