//! Tracked commits and projects
//!
//! A [`Project`] groups commits of one working tree under patch tags. Commit
//! ids are snapshots of the revision controller's hashes and must be
//! remapped after every history rewrite.

mod view;

pub use view::ProjectView;

use std::fmt;

use pama_git::RevisionController;
use serde::{Deserialize, Serialize};

/// Tag for commits that are known to history but not assigned to a patch.
pub const UNTRACKED: &str = "untracked";

/// A commit tracked by the patch manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash. Changes whenever history before it is rewritten.
    pub id: String,

    /// Subject line at the time the commit was recorded.
    pub subject: String,

    /// Author name at the time the commit was recorded.
    pub author: String,

    /// Commit date at the time the commit was recorded.
    pub date: String,

    /// Message-Id of the email that carried this commit, if it was applied
    /// from a mailbox.
    #[serde(default)]
    pub message_id: String,

    /// Patch tag. Commits sharing a tag form one patch set.
    pub tag: String,
}

impl Commit {
    /// Snapshot `id` from the revision controller under `tag`.
    pub fn new(rc: &dyn RevisionController, id: &str, tag: &str) -> Self {
        Self {
            id: id.to_string(),
            subject: rc.subject(id),
            author: rc.author(id),
            date: rc.date(id),
            message_id: String::new(),
            tag: tag.to_string(),
        }
    }

    /// Re-read subject, author and date from the revision controller.
    pub fn refresh(&mut self, rc: &dyn RevisionController) {
        self.subject = rc.subject(&self.id);
        self.author = rc.author(&self.id);
        self.date = rc.date(&self.id);
    }

    /// True when no patch claims this commit.
    pub fn untracked(&self) -> bool {
        self.tag.is_empty() || self.tag == UNTRACKED
    }

    /// Human readable summary: subject, author, date and message id.
    pub fn info(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if self.subject.is_empty() {
            parts.push("(no subject)".to_string());
        } else {
            parts.push(self.subject.clone());
        }
        if !self.author.is_empty() {
            parts.push(self.author.clone());
        }
        if !self.date.is_empty() {
            parts.push(self.date.clone());
        }
        if !self.message_id.is_empty() {
            parts.push(format!("<{}>", self.message_id));
        }
        parts.join(", ")
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6.6} {}", self.id, self.info())
    }
}

/// Queries over an ordered list of commits.
pub trait CommitsExt {
    /// Unique tags in first-seen order.
    fn tags(&self) -> Vec<String>;

    fn has_tag(&self, tag: &str) -> bool;

    fn lookup(&self, id: &str) -> Option<&Commit>;
}

impl CommitsExt for [Commit] {
    fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for commit in self {
            if !tags.contains(&commit.tag) {
                tags.push(commit.tag.clone());
            }
        }
        tags
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.iter().any(|c| c.tag == tag)
    }

    fn lookup(&self, id: &str) -> Option<&Commit> {
        self.iter().find(|c| c.id == id)
    }
}

/// Back-reference from a worktree project to the project it was split from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorktreeParent {
    /// Name of the parent project.
    pub name: String,

    /// Working tree root of the parent project.
    pub root: String,
}

/// A working tree whose patches are tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name. Works as the primary key; never renamed.
    pub name: String,

    /// Root directory of the working tree.
    pub root: String,

    /// Registry id of the revision control backend.
    pub revctrl_id: String,

    /// Reference commit tracked history is measured from.
    pub base: Commit,

    /// Tracked commits in ancestry order from `base` to HEAD.
    #[serde(default)]
    pub commits: Vec<Commit>,

    /// Set when this project is an isolated worktree of another project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worktree: Option<WorktreeParent>,
}

impl Project {
    pub fn is_worktree(&self) -> bool {
        self.worktree
            .as_ref()
            .is_some_and(|w| !w.name.is_empty() && !w.root.is_empty())
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&ProjectView::new(self), f)
    }
}
