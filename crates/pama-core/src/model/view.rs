//! Text view of a project and its patches

use std::collections::HashMap;
use std::fmt;

use super::{CommitsExt, Project};

/// Renders a project with its commits grouped by patch tag.
///
/// ```text
/// Project    aerc    [active]
/// Directory  /src/aerc
/// Base       1a2b3c
///
///     notmuch_v3:
///         [Rebase needed] 4d5e6f notmuch: fix query, Jane, 2024-01-02
/// ```
pub struct ProjectView<'a> {
    project: &'a Project,
    active: bool,
    notes: HashMap<String, String>,
}

impl<'a> ProjectView<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            active: false,
            notes: HashMap::new(),
        }
    }

    /// Mark the project as the active one.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Annotations keyed by commit id.
    pub fn notes(mut self, notes: HashMap<String, String>) -> Self {
        self.notes = notes;
        self
    }

    fn base_id(&self) -> &str {
        let id = self.project.base.id.as_str();
        if id.len() >= 40 {
            id.get(..6).unwrap_or(id)
        } else {
            id
        }
    }
}

impl fmt::Display for ProjectView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.project;
        writeln!(f)?;
        let marker = if self.active { "[active]" } else { "" };
        writeln!(f, "Project    {}    {}", p.name, marker)?;
        writeln!(f, "Directory  {}", p.root)?;
        writeln!(f, "Base       {}", self.base_id())?;

        for tag in p.commits.tags() {
            writeln!(f)?;
            writeln!(f, "    {tag}:")?;
            for commit in p.commits.iter().filter(|c| c.tag == tag) {
                write!(f, "        ")?;
                if let Some(note) = self.notes.get(&commit.id) {
                    write!(f, "[{note}] ")?;
                }
                writeln!(f, "{commit}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Commit;

    fn project() -> Project {
        Project {
            name: "aerc".into(),
            root: "/src/aerc".into(),
            revctrl_id: "git".into(),
            base: Commit {
                id: "0123456789012345678901234567890123456789".into(),
                ..Default::default()
            },
            commits: vec![
                Commit {
                    id: "aaaaaaaa".into(),
                    subject: "first".into(),
                    tag: "p1".into(),
                    ..Default::default()
                },
                Commit {
                    id: "bbbbbbbb".into(),
                    subject: "second".into(),
                    tag: "p2".into(),
                    ..Default::default()
                },
            ],
            worktree: None,
        }
    }

    #[test]
    fn renders_header_and_groups() {
        let p = project();
        let text = ProjectView::new(&p).to_string();
        assert!(text.contains("Project    aerc    \n"));
        assert!(text.contains("Directory  /src/aerc\n"));
        assert!(text.contains("Base       012345\n"));
        assert!(text.contains("    p1:\n        aaaaaa first\n"));
        assert!(text.contains("    p2:\n        bbbbbb second\n"));
    }

    #[test]
    fn renders_notes_and_active_marker() {
        let p = project();
        let notes = HashMap::from([("bbbbbbbb".to_string(), "Rebase needed".to_string())]);
        let text = ProjectView::new(&p).active(true).notes(notes).to_string();
        assert!(text.contains("[active]"));
        assert!(text.contains("[Rebase needed] bbbbbb second"));
    }

    #[test]
    fn short_base_id_is_shown_in_full() {
        let mut p = project();
        p.base.id = "abc".into();
        assert!(ProjectView::new(&p).to_string().contains("Base       abc\n"));
    }
}
