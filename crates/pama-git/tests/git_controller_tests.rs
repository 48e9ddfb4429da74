//! Git controller tests against real repositories

use std::fs;

use pama_git::{GitController, Registry, RevisionController};
use pama_test_utils::git::{commit_file, head_id, real_git_repo_with_commit, run_git};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use tempfile::TempDir;

/// Repository with three commits after the initial one.
struct Repo {
    dir: TempDir,
    base: String,
    ids: Vec<String>,
}

impl Repo {
    fn rc(&self) -> GitController {
        GitController::new(self.dir.path())
    }
}

#[fixture]
fn repo() -> Repo {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let base = real_git_repo_with_commit(dir.path());
    let ids = vec![
        commit_file(dir.path(), "a.txt", "add a"),
        commit_file(dir.path(), "b.txt", "add b"),
        commit_file(dir.path(), "c.txt", "add c"),
    ];
    Repo { dir, base, ids }
}

#[rstest]
fn test_head_and_history(repo: Repo) {
    let rc = repo.rc();
    assert_eq!(rc.head().unwrap(), repo.ids[2]);
    assert_eq!(rc.history(&repo.base).unwrap(), repo.ids);
    assert_eq!(rc.history(&repo.ids[1]).unwrap(), vec![repo.ids[2].clone()]);
    assert!(rc.history(&repo.ids[2]).unwrap().is_empty());
}

#[rstest]
fn test_history_of_unknown_commit_fails(repo: Repo) {
    let err = repo.rc().history("deadbeef").unwrap_err();
    assert!(err.to_string().contains("rev-list"));
}

#[rstest]
fn test_commit_metadata(repo: Repo) {
    let rc = repo.rc();
    assert_eq!(rc.subject(&repo.ids[0]), "add a");
    assert_eq!(rc.author(&repo.ids[0]), "Test User");
    assert_eq!(rc.date(&repo.ids[0]).len(), "2024-01-02".len());
    assert_eq!(rc.subject("deadbeef"), "");
}

#[rstest]
fn test_exists(repo: Repo) {
    let rc = repo.rc();
    assert!(rc.exists(&repo.base));
    assert!(rc.exists(&repo.ids[2]));
    assert!(!rc.exists("deadbeef"));
}

#[rstest]
fn test_clean_tracks_unstaged_changes(repo: Repo) {
    let rc = repo.rc();
    assert!(rc.clean());
    fs::write(repo.dir.path().join("a.txt"), "edited").unwrap();
    assert!(!rc.clean());
}

#[rstest]
#[case::merge("rebase-merge")]
#[case::apply("rebase-apply")]
fn test_clean_detects_paused_rebase(repo: Repo, #[case] marker: &str) {
    let rc = repo.rc();
    assert!(rc.clean());
    let dir = repo.dir.path().join(".git").join(marker);
    fs::create_dir_all(&dir).unwrap();
    assert!(!rc.clean());
    fs::remove_dir_all(&dir).unwrap();
    assert!(rc.clean());
}

#[rstest]
fn test_remove_rewrites_descendants(repo: Repo) {
    let rc = repo.rc();
    rc.remove(&repo.ids[1]).unwrap();

    let history = rc.history(&repo.base).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], repo.ids[0]);
    assert_ne!(history[1], repo.ids[2]);
    assert_eq!(rc.subject(&history[1]), "add c");
    assert!(!rc.exists(&repo.ids[1]));
    assert!(!repo.dir.path().join("b.txt").exists());
}

#[rstest]
fn test_drop_commit_shrinks_history_by_one(repo: Repo) {
    let rc = repo.rc();
    rc.drop_commit(&repo.ids[2]).unwrap();
    assert_eq!(rc.history(&repo.base).unwrap(), repo.ids[..2].to_vec());
}

#[rstest]
fn test_remove_conflict_fails(repo: Repo) {
    let root = repo.dir.path();
    fs::write(root.join("a.txt"), "rewritten").unwrap();
    run_git(root, &["commit", "-am", "rewrite a"]);
    let rc = repo.rc();

    let err = rc.remove(&repo.ids[0]).unwrap_err();
    assert!(err.to_string().contains("failed to remove commit"));
    assert!(!rc.clean());
    let _ = std::process::Command::new("git")
        .args(["rebase", "--abort"])
        .current_dir(root)
        .output();
}

#[rstest]
fn test_worktree_lifecycle(repo: Repo) {
    let rc = repo.rc();
    let holder = TempDir::new().unwrap();
    let target = holder.path().join("wt");

    rc.create_worktree(&target, &repo.ids[0]).unwrap();
    assert!(target.join("a.txt").exists());
    assert!(!target.join("b.txt").exists());
    assert_eq!(head_id(&target), repo.ids[0]);

    rc.delete_worktree(&target).unwrap();
    assert!(!target.exists());
}

#[rstest]
fn test_registry_detects_git_root(repo: Repo) {
    let sub = repo.dir.path().join("nested/dir");
    fs::create_dir_all(&sub).unwrap();

    let (id, root) = Registry::default().detect(&sub).unwrap();
    assert_eq!(id, "git");
    assert_eq!(
        root.canonicalize().unwrap(),
        repo.dir.path().canonicalize().unwrap()
    );
}
