//! Real git repositories for controller and end-to-end tests.
//!
//! Fixtures drive the `git` CLI so the repositories look exactly like the
//! ones the controller meets in the wild.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `git` in `path`, panicking with stderr on failure.
///
/// Returns trimmed stdout.
pub fn run_git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("run_git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "run_git: `git {args:?}` failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialises a real git repository with an initial commit.
///
/// Configures a local identity, disables signing, commits `README.md` and
/// names the branch `main`. Returns the id of the initial commit.
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path) -> String {
    run_git(path, &["init"]);
    run_git(path, &["config", "user.email", "test@test.com"]);
    run_git(path, &["config", "user.name", "Test User"]);
    run_git(path, &["config", "commit.gpgsign", "false"]);

    fs::write(path.join("README.md"), "# Test")
        .unwrap_or_else(|e| panic!("real_git_repo_with_commit: failed to write README.md: {e}"));

    run_git(path, &["add", "."]);
    run_git(path, &["commit", "-m", "Initial commit"]);
    // Best-effort: older git versions may not support this flag
    let _ = Command::new("git")
        .args(["branch", "-m", "main"])
        .current_dir(path)
        .output();
    head_id(path)
}

/// Commit a new file `name` with `subject` as the message.
///
/// Each file is independent so any commit can be excised without
/// conflicts. Returns the new HEAD id.
pub fn commit_file(path: &Path, name: &str, subject: &str) -> String {
    fs::write(path.join(name), subject)
        .unwrap_or_else(|e| panic!("commit_file: failed to write {name}: {e}"));
    run_git(path, &["add", name]);
    run_git(path, &["commit", "-m", subject]);
    head_id(path)
}

/// Id of HEAD, read through `git2`.
pub fn head_id(path: &Path) -> String {
    let repo = git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("head_id: failed to open {}: {e}", path.display()));
    let head = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .unwrap_or_else(|e| panic!("head_id: no HEAD commit: {e}"));
    head.id().to_string()
}
