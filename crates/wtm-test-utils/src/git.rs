//! Git repository fixtures built with the `git` CLI.
//!
//! Every helper panics on failure; they are meant for test setup only.

use std::fs;
use std::path::Path;
use std::process::Command;

pub const TEST_USER_NAME: &str = "Test User";
pub const TEST_USER_EMAIL: &str = "test@test.com";

/// Run `git <args>` in `dir` and return trimmed stdout.
///
/// # Panics
/// Panics if git cannot be spawned or exits non-zero.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Set a local identity and disable signing for the repository at `dir`.
pub fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.email", TEST_USER_EMAIL]);
    git(dir, &["config", "user.name", TEST_USER_NAME]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Initialise a repository with one commit on `main`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn repo_with_commit(path: &Path) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("repo_with_commit: failed to create {}: {e}", path.display()));
    git(path, &["init", "--quiet"]);
    configure_identity(path);

    fs::write(path.join("README.md"), "# Upstream\n")
        .unwrap_or_else(|e| panic!("repo_with_commit: failed to write README.md: {e}"));
    git(path, &["add", "."]);
    git(path, &["commit", "--quiet", "-m", "Initial commit"]);
    git(path, &["branch", "-M", "main"]);
}

/// Create `branch` from `main` with one commit writing `file`, then switch
/// back to `main`. Returns the new commit id.
pub fn commit_on_branch(repo: &Path, branch: &str, file: &str, content: &str) -> String {
    git(repo, &["checkout", "--quiet", "-b", branch, "main"]);
    fs::write(repo.join(file), content)
        .unwrap_or_else(|e| panic!("commit_on_branch: failed to write {file}: {e}"));
    git(repo, &["add", file]);
    git(repo, &["commit", "--quiet", "-m", &format!("Add {file}")]);
    let sha = git(repo, &["rev-parse", "HEAD"]);
    git(repo, &["checkout", "--quiet", "main"]);
    sha
}

/// Publish `commit` as `refs/pull/<number>/head`, the way GitHub exposes
/// pull request heads.
pub fn publish_pull_request(repo: &Path, number: u64, commit: &str) {
    git(
        repo,
        &["update-ref", &format!("refs/pull/{number}/head"), commit],
    );
}

/// Commit id `refname` points at in the repository at `git_dir`, if any.
pub fn ref_target(git_dir: &Path, refname: &str) -> Option<String> {
    let repo = git2::Repository::open(git_dir)
        .unwrap_or_else(|e| panic!("ref_target: failed to open {}: {e}", git_dir.display()));
    let reference = repo.find_reference(refname).ok()?;
    let commit = reference.peel_to_commit().ok()?;
    Some(commit.id().to_string())
}
