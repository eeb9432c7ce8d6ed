//! Integration tests for the wtm binary.
//!
//! These tests exercise the compiled binary using assert_cmd against a
//! sandboxed upstream repository and `HOME`.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use wtm_test_utils::Sandbox;
use wtm_test_utils::git::git;

fn wtm(sandbox: &Sandbox, dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wtm"));
    cmd.current_dir(dir)
        .envs(sandbox.git_env())
        .env_remove("WTM_NO_HOOKS");
    cmd
}

/// `wtm init <upstream> project`, returning the workspace root.
fn init_workspace(sandbox: &Sandbox) -> std::path::PathBuf {
    wtm(sandbox, sandbox.root())
        .args(["init", &sandbox.upstream_url(), "project"])
        .assert()
        .success();
    sandbox.path("project")
}

#[cfg(unix)]
fn write_hook(sandbox: &Sandbox, name: &str, body: &str) {
    sandbox.write_script(
        &format!("project/.worktree/hooks/{name}"),
        &format!("#!/bin/sh\n{body}\n"),
    );
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_output() {
    let sandbox = Sandbox::new();
    wtm(&sandbox, sandbox.root())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Worktree Manager"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version_output() {
    let sandbox = Sandbox::new();
    wtm(&sandbox, sandbox.root())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wtm"));
}

#[test]
fn test_no_command_shows_help_hint() {
    let sandbox = Sandbox::new();
    wtm(&sandbox, sandbox.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("wtm --help"));
}

#[test]
fn test_completions_bash() {
    let sandbox = Sandbox::new();
    wtm(&sandbox, sandbox.root())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_wtm"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_clone() {
    let sandbox = Sandbox::new();
    wtm(&sandbox, sandbox.root())
        .args(["init", &sandbox.upstream_url(), "project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloning"))
        .stdout(predicate::str::contains("Workspace ready"));

    sandbox.assert_exists("project/.bare");
    sandbox.assert_exists("project/.worktree/files");
    sandbox.assert_file_contains("project/main/README.md", "# Upstream");
}

#[test]
fn test_init_directory_defaults_to_repository_name() {
    let sandbox = Sandbox::new();
    wtm(&sandbox, sandbox.root())
        .args(["init", &sandbox.upstream_url()])
        .assert()
        .success();

    // The upstream repository lives in `upstream/`, so that is the name.
    sandbox.assert_exists("upstream/.bare");
    sandbox.assert_exists("upstream/main");
}

#[test]
fn test_init_new_repository() {
    let sandbox = Sandbox::new();
    wtm(&sandbox, sandbox.root())
        .args(["init", "scratch", "--new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating new repository"));

    sandbox.assert_exists("scratch/main");
    let log = git(&sandbox.path("scratch/main"), &["log", "--format=%s"]);
    assert_eq!(log.trim(), "Initial commit");
}

#[test]
fn test_init_existing_directory_fails() {
    let sandbox = Sandbox::new();
    sandbox.write("project/keep.txt", "keep");

    wtm(&sandbox, sandbox.root())
        .args(["init", &sandbox.upstream_url(), "project"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    sandbox.assert_exists("project/keep.txt");
}

#[test]
fn test_init_bad_url_cleans_up() {
    let sandbox = Sandbox::new();
    let missing = sandbox.path("missing-upstream");

    wtm(&sandbox, sandbox.root())
        .args(["init", &missing.to_string_lossy(), "project"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));

    sandbox.assert_not_exists("project");
}

// ============================================================================
// Add and PR Tests
// ============================================================================

#[test]
fn test_add_existing_branch() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root)
        .args(["add", "feature/auth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("feature-auth"));

    sandbox.assert_file_contains("project/feature-auth/auth.txt", "auth");
}

#[test]
fn test_add_new_branch_from_worktree_directory() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root.join("main"))
        .args(["add", "main", "topic", "topic-work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating branch"));

    let branch = git(&root.join("topic-work"), &["branch", "--show-current"]);
    assert_eq!(branch.trim(), "topic");
}

#[test]
fn test_add_existing_directory_fails() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root)
        .args(["add", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_add_malformed_pr_fails() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root)
        .args(["add", "pr/abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pr/abc"));
}

#[test]
fn test_add_outside_workspace_fails() {
    let sandbox = Sandbox::new();

    wtm(&sandbox, sandbox.root())
        .args(["add", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_pr_command() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root)
        .args(["pr", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#42"));

    sandbox.assert_file_contains("project/pr-42/login.txt", "login");
    let branch = git(&root.join("pr-42"), &["branch", "--show-current"]);
    assert_eq!(branch.trim(), "pr-42");
}

#[test]
fn test_pr_command_with_directory() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root)
        .args(["pr", "42", "review"])
        .assert()
        .success();

    sandbox.assert_exists("project/review/login.txt");
}

#[test]
fn test_pr_missing_pull_request_fails() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root)
        .args(["pr", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("999"));

    sandbox.assert_not_exists("project/pr-999");
}

#[test]
fn test_pr_zero_rejected() {
    let sandbox = Sandbox::new();
    wtm(&sandbox, sandbox.root())
        .args(["pr", "0"])
        .assert()
        .failure();
}

#[cfg(unix)]
#[test]
fn test_add_populates_files_and_runs_hook() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);
    sandbox.write(
        "project/.worktree/files/.env.tmpl",
        "BRANCH={{ branch }}\nSLUG={{ branch | slug }}\n",
    );
    sandbox.write("project/.worktree/files/tools/notes.md", "notes\n");
    write_hook(&sandbox, "post-create", "echo '{{ branch }}' > created.txt");

    wtm(&sandbox, &root)
        .args(["add", "feature/auth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Populated 2 file(s)"))
        .stdout(predicate::str::contains("post-create"));

    sandbox.assert_file_contains("project/feature-auth/.env", "BRANCH=feature/auth");
    sandbox.assert_file_contains("project/feature-auth/.env", "SLUG=feature-auth");
    sandbox.assert_exists("project/feature-auth/tools/notes.md");
    sandbox.assert_file_contains("project/feature-auth/created.txt", "feature/auth");
}

#[cfg(unix)]
#[test]
fn test_no_hooks_flag_and_env() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);
    write_hook(&sandbox, "post-create", "touch created.txt");

    wtm(&sandbox, &root)
        .args(["add", "main", "one", "--no-hooks"])
        .assert()
        .success();
    sandbox.assert_not_exists("project/one/created.txt");

    wtm(&sandbox, &root)
        .args(["add", "main", "two"])
        .env("WTM_NO_HOOKS", "1")
        .assert()
        .success();
    sandbox.assert_not_exists("project/two/created.txt");
}

#[cfg(unix)]
#[test]
fn test_failing_hook_is_a_warning() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);
    write_hook(&sandbox, "post-create", "exit 3");

    wtm(&sandbox, &root)
        .args(["add", "feature/auth"])
        .assert()
        .success()
        .stderr(predicate::str::contains("!!"))
        .stderr(predicate::str::contains("post-create"));

    sandbox.assert_exists("project/feature-auth");
}

// ============================================================================
// Rm and Ls Tests
// ============================================================================

#[test]
fn test_rm_with_branch_deletion() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);
    wtm(&sandbox, &root)
        .args(["add", "main", "topic"])
        .assert()
        .success();

    wtm(&sandbox, &root)
        .args(["rm", "topic", "-d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"))
        .stdout(predicate::str::contains("Branch topic deleted"));

    sandbox.assert_not_exists("project/topic");
    let branches = git(&root.join("main"), &["branch", "--list", "topic"]);
    assert!(branches.trim().is_empty(), "branch still exists: {branches}");
}

#[test]
fn test_rm_current_worktree_fails() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root.join("main"))
        .args(["rm", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot remove the current worktree"));

    sandbox.assert_exists("project/main");
}

#[test]
fn test_rm_uncommitted_changes_requires_force() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);
    sandbox.write("project/main/README.md", "edited\n");

    wtm(&sandbox, &root)
        .args(["rm", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    sandbox.assert_exists("project/main");

    wtm(&sandbox, &root)
        .args(["rm", "main", "--force"])
        .assert()
        .success();
    sandbox.assert_not_exists("project/main");
}

#[test]
fn test_rm_warns_on_untracked_files() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);
    sandbox.write("project/main/scratch.txt", "scratch\n");

    // git itself refuses to drop untracked files without --force.
    wtm(&sandbox, &root)
        .args(["rm", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("untracked files that will be deleted"));
    sandbox.assert_exists("project/main/scratch.txt");

    wtm(&sandbox, &root)
        .args(["rm", "main", "-f"])
        .assert()
        .success();
    sandbox.assert_not_exists("project/main");
}

#[test]
fn test_rm_missing_worktree_fails() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root)
        .args(["rm", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[cfg(unix)]
#[test]
fn test_rm_runs_post_delete_hook() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);
    write_hook(
        &sandbox,
        "post-delete",
        "echo '{{ branch }}' > '{{ root_directory }}/removed.txt'",
    );

    wtm(&sandbox, &root)
        .args(["rm", "main"])
        .assert()
        .success();

    sandbox.assert_file_contains("project/removed.txt", "main");
}

#[test]
fn test_ls_lists_worktrees() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("[main]"))
        .stdout(predicate::str::contains("bare"));
}

// ============================================================================
// Hook Tests
// ============================================================================

#[cfg(unix)]
#[test]
fn test_hook_command_runs_named_hook() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);
    write_hook(&sandbox, "setup", "echo '{{ branch }}' > setup.txt");

    wtm(&sandbox, &root.join("main"))
        .args(["hook", "setup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));

    sandbox.assert_file_contains("project/main/setup.txt", "main");
}

#[test]
fn test_hook_command_from_root_fails() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root)
        .args(["hook", "setup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("branch directory"));
}

#[test]
fn test_hook_command_missing_hook_fails() {
    let sandbox = Sandbox::new();
    let root = init_workspace(&sandbox);

    wtm(&sandbox, &root.join("main"))
        .args(["hook", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
