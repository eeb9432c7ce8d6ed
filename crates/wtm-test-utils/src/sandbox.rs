//! [`Sandbox`] for end-to-end worktree manager scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git::{self, TEST_USER_EMAIL, TEST_USER_NAME};

/// PR number published by [`Sandbox::new`].
pub const PR_NUMBER: u64 = 42;
/// Upstream branch backing [`PR_NUMBER`].
pub const PR_BRANCH: &str = "feature/login";
/// Plain upstream branch without a PR.
pub const FEATURE_BRANCH: &str = "feature/auth";

/// A temporary directory holding an isolated `HOME` and an `upstream`
/// repository with `main`, [`FEATURE_BRANCH`] and `refs/pull/42/head`.
///
/// # Example
///
/// ```rust,no_run
/// use wtm_test_utils::Sandbox;
///
/// let sandbox = Sandbox::new();
/// let url = sandbox.upstream_url();
/// let workspace = sandbox.path("project");
/// ```
pub struct Sandbox {
    temp_dir: TempDir,
    /// Commit `refs/pull/42/head` points at.
    pub pr_commit: String,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();

        let home = temp_dir.path().join("home");
        fs::create_dir_all(&home).unwrap();
        fs::write(
            home.join(".gitconfig"),
            format!(
                "[user]\n\tname = {TEST_USER_NAME}\n\temail = {TEST_USER_EMAIL}\n\
                 [commit]\n\tgpgsign = false\n[init]\n\tdefaultBranch = main\n"
            ),
        )
        .unwrap();

        let upstream = temp_dir.path().join("upstream");
        git::repo_with_commit(&upstream);
        git::commit_on_branch(&upstream, FEATURE_BRANCH, "auth.txt", "auth\n");
        let pr_commit = git::commit_on_branch(&upstream, PR_BRANCH, "login.txt", "login\n");
        git::publish_pull_request(&upstream, PR_NUMBER, &pr_commit);

        Self {
            temp_dir,
            pr_commit,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `HOME` with a configured git identity.
    pub fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    pub fn upstream(&self) -> PathBuf {
        self.root().join("upstream")
    }

    /// Clonable location of the upstream repository.
    pub fn upstream_url(&self) -> String {
        self.upstream().to_string_lossy().to_string()
    }

    /// Path of `relative` inside the sandbox.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Environment for child processes so they only see the sandbox's git
    /// configuration.
    pub fn git_env(&self) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("HOME", self.home()),
            ("XDG_CONFIG_HOME", self.home().join(".config")),
            ("GIT_CONFIG_NOSYSTEM", PathBuf::from("1")),
        ]
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write an executable script to `relative`.
    pub fn write_script(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.write(relative, content);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `relative` does **not** exist.
    pub fn assert_not_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            !full_path.exists(),
            "Expected path NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `relative` contains `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let full_path = self.path(relative);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
