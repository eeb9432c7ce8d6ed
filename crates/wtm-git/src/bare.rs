//! The bare repository shared by all worktrees.
//!
//! Local ref inspection goes through `git2`; anything touching the network
//! or the worktree machinery shells out to `git` so credential helpers,
//! submodules and hooks behave exactly as they do for the user.

use std::path::Path;
use std::sync::OnceLock;

use git2::{BranchType, ErrorCode, Repository};
use wtm_fs::NormalizedPath;

use crate::{
    Error, RepositoryReferenceQuery, Result, helpers,
    worktree::{WorktreeInfo, parse_porcelain},
};

/// Branch names tried when HEAD gives no answer.
const COMMON_DEFAULT_BRANCHES: &[&str] = &["main", "master", "develop"];

/// Handle on a bare repository directory (usually `<root>/.bare`).
pub struct BareRepo {
    git_dir: NormalizedPath,
    repo_cache: OnceLock<Repository>,
}

impl BareRepo {
    /// Wrap an existing bare repository.
    pub fn open(git_dir: NormalizedPath) -> Result<Self> {
        let bare = Self {
            git_dir,
            repo_cache: OnceLock::new(),
        };
        bare.repo()?;
        Ok(bare)
    }

    /// `git clone --bare <url> <dest>`.
    ///
    /// Also configures the usual `origin` fetch refspec, which bare clones
    /// omit, so later fetches maintain `refs/remotes/origin/*`.
    pub fn clone_bare(url: &str, dest: &NormalizedPath) -> Result<Self> {
        tracing::debug!(url, dest = %dest, "Cloning bare repository");
        let mut cmd = std::process::Command::new("git");
        cmd.args(["clone", "--bare", url]).arg(dest.to_native());
        helpers::run(&mut cmd)?;

        let bare = Self::open(dest.clone())?;
        bare.repo()?
            .config()?
            .set_str("remote.origin.fetch", "+refs/heads/*:refs/remotes/origin/*")?;
        Ok(bare)
    }

    /// Initialize an empty bare repository.
    pub fn init_bare(dest: &NormalizedPath) -> Result<Self> {
        tracing::debug!(dest = %dest, "Initializing bare repository");
        Repository::init_bare(dest.to_native())?;
        Self::open(dest.clone())
    }

    pub fn git_dir(&self) -> &NormalizedPath {
        &self.git_dir
    }

    /// Open the cached repository handle.
    pub fn repo(&self) -> Result<&Repository> {
        if let Some(repo) = self.repo_cache.get() {
            return Ok(repo);
        }
        let repo = Repository::open_bare(self.git_dir.to_native())?;
        Ok(self.repo_cache.get_or_init(|| repo))
    }

    fn git(&self) -> std::process::Command {
        helpers::git_dir_command(&self.git_dir.to_native())
    }

    /// Point HEAD at `branch` and give it an empty initial commit.
    ///
    /// Requires `user.name` and `user.email` to be configured.
    pub fn create_initial_branch(&self, branch: &str) -> Result<()> {
        let repo = self.repo()?;
        ensure_user_configured(repo)?;

        let refname = format!("refs/heads/{branch}");
        repo.set_head(&refname)?;

        let tree_id = repo.treebuilder(None)?.write()?;
        let tree = repo.find_tree(tree_id)?;
        let signature = repo.signature()?;
        repo.commit(
            Some(&refname),
            &signature,
            &signature,
            "Initial commit",
            &tree,
            &[],
        )?;

        tracing::debug!(branch, "Created initial branch");
        Ok(())
    }

    /// Default branch of the repository.
    ///
    /// Tries, in order: the branch HEAD points at, `origin/HEAD`, the first
    /// existing of `main`/`master`/`develop`, then the first local branch.
    pub fn default_branch(&self) -> Result<String> {
        let repo = self.repo()?;

        if let Ok(head) = repo.find_reference("HEAD")
            && let Some(target) = head.symbolic_target()
            && let Some(branch) = target.strip_prefix("refs/heads/")
            && !branch.is_empty()
            && self.local_branch_exists(branch)?
        {
            return Ok(branch.to_string());
        }

        if let Ok(origin_head) = repo.find_reference("refs/remotes/origin/HEAD")
            && let Some(target) = origin_head.symbolic_target()
            && let Some(branch) = target.strip_prefix("refs/remotes/origin/")
        {
            return Ok(branch.to_string());
        }

        for candidate in COMMON_DEFAULT_BRANCHES {
            if self.local_branch_exists(candidate)? {
                return Ok((*candidate).to_string());
            }
        }

        let mut branches = repo.branches(Some(BranchType::Local))?;
        if let Some(Ok((branch, _))) = branches.next()
            && let Some(name) = branch.name()?
        {
            return Ok(name.to_string());
        }

        Err(Error::NoBranches)
    }

    /// Create a worktree at `path`.
    ///
    /// With a `start_point`, `branch` is created from it (`-b`); otherwise
    /// `branch` must already exist. Submodules are initialized best-effort.
    pub fn add_worktree(
        &self,
        branch: &str,
        path: &NormalizedPath,
        start_point: Option<&str>,
    ) -> Result<()> {
        if path.exists() {
            return Err(Error::WorktreeExists {
                path: path.to_native(),
            });
        }

        let mut cmd = self.git();
        cmd.args(["worktree", "add"]);
        match start_point {
            Some(start) => {
                cmd.args(["-b", branch]).arg(path.to_native()).arg(start);
            }
            None => {
                cmd.arg(path.to_native()).arg(branch);
            }
        }
        helpers::run(&mut cmd)?;

        let mut submodules = helpers::worktree_command(&path.to_native());
        submodules.args(["submodule", "update", "--init", "--recursive"]);
        if let Err(e) = helpers::run(&mut submodules) {
            tracing::debug!(error = %e, "Submodule initialization skipped");
        }

        Ok(())
    }

    /// `git worktree remove [--force] <path>`.
    pub fn remove_worktree(&self, path: &NormalizedPath, force: bool) -> Result<()> {
        if !path.is_dir() {
            return Err(Error::WorktreeNotFound {
                path: path.to_native(),
            });
        }

        let mut cmd = self.git();
        cmd.args(["worktree", "remove"]);
        if force {
            cmd.arg("--force");
        }
        cmd.arg(path.to_native());
        helpers::run(&mut cmd)?;
        Ok(())
    }

    /// Human-readable `git worktree list` output.
    pub fn list_worktrees_text(&self) -> Result<String> {
        let mut cmd = self.git();
        cmd.args(["worktree", "list"]);
        helpers::run(&mut cmd)
    }

    /// Structured worktree list.
    pub fn list_worktrees(&self) -> Result<Vec<WorktreeInfo>> {
        let mut cmd = self.git();
        cmd.args(["worktree", "list", "--porcelain"]);
        Ok(parse_porcelain(&helpers::run(&mut cmd)?))
    }

    /// Force-delete a local branch (`git branch -D`).
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        let repo = self.repo()?;
        let mut branch =
            repo.find_branch(name, BranchType::Local)
                .map_err(|_| Error::BranchNotFound {
                    name: name.to_string(),
                })?;
        branch.delete()?;
        Ok(())
    }
}

impl RepositoryReferenceQuery for BareRepo {
    fn local_branch_exists(&self, name: &str) -> Result<bool> {
        reference_exists(self.repo()?, &format!("refs/heads/{name}"))
    }

    fn remote_branch_exists(&self, name: &str) -> Result<bool> {
        reference_exists(self.repo()?, &format!("refs/remotes/origin/{name}"))
    }

    fn fetch_refspec(&self, refspec: &str) -> Result<()> {
        let mut cmd = self.git();
        cmd.args(["fetch", "origin", refspec]);
        helpers::run(&mut cmd)?;
        Ok(())
    }

    fn origin_url(&self) -> Result<Option<String>> {
        match self.repo()?.find_remote("origin") {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == ErrorCode::NotFound || e.code() == ErrorCode::InvalidSpec => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn reference_exists(repo: &Repository, refname: &str) -> Result<bool> {
    match repo.find_reference(refname) {
        Ok(_) => Ok(true),
        Err(e) if e.code() == ErrorCode::NotFound || e.code() == ErrorCode::InvalidSpec => {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn ensure_user_configured(repo: &Repository) -> Result<()> {
    let config = repo.config()?;
    for (key, example) in [
        ("user.name", "\"Your Name\""),
        ("user.email", "\"your.email@example.com\""),
    ] {
        if config.get_string(key).map(|v| v.is_empty()).unwrap_or(true) {
            return Err(Error::GitUserNotConfigured {
                key: key.to_string(),
                example: example.to_string(),
            });
        }
    }
    Ok(())
}

/// Branch checked out in the worktree at `path`.
pub fn worktree_branch(path: &Path) -> Result<String> {
    let repo = Repository::open(path)?;
    let head = repo.head()?;
    if !head.is_branch() {
        return Err(Error::DetachedHead {
            path: path.to_path_buf(),
        });
    }
    head.shorthand()
        .map(String::from)
        .ok_or_else(|| Error::DetachedHead {
            path: path.to_path_buf(),
        })
}

/// Whether tracked files in the worktree differ from HEAD.
pub fn has_uncommitted_changes(path: &Path) -> Result<bool> {
    let mut cmd = helpers::worktree_command(path);
    cmd.args(["diff-index", "--quiet", "HEAD", "--"]);
    let out = helpers::output(&mut cmd)?;

    match out.status.code() {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(Error::GitCommand {
            command: helpers::describe(&cmd),
            output: helpers::combined_output(&out),
        }),
    }
}

/// Whether the worktree contains untracked, non-ignored files.
pub fn has_untracked_files(path: &Path) -> Result<bool> {
    let mut cmd = helpers::worktree_command(path);
    cmd.args(["ls-files", "--others", "--exclude-standard"]);
    Ok(!helpers::run(&mut cmd)?.trim().is_empty())
}
