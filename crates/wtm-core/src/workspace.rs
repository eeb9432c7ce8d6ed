//! Workspace orchestration: a root directory holding `.bare/`, `.worktree/`
//! and one directory per worktree.
//!
//! Each command is split into a planning step that validates input and
//! touches nothing, and an execution step. Best-effort steps (templates,
//! hooks, branch deletion) never fail the command; their errors are
//! returned as warnings for the caller to display.

use std::fs;
use std::path::{Path, PathBuf};

use wtm_fs::{NormalizedPath, WorkspaceLayout};
use wtm_git::naming::{pr_directory, worktree_directory};
use wtm_git::{
    BareRepo, BranchPlan, ParsedReference, PrMetadata, PrResolution, bare, classify,
    github_clone_url, plan_branch, resolve_pr,
};

use crate::config::Settings;
use crate::hooks::{HookEvent, HookRun, run_event};
use crate::template::{TemplateData, process_templates};
use crate::{Error, Result};

/// Branch created by `init --new`.
pub const INITIAL_BRANCH: &str = "main";

/// Arguments of `wtm init`.
#[derive(Debug, Clone)]
pub struct InitRequest {
    /// `owner/repo`, a clone URL, or a name with `new`.
    pub repo: String,
    /// Workspace directory; derived from `repo` when absent.
    pub directory: Option<String>,
    /// Create an empty repository instead of cloning.
    pub new: bool,
}

impl InitRequest {
    /// Workspace directory name: the explicit one, or the last path
    /// component of `repo` without `.git`.
    pub fn directory_name(&self) -> Result<String> {
        if let Some(directory) = self.directory.as_deref().filter(|d| !d.is_empty()) {
            return Ok(directory.to_string());
        }

        let base = self
            .repo
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .next()
            .unwrap_or_default();
        let base = base.strip_suffix(".git").unwrap_or(base);
        if base.is_empty() || base == "." || base == ".." {
            return Err(Error::InvalidRepository {
                repo: self.repo.clone(),
            });
        }
        Ok(base.to_string())
    }
}

/// What `add` will create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTarget {
    Branch(BranchPlan),
    PullRequest { number: u64, desired_branch: String },
}

/// A validated `add` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPlan {
    pub target: AddTarget,
    /// Directory name relative to the root (or absolute, as given).
    pub directory: String,
    pub path: NormalizedPath,
}

/// A worktree that now exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub branch: String,
    pub path: NormalizedPath,
    /// Set when the worktree was created from a pull request.
    pub pr: Option<PrCheckout>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrCheckout {
    pub number: u64,
    pub resolution: PrResolution,
}

/// A validated `rm` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovePlan {
    pub directory: String,
    pub path: NormalizedPath,
    /// Branch checked out in the worktree, or the directory name when it
    /// cannot be read.
    pub branch: String,
    pub has_untracked_files: bool,
}

/// Result of the best-effort steps after creating or before removing a
/// worktree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aftermath {
    pub files_written: usize,
    pub hook: Option<HookRun>,
    pub branch_deleted: bool,
    pub warnings: Vec<String>,
}

/// An opened workspace.
pub struct Workspace {
    layout: WorkspaceLayout,
    settings: Settings,
    repo: BareRepo,
}

impl Workspace {
    /// Open the workspace rooted at `layout`.
    pub fn open(layout: WorkspaceLayout) -> Result<Self> {
        let settings = Settings::load(&layout)?;
        let repo = BareRepo::open(layout.bare_dir())?;
        Ok(Self {
            layout,
            settings,
            repo,
        })
    }

    /// Open the workspace containing `cwd`.
    pub fn discover(cwd: &Path) -> Result<Self> {
        Self::open(WorkspaceLayout::discover(cwd)?)
    }

    /// Create a new workspace under `parent`: the metadata directories, then
    /// a bare clone of `request.repo` (or an empty repository with an initial
    /// `main` branch). The directory is removed again if any step fails.
    pub fn init(parent: &Path, request: &InitRequest) -> Result<Self> {
        let name = request.directory_name()?;
        let root = if Path::new(&name).is_absolute() {
            PathBuf::from(&name)
        } else {
            parent.join(&name)
        };
        if root.exists() {
            return Err(Error::DirectoryExists { path: root });
        }

        let layout = WorkspaceLayout::new(root.clone());
        let created = Self::create(layout, request);
        if created.is_err()
            && let Err(e) = fs::remove_dir_all(&root)
        {
            tracing::warn!(root = %root.display(), error = %e, "Failed to clean up workspace");
        }
        created
    }

    fn create(layout: WorkspaceLayout, request: &InitRequest) -> Result<Self> {
        fs::create_dir_all(layout.files_dir().to_native())
            .map_err(|e| Error::io(layout.files_dir().to_native(), e))?;

        if request.new {
            tracing::debug!(root = %layout.root(), "Creating new bare repository");
            let repo = BareRepo::init_bare(&layout.bare_dir())?;
            repo.create_initial_branch(INITIAL_BRANCH)?;
        } else {
            let url = github_clone_url(&request.repo);
            tracing::debug!(url = %url, root = %layout.root(), "Cloning bare repository");
            BareRepo::clone_bare(&url, &layout.bare_dir())?;
        }

        Self::open(layout)
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn repo(&self) -> &BareRepo {
        &self.repo
    }

    /// Create the worktree for the default branch.
    pub fn checkout_default_branch(&self) -> Result<Checkout> {
        let branch = self.repo.default_branch()?;
        let path = self.layout.worktree_path(&worktree_directory(&branch));
        if path.exists() {
            return Err(Error::DirectoryExists {
                path: path.to_native(),
            });
        }

        self.repo.add_worktree(&branch, &path, None)?;
        Ok(Checkout {
            branch,
            path,
            pr: None,
        })
    }

    /// Validate an `add` request without changing anything.
    ///
    /// For pull requests the directory is the hint from `pr/<n>/<name>`,
    /// else `directory`, else `new_branch`, else `pr-<n>`; the desired local
    /// branch carries the same name. For branches the directory is
    /// `directory` or the slugified branch name.
    pub fn plan_add(
        &self,
        base: &str,
        new_branch: Option<&str>,
        directory: Option<&str>,
    ) -> Result<AddPlan> {
        let parsed = classify(base)?;
        let directory = directory.filter(|d| !d.is_empty());
        let new_branch = new_branch.filter(|b| !b.is_empty());

        let (target, directory) = match &parsed {
            ParsedReference::PullRequest {
                number,
                custom_directory_hint,
            } => {
                let hint = [Some(custom_directory_hint.as_str()), directory, new_branch]
                    .into_iter()
                    .flatten()
                    .find(|name| !name.is_empty())
                    .unwrap_or_default();
                let directory = pr_directory(*number, hint);
                let desired_branch = Path::new(&directory)
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| directory.clone());
                (
                    AddTarget::PullRequest {
                        number: *number,
                        desired_branch,
                    },
                    directory,
                )
            }
            ParsedReference::LocalOrRemoteBranch { .. } => {
                let plan = plan_branch(&parsed, new_branch, &self.repo)?;
                let directory = directory
                    .map(String::from)
                    .unwrap_or_else(|| worktree_directory(&plan.branch));
                (AddTarget::Branch(plan), directory)
            }
        };

        if directory.is_empty() {
            return Err(Error::InvalidDirectoryName {
                reference: base.to_string(),
            });
        }

        let path = self.layout.worktree_path(&directory);
        if path.exists() {
            return Err(Error::DirectoryExists {
                path: path.to_native(),
            });
        }

        Ok(AddPlan {
            target,
            directory,
            path,
        })
    }

    /// Fetch (for pull requests) and create the planned worktree.
    ///
    /// `metadata` is only consulted when the `pr.use_gh` setting allows it.
    pub fn checkout(&self, plan: &AddPlan, metadata: Option<&dyn PrMetadata>) -> Result<Checkout> {
        match &plan.target {
            AddTarget::Branch(branch_plan) => {
                self.repo.add_worktree(
                    &branch_plan.branch,
                    &plan.path,
                    branch_plan.start_point.as_deref(),
                )?;
                Ok(Checkout {
                    branch: branch_plan.branch.clone(),
                    path: plan.path.clone(),
                    pr: None,
                })
            }
            AddTarget::PullRequest {
                number,
                desired_branch,
            } => {
                let metadata = metadata.filter(|_| self.settings.pr.use_gh);
                let resolution = resolve_pr(&self.repo, metadata, *number, desired_branch)?;
                tracing::debug!(
                    number,
                    branch = %resolution.local_branch_name,
                    tier = %resolution.used_tier,
                    "Resolved pull request"
                );

                self.repo
                    .add_worktree(&resolution.local_branch_name, &plan.path, None)?;
                Ok(Checkout {
                    branch: resolution.local_branch_name.clone(),
                    path: plan.path.clone(),
                    pr: Some(PrCheckout {
                        number: *number,
                        resolution,
                    }),
                })
            }
        }
    }

    fn template_data(&self, branch: &str, path: &NormalizedPath) -> TemplateData {
        TemplateData {
            branch: branch.to_string(),
            directory: path.to_string(),
            root_directory: self.layout.root().to_string(),
        }
    }

    /// Populate a new worktree from `.worktree/files` and run `post-create`.
    pub fn populate(&self, checkout: &Checkout, run_hooks: bool) -> Aftermath {
        let data = self.template_data(&checkout.branch, &checkout.path);
        let mut aftermath = Aftermath::default();

        match process_templates(&self.layout.files_dir(), &checkout.path, &data) {
            Ok(count) => aftermath.files_written = count,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to process files");
                aftermath
                    .warnings
                    .push(format!("Failed to process files: {e}"));
            }
        }

        if run_hooks {
            self.run_lifecycle_hook(HookEvent::PostCreate, &data, &mut aftermath);
        }

        aftermath
    }

    fn run_lifecycle_hook(&self, event: HookEvent, data: &TemplateData, aftermath: &mut Aftermath) {
        match run_event(&self.layout, event, data) {
            Ok(run) => aftermath.hook = Some(run),
            Err(e) => {
                tracing::warn!(hook = %event, error = %e, "Hook failed");
                aftermath.warnings.push(format!("{event} hook failed: {e}"));
            }
        }
    }

    /// Validate an `rm` request without changing anything.
    ///
    /// Refuses the worktree containing `cwd`, and a worktree with
    /// uncommitted changes unless `force` is set.
    pub fn plan_remove(&self, directory: &str, force: bool, cwd: &Path) -> Result<RemovePlan> {
        let path = self.layout.worktree_path(directory);
        if !path.is_dir() {
            return Err(wtm_git::Error::WorktreeNotFound {
                path: path.to_native(),
            }
            .into());
        }

        let cwd = NormalizedPath::new(cwd);
        if cwd.is_within(&path) {
            return Err(Error::RemoveCurrentWorktree {
                path: path.to_native(),
            });
        }

        let native = path.to_native();
        if !force && bare::has_uncommitted_changes(&native).unwrap_or(false) {
            return Err(Error::UncommittedChanges {
                directory: directory.to_string(),
            });
        }
        let has_untracked_files = !force && bare::has_untracked_files(&native).unwrap_or(false);

        let branch = bare::worktree_branch(&native).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Falling back to directory name for branch");
            path.file_name().unwrap_or(directory).to_string()
        });

        Ok(RemovePlan {
            directory: directory.to_string(),
            path,
            branch,
            has_untracked_files,
        })
    }

    /// Run `post-delete`, remove the worktree and optionally its branch.
    pub fn remove(
        &self,
        plan: &RemovePlan,
        force: bool,
        delete_branch: bool,
        run_hooks: bool,
    ) -> Result<Aftermath> {
        let mut aftermath = Aftermath::default();

        if run_hooks {
            let data = self.template_data(&plan.branch, &plan.path);
            self.run_lifecycle_hook(HookEvent::PostDelete, &data, &mut aftermath);
        }

        self.repo.remove_worktree(&plan.path, force)?;

        if delete_branch {
            match self.repo.delete_branch(&plan.branch) {
                Ok(()) => aftermath.branch_deleted = true,
                Err(e) => {
                    tracing::warn!(branch = %plan.branch, error = %e, "Failed to delete branch");
                    aftermath
                        .warnings
                        .push(format!("Failed to delete branch '{}': {e}", plan.branch));
                }
            }
        }

        Ok(aftermath)
    }

    /// `git worktree list` output.
    pub fn list(&self) -> Result<String> {
        Ok(self.repo.list_worktrees_text()?)
    }
}
