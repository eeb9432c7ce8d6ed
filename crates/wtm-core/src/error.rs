//! Error types for wtm-core

use std::path::PathBuf;

/// Result type for wtm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wtm-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Template could not be rendered
    #[error("Template error in {name}: {message}")]
    Template { name: String, message: String },

    /// Hook script has no `#!` line
    #[error("No shebang found in hook script {hook}")]
    MissingShebang { hook: String },

    /// Hook process exited unsuccessfully
    #[error("Hook {hook} failed (exit code: {code:?})")]
    HookFailed { hook: String, code: Option<i32> },

    /// Current directory is not inside a managed workspace
    #[error("Not in a worktree directory: .worktree directory not found above {path}")]
    NotInWorkspace { path: PathBuf },

    /// Current directory is nested below a worktree
    #[error("Must be run from a branch directory (direct child of the root), not {path}")]
    NotBranchDirectory { path: PathBuf },

    /// Target directory for a new worktree or workspace already exists
    #[error("Directory '{path}' already exists")]
    DirectoryExists { path: PathBuf },

    /// Reference yields no usable worktree directory name
    #[error("Cannot derive a worktree directory name from {reference:?}")]
    InvalidDirectoryName { reference: String },

    /// Attempt to remove the worktree the process is running in
    #[error("Cannot remove the current worktree {path}, change to another directory first")]
    RemoveCurrentWorktree { path: PathBuf },

    /// Worktree has uncommitted changes and removal was not forced
    #[error("Worktree '{directory}' has uncommitted changes, use --force to remove anyway")]
    UncommittedChanges { directory: String },

    /// Workspace name could not be derived from the repository argument
    #[error("Cannot derive a directory name from {repo:?}")]
    InvalidRepository { repo: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from wtm-fs
    #[error(transparent)]
    Fs(#[from] wtm_fs::Error),

    /// Git error from wtm-git
    #[error(transparent)]
    Git(#[from] wtm_git::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
