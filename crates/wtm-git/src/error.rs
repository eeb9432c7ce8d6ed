//! Error types for wtm-git

use std::path::PathBuf;

/// Result type for wtm-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wtm-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] wtm_fs::Error),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed: {output}")]
    GitCommand { command: String, output: String },

    #[error("Invalid reference: {reference:?}")]
    InvalidReference { reference: String },

    #[error("Invalid PR syntax {reference:?}, use pr/<number> or pr/<number>/<name>")]
    InvalidPrSyntax { reference: String },

    #[error("{program} not found on PATH")]
    ToolMissing { program: String },

    #[error("PR metadata unavailable: {reason}")]
    PrMetadataUnavailable { reason: String },

    #[error("Failed to fetch PR #{number}: {output}")]
    PrFetchFailed { number: u64, output: String },

    #[error("Branch '{name}' not found")]
    BranchNotFound { name: String },

    #[error("Worktree directory already exists at {path}")]
    WorktreeExists { path: PathBuf },

    #[error("Worktree not found at {path}")]
    WorktreeNotFound { path: PathBuf },

    #[error("Worktree at {path} is in detached HEAD state")]
    DetachedHead { path: PathBuf },

    #[error("git {key} is not configured. Please run:\n  git config --global {key} {example}")]
    GitUserNotConfigured { key: String, example: String },

    #[error("No branches found in repository")]
    NoBranches,
}
