//! Ls command implementation

use std::path::Path;

use wtm_core::Workspace;

use crate::error::Result;

/// Run the ls command: `git worktree list` for the workspace.
pub fn run_ls(cwd: &Path) -> Result<()> {
    let workspace = Workspace::discover(cwd)?;
    print!("{}", workspace.list()?);
    Ok(())
}
