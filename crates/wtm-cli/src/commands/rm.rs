//! Rm command implementation

use std::path::Path;

use colored::Colorize;
use wtm_core::{HookEvent, Workspace};

use super::{report_aftermath, warn};
use crate::error::Result;

/// Run the rm command.
pub fn run_rm(
    cwd: &Path,
    directory: &str,
    force: bool,
    delete_branch: bool,
    no_hooks: bool,
) -> Result<()> {
    let workspace = Workspace::discover(cwd)?;
    let plan = workspace.plan_remove(directory, force, cwd)?;

    if plan.has_untracked_files {
        warn(&format!(
            "Worktree '{}' has untracked files that will be deleted",
            plan.directory
        ));
    }

    println!(
        "{} Removing worktree {}...",
        "=>".blue().bold(),
        plan.directory.cyan()
    );

    let run_hooks = workspace.settings().hooks_enabled(no_hooks);
    let aftermath = workspace.remove(&plan, force, delete_branch, run_hooks)?;
    report_aftermath(&aftermath, HookEvent::PostDelete);

    println!(
        "{} Worktree {} removed.",
        "OK".green().bold(),
        plan.directory.cyan()
    );
    if aftermath.branch_deleted {
        println!(
            "{} Branch {} deleted.",
            "OK".green().bold(),
            plan.branch.cyan()
        );
    }
    Ok(())
}
