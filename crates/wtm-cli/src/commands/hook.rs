//! Hook command implementation

use std::path::Path;

use colored::Colorize;
use wtm_core::{HookRun, infer_worktree_context, run_hook_by_name};

use crate::error::{CliError, Result};

/// Run `.worktree/hooks/<name>` for the worktree containing `cwd`.
pub fn run_hook(cwd: &Path, name: &str) -> Result<()> {
    let context = infer_worktree_context(cwd)?;
    let layout = context.layout();
    let hook_path = layout.hook_path(name);

    println!(
        "{} Running hook {} in {}...",
        "=>".blue().bold(),
        name.cyan(),
        context.branch.yellow()
    );

    match run_hook_by_name(&layout, name, &context.template_data())? {
        HookRun::Completed => {
            println!("{} Hook {} completed.", "OK".green().bold(), name.cyan());
            Ok(())
        }
        HookRun::Missing => Err(CliError::user(format!(
            "Hook '{name}' not found at {hook_path}"
        ))),
        HookRun::NotExecutable => Err(CliError::user(format!(
            "Hook '{name}' is not executable: {hook_path}"
        ))),
    }
}
