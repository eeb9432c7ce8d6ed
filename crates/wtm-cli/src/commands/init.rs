//! Init command implementation

use std::path::Path;

use colored::Colorize;
use wtm_core::{HookEvent, InitRequest, Workspace};

use super::report_aftermath;
use crate::error::Result;

/// Run the init command.
///
/// Creates the workspace under `cwd`, checks out the default branch and
/// populates it.
pub fn run_init(
    cwd: &Path,
    repo: &str,
    directory: Option<&str>,
    new: bool,
    no_hooks: bool,
) -> Result<()> {
    let request = InitRequest {
        repo: repo.to_string(),
        directory: directory.map(String::from),
        new,
    };
    let name = request.directory_name()?;

    if new {
        println!(
            "{} Creating new repository in {}...",
            "=>".blue().bold(),
            name.cyan()
        );
    } else {
        println!(
            "{} Cloning {} into {}...",
            "=>".blue().bold(),
            repo.yellow(),
            name.cyan()
        );
    }

    let workspace = Workspace::init(cwd, &request)?;
    let checkout = workspace.checkout_default_branch()?;
    println!(
        "{} Checked out {} at {}",
        "OK".green().bold(),
        checkout.branch.cyan(),
        checkout.path.as_str().yellow()
    );

    let run_hooks = workspace.settings().hooks_enabled(no_hooks);
    let aftermath = workspace.populate(&checkout, run_hooks);
    report_aftermath(&aftermath, HookEvent::PostCreate);

    println!(
        "{} Workspace ready at {}",
        "OK".green().bold(),
        workspace.layout().root().as_str().yellow()
    );
    Ok(())
}
