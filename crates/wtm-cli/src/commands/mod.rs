//! Command implementations for wtm-cli

pub mod add;
pub mod completions;
pub mod hook;
pub mod init;
pub mod ls;
pub mod rm;

pub use add::{run_add, run_pr};
pub use completions::run_completions;
pub use hook::run_hook;
pub use init::run_init;
pub use ls::run_ls;
pub use rm::run_rm;

use colored::Colorize;
use wtm_core::{Aftermath, HookEvent, HookRun};

/// Print a `!!` warning line to stderr.
pub(crate) fn warn(message: &str) {
    eprintln!("{} {}", "!!".yellow().bold(), message);
}

/// Report the best-effort steps that followed a create or remove.
pub(crate) fn report_aftermath(aftermath: &Aftermath, event: HookEvent) {
    if aftermath.files_written > 0 {
        println!(
            "{} Populated {} file(s) from .worktree/files",
            "OK".green().bold(),
            aftermath.files_written
        );
    }

    if aftermath.hook == Some(HookRun::Completed) {
        println!("{} Ran {} hook", "OK".green().bold(), event.to_string().cyan());
    }

    for warning in &aftermath.warnings {
        warn(warning);
    }
}
