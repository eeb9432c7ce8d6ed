//! Add and pr command implementations

use std::path::Path;

use colored::Colorize;
use wtm_core::{AddTarget, Checkout, HookEvent, Workspace};
use wtm_git::{GhCli, PrMetadata, RepositoryReferenceQuery, remote_slug_of};

use super::report_aftermath;
use crate::error::Result;

/// Run the add command.
pub fn run_add(
    cwd: &Path,
    base: &str,
    new_branch: Option<&str>,
    directory: Option<&str>,
    no_hooks: bool,
) -> Result<()> {
    let workspace = Workspace::discover(cwd)?;
    let gh = GhCli::default();
    add_worktree(&workspace, &gh, base, new_branch, directory, no_hooks)
}

/// Run the pr command: `add pr/<number> [directory]`.
pub fn run_pr(cwd: &Path, number: u64, directory: Option<&str>, no_hooks: bool) -> Result<()> {
    run_add(cwd, &format!("pr/{number}"), directory, None, no_hooks)
}

fn add_worktree(
    workspace: &Workspace,
    gh: &GhCli,
    base: &str,
    new_branch: Option<&str>,
    directory: Option<&str>,
    no_hooks: bool,
) -> Result<()> {
    let plan = workspace.plan_add(base, new_branch, directory)?;

    match &plan.target {
        AddTarget::PullRequest { number, .. } => println!(
            "{} Fetching pull request {} into {}...",
            "=>".blue().bold(),
            format!("#{number}").cyan(),
            plan.directory.yellow()
        ),
        AddTarget::Branch(branch_plan) => match &branch_plan.start_point {
            Some(start) => println!(
                "{} Creating branch {} (from {}) in {}...",
                "=>".blue().bold(),
                branch_plan.branch.cyan(),
                start.yellow(),
                plan.directory.yellow()
            ),
            None => println!(
                "{} Checking out {} in {}...",
                "=>".blue().bold(),
                branch_plan.branch.cyan(),
                plan.directory.yellow()
            ),
        },
    }

    let checkout = workspace.checkout(&plan, Some(gh as &dyn PrMetadata))?;
    println!(
        "{} Worktree {} created at {}",
        "OK".green().bold(),
        checkout.branch.cyan(),
        checkout.path.as_str().yellow()
    );

    if workspace.settings().pr.use_gh {
        show_pr_summary(workspace, gh, &checkout);
    }

    let run_hooks = workspace.settings().hooks_enabled(no_hooks);
    let aftermath = workspace.populate(&checkout, run_hooks);
    report_aftermath(&aftermath, HookEvent::PostCreate);
    Ok(())
}

/// Print the PR title and description when gh can provide them.
fn show_pr_summary(workspace: &Workspace, gh: &GhCli, checkout: &Checkout) {
    let Some(pr) = &checkout.pr else {
        return;
    };
    if !gh.tool_available() {
        return;
    }
    let Some(slug) = workspace
        .repo()
        .origin_url()
        .ok()
        .flatten()
        .and_then(|url| remote_slug_of(&url))
    else {
        return;
    };

    match gh.pr_summary(&slug, pr.number) {
        Ok(summary) => {
            if !summary.title.is_empty() {
                println!();
                println!("{} {}", format!("#{}", pr.number).cyan(), summary.title.bold());
            }
            if !summary.body.is_empty() {
                println!();
                println!("{}", summary.body);
            }
        }
        Err(e) => tracing::debug!(number = pr.number, error = %e, "No PR summary"),
    }
}
