//! Worktree Manager CLI
//!
//! Manages a workspace of Git worktrees around a shared bare repository.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} Worktree Manager", "wtm".green().bold());
            println!();
            println!("Run {} for available commands.", "wtm --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Init {
            repo,
            directory,
            new,
            hooks,
        } => commands::run_init(&cwd, &repo, directory.as_deref(), new, hooks.no_hooks),
        Commands::Add {
            base,
            new_branch,
            directory,
            hooks,
        } => commands::run_add(
            &cwd,
            &base,
            new_branch.as_deref(),
            directory.as_deref(),
            hooks.no_hooks,
        ),
        Commands::Pr {
            number,
            directory,
            hooks,
        } => commands::run_pr(&cwd, number, directory.as_deref(), hooks.no_hooks),
        Commands::Rm {
            directory,
            force,
            delete_branch,
            hooks,
        } => commands::run_rm(&cwd, &directory, force, delete_branch, hooks.no_hooks),
        Commands::Ls => commands::run_ls(&cwd),
        Commands::Hook { name } => commands::run_hook(&cwd, &name),
        Commands::Completions { shell } => {
            commands::run_completions(shell);
            Ok(())
        }
    }
}
