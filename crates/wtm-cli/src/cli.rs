//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Worktree Manager - one directory per branch around a shared bare repository
#[derive(Parser, Debug)]
#[command(name = "wtm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Lifecycle hook switch shared by the commands that create or remove
/// worktrees.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HookArgs {
    /// Skip post-create / post-delete hooks
    #[arg(long, env = "WTM_NO_HOOKS")]
    pub no_hooks: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a workspace from a repository
    ///
    /// Clones <REPO> as a bare repository into <DIRECTORY>/.bare and checks
    /// out the default branch next to it.
    ///
    /// Examples:
    ///   wtm init octo/widgets              # git@github.com:octo/widgets.git
    ///   wtm init https://host/widgets.git work
    ///   wtm init scratch --new             # empty repository with a main branch
    Init {
        /// `owner/repo`, a clone URL, or a name with --new
        repo: String,

        /// Workspace directory (defaults to the repository name)
        directory: Option<String>,

        /// Create a new empty repository instead of cloning
        #[arg(long)]
        new: bool,

        #[command(flatten)]
        hooks: HookArgs,
    },

    /// Add a worktree for a branch or pull request
    ///
    /// Examples:
    ///   wtm add feature/auth               # existing or remote branch
    ///   wtm add main topic                 # new branch topic from main
    ///   wtm add origin/release             # tracking branch release
    ///   wtm add pr/42                      # pull request into pr-42/
    ///   wtm add pr/42/review               # pull request into review/
    Add {
        /// Branch, `origin/<branch>` or `pr/<number>[/<directory>]`
        base: String,

        /// New branch to create from <BASE>
        new_branch: Option<String>,

        /// Worktree directory (defaults to the slugified branch name)
        directory: Option<String>,

        #[command(flatten)]
        hooks: HookArgs,
    },

    /// Add a worktree for a pull request
    ///
    /// Shorthand for `wtm add pr/<NUMBER> [DIRECTORY]`.
    Pr {
        /// Pull request number
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        number: u64,

        /// Worktree directory (defaults to pr-<NUMBER>)
        directory: Option<String>,

        #[command(flatten)]
        hooks: HookArgs,
    },

    /// Remove a worktree
    #[command(alias = "remove")]
    Rm {
        /// Worktree directory
        directory: String,

        /// Remove even with uncommitted changes
        #[arg(short, long)]
        force: bool,

        /// Also delete the worktree's branch
        #[arg(short, long)]
        delete_branch: bool,

        #[command(flatten)]
        hooks: HookArgs,
    },

    /// List worktrees
    #[command(alias = "list")]
    Ls,

    /// Run a hook from .worktree/hooks in the current worktree
    ///
    /// Must be run from a worktree directory directly below the workspace
    /// root. The script is rendered as a minijinja template first, with
    /// `branch`, `directory` and `root_directory` in scope. Conditionals
    /// (`{% if branch == "main" %}`), whitespace trimming and filters such
    /// as `slug`, `replace`, `upper` and `lower` are available.
    Hook {
        /// Hook script name
        name: String,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   wtm completions bash > ~/.local/share/bash-completion/completions/wtm
    ///   wtm completions zsh > ~/.zfunc/_wtm
    ///   wtm completions fish > ~/.config/fish/completions/wtm.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
