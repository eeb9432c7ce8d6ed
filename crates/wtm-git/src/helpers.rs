//! Process helpers for invoking `git` and other external tools.

use std::path::Path;
use std::process::{Command, Output};

use crate::{Error, Result};

/// Build a `git` command bound to a git directory.
pub fn git_dir_command(git_dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg(format!("--git-dir={}", git_dir.display()));
    cmd
}

/// Build a `git -C <path>` command for a worktree.
pub fn worktree_command(path: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(path);
    cmd
}

/// Render a command for error messages and logs.
pub fn describe(cmd: &Command) -> String {
    let mut rendered = cmd.get_program().to_string_lossy().to_string();
    for arg in cmd.get_args() {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}

/// Spawn `cmd` and wait for it, without interpreting the exit status.
pub fn output(cmd: &mut Command) -> Result<Output> {
    tracing::debug!(command = %describe(cmd), "Running");
    cmd.output().map_err(|source| Error::Spawn {
        program: cmd.get_program().to_string_lossy().to_string(),
        source,
    })
}

/// Run `cmd`, returning its stdout on success.
///
/// A non-zero exit becomes [`Error::GitCommand`] carrying the combined
/// stdout/stderr, trimmed.
pub fn run(cmd: &mut Command) -> Result<String> {
    let out = output(cmd)?;
    if out.status.success() {
        return Ok(String::from_utf8_lossy(&out.stdout).to_string());
    }

    Err(Error::GitCommand {
        command: describe(cmd),
        output: combined_output(&out),
    })
}

/// Stdout followed by stderr, trimmed.
pub fn combined_output(out: &Output) -> String {
    let mut combined = String::from_utf8_lossy(&out.stdout).to_string();
    combined.push_str(&String::from_utf8_lossy(&out.stderr));
    combined.trim().to_string()
}
