//! Lifecycle hooks for worktree events
//!
//! Hooks are executable scripts in `.worktree/hooks/`, named after the
//! event that triggers them (`post-create`, `post-delete`) or invoked by
//! name through `wtm hook <name>`. A script is rendered as a template
//! first, then run by the interpreter named in its shebang, with the
//! worktree directory as working directory.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use wtm_fs::{NormalizedPath, WorkspaceLayout};

use crate::error::{Error, Result};
use crate::template::{TemplateData, render};

/// Events that trigger hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// After a worktree is created and populated
    PostCreate,
    /// Before a worktree is removed
    PostDelete,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HookEvent {
    /// Script name under `.worktree/hooks/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostCreate => "post-create",
            Self::PostDelete => "post-delete",
        }
    }

    /// Parse a hook event from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post-create" => Some(Self::PostCreate),
            "post-delete" => Some(Self::PostDelete),
            _ => None,
        }
    }

    /// List all valid event names
    pub fn all_names() -> &'static [&'static str] {
        &["post-create", "post-delete"]
    }
}

/// What happened when a hook was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookRun {
    /// No script at the hook path.
    Missing,
    /// Script exists but lacks the executable bit.
    NotExecutable,
    /// Script ran and exited successfully.
    Completed,
}

/// Split a script into its shebang interpreter and the remaining body.
///
/// Returns `None` when the first line is not a `#!` line.
pub fn extract_shebang(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("#!")?;
    Some(match rest.split_once('\n') {
        Some((interpreter, body)) => (interpreter.trim_end_matches('\r'), body),
        None => (rest, ""),
    })
}

/// Render and run the hook script at `hook_path`.
pub fn run_hook(hook_path: &NormalizedPath, data: &TemplateData) -> Result<HookRun> {
    let native = hook_path.to_native();
    let hook = hook_path.file_name().unwrap_or("hook").to_string();

    let metadata = match fs::metadata(&native) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(hook = %hook_path, "Hook not found, skipping");
            return Ok(HookRun::Missing);
        }
        Err(e) => return Err(Error::io(&native, e)),
    };

    if !is_executable(&metadata) {
        tracing::debug!(hook = %hook_path, "Hook is not executable, skipping");
        return Ok(HookRun::NotExecutable);
    }

    let source = wtm_fs::io::read_text(hook_path)?;
    let script = render(&hook, &source, data)?;

    let (interpreter, body) = extract_shebang(&script)
        .ok_or_else(|| Error::MissingShebang { hook: hook.clone() })?;
    let mut parts = interpreter.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::MissingShebang { hook: hook.clone() })?;

    let mut script_file = tempfile::Builder::new()
        .prefix("wtm-hook-")
        .tempfile()
        .map_err(|e| Error::io(std::env::temp_dir(), e))?;
    script_file
        .write_all(body.as_bytes())
        .map_err(|e| Error::io(script_file.path(), e))?;

    tracing::debug!(hook = %hook, interpreter, cwd = %data.directory, "Running hook");
    let status = Command::new(program)
        .args(parts)
        .arg(script_file.path())
        .current_dir(Path::new(&data.directory))
        .status()
        .map_err(|e| Error::io(program, e))?;

    if !status.success() {
        return Err(Error::HookFailed {
            hook,
            code: status.code(),
        });
    }

    Ok(HookRun::Completed)
}

/// Run `.worktree/hooks/<name>`.
pub fn run_hook_by_name(
    layout: &WorkspaceLayout,
    name: &str,
    data: &TemplateData,
) -> Result<HookRun> {
    run_hook(&layout.hook_path(name), data)
}

/// Run the hook registered for `event`.
pub fn run_event(
    layout: &WorkspaceLayout,
    event: HookEvent,
    data: &TemplateData,
) -> Result<HookRun> {
    run_hook_by_name(layout, event.as_str(), data)
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(metadata: &fs::Metadata) -> bool {
    metadata.is_file()
}
