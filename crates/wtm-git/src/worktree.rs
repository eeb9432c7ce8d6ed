//! Parsed `git worktree list --porcelain` output.

use wtm_fs::NormalizedPath;

/// One entry of the worktree list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeInfo {
    pub path: NormalizedPath,
    /// Commit checked out, absent for the bare entry.
    pub head: Option<String>,
    /// Short branch name, absent when detached or bare.
    pub branch: Option<String>,
    pub is_bare: bool,
}

/// Parse porcelain output into entries, in listing order.
pub fn parse_porcelain(output: &str) -> Vec<WorktreeInfo> {
    let mut entries = Vec::new();
    let mut current: Option<WorktreeInfo> = None;

    for line in output.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            entries.extend(current.take());
            current = Some(WorktreeInfo {
                path: NormalizedPath::new(path),
                head: None,
                branch: None,
                is_bare: false,
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };
        if let Some(head) = line.strip_prefix("HEAD ") {
            entry.head = Some(head.to_string());
        } else if let Some(branch) = line.strip_prefix("branch ") {
            let short = branch.strip_prefix("refs/heads/").unwrap_or(branch);
            entry.branch = Some(short.to_string());
        } else if line == "bare" {
            entry.is_bare = true;
        }
    }
    entries.extend(current);

    entries
}
