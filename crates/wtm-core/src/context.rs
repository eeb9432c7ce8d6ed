//! Worktree context inferred from the working directory

use std::path::Path;

use wtm_fs::{NormalizedPath, WorkspaceLayout, WtmPath};

use crate::template::TemplateData;
use crate::{Error, Result};

/// The worktree a command was started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeContext {
    pub root: NormalizedPath,
    pub directory: NormalizedPath,
    /// The worktree directory name, which stands in for the branch.
    pub branch: String,
}

impl WorktreeContext {
    pub fn layout(&self) -> WorkspaceLayout {
        WorkspaceLayout::new(self.root.clone())
    }

    pub fn template_data(&self) -> TemplateData {
        TemplateData {
            branch: self.branch.clone(),
            directory: self.directory.to_string(),
            root_directory: self.root.to_string(),
        }
    }
}

/// Infer the worktree context for `cwd`.
///
/// The root is the closest ancestor holding a `.worktree/` directory, and
/// `cwd` must be a direct child of it.
pub fn infer_worktree_context(cwd: &Path) -> Result<WorktreeContext> {
    let cwd = if cwd.is_absolute() {
        cwd.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| Error::io(cwd, e))?
            .join(cwd)
    };

    let root = cwd
        .ancestors()
        .find(|dir| dir.join(WtmPath::MetadataDir.as_str()).is_dir())
        .ok_or_else(|| Error::NotInWorkspace { path: cwd.clone() })?;

    if cwd.parent() != Some(root) {
        return Err(Error::NotBranchDirectory { path: cwd.clone() });
    }

    let branch = cwd
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| Error::NotBranchDirectory { path: cwd.clone() })?;

    Ok(WorktreeContext {
        root: NormalizedPath::new(root),
        directory: NormalizedPath::new(&cwd),
        branch,
    })
}
