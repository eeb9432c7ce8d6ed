//! Root discovery and the on-disk layout of a worktree-managed repository.
//!
//! ```text
//! {root}/
//! ├── .bare/          # Bare Git database shared by all worktrees
//! ├── .worktree/
//! │   ├── config.toml # Optional settings
//! │   ├── files/      # Copied or rendered into new worktrees
//! │   └── hooks/      # Lifecycle hook scripts
//! ├── main/           # Default branch worktree
//! └── feature-x/      # Feature worktree
//! ```

use std::path::Path;

use crate::{Error, NormalizedPath, Result, WtmPath};

/// Paths of a worktree-managed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: NormalizedPath,
}

impl WorkspaceLayout {
    /// Wrap a known root directory. No validation is performed.
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the root by walking up from `start`.
    pub fn discover(start: &Path) -> Result<Self> {
        find_root(start).map(Self::new)
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// The shared bare repository.
    pub fn bare_dir(&self) -> NormalizedPath {
        self.root.join(WtmPath::BareDir.as_str())
    }

    /// The `.worktree` metadata directory.
    pub fn metadata_dir(&self) -> NormalizedPath {
        self.root.join(WtmPath::MetadataDir.as_str())
    }

    pub fn files_dir(&self) -> NormalizedPath {
        self.metadata_dir().join(WtmPath::FilesDir.as_str())
    }

    pub fn hooks_dir(&self) -> NormalizedPath {
        self.metadata_dir().join(WtmPath::HooksDir.as_str())
    }

    /// Path of a named hook script.
    pub fn hook_path(&self, name: &str) -> NormalizedPath {
        self.hooks_dir().join(name)
    }

    pub fn config_path(&self) -> NormalizedPath {
        self.metadata_dir().join(WtmPath::ConfigFile.as_str())
    }

    /// Worktree directory for `directory`, which may be absolute or
    /// relative to the root.
    pub fn worktree_path(&self, directory: &str) -> NormalizedPath {
        if Path::new(directory).is_absolute() {
            NormalizedPath::new(directory)
        } else {
            self.root.join(directory)
        }
    }
}

/// Walk up from `start` until a directory containing `.bare/` is found.
pub fn find_root(start: &Path) -> Result<NormalizedPath> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(WtmPath::BareDir.as_str()).is_dir() {
            tracing::debug!(root = %dir.display(), "Found worktree root");
            return Ok(NormalizedPath::new(dir));
        }
        current = dir.parent();
    }

    Err(Error::RootNotFound {
        start: start.to_path_buf(),
    })
}
