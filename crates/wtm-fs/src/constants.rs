//! Names of the fixed entries in a worktree-managed root.

use std::path::Path;

/// Standard filesystem markers of a worktree-managed root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WtmPath {
    /// The `.bare` directory (shared Git database)
    BareDir,
    /// The `.worktree` directory (user-authored metadata)
    MetadataDir,
    /// The `files` directory inside `.worktree`
    FilesDir,
    /// The `hooks` directory inside `.worktree`
    HooksDir,
    /// The optional `config.toml` inside `.worktree`
    ConfigFile,
}

impl WtmPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BareDir => ".bare",
            Self::MetadataDir => ".worktree",
            Self::FilesDir => "files",
            Self::HooksDir => "hooks",
            Self::ConfigFile => "config.toml",
        }
    }
}

impl AsRef<Path> for WtmPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for WtmPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for WtmPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
