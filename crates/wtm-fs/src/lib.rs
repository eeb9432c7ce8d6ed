//! Filesystem layer for the worktree manager
//!
//! Resolves the `.bare` / `.worktree` directory layout and provides
//! atomic I/O and configuration loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use config::ConfigStore;
pub use constants::WtmPath;
pub use error::{Error, Result};
pub use layout::{WorkspaceLayout, find_root};
pub use path::NormalizedPath;
