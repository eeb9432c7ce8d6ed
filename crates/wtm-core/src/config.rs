//! Workspace settings from `.worktree/config.toml`

use serde::{Deserialize, Serialize};
use wtm_fs::{ConfigStore, WorkspaceLayout};

use crate::Result;

/// Settings for one workspace. Every field has a default, so a missing
/// file or a partial file are both valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub hooks: HookSettings,
    pub pr: PrSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookSettings {
    /// Run lifecycle hooks after create and before delete.
    pub enabled: bool,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrSettings {
    /// Allow the `gh` CLI tier when resolving pull requests.
    pub use_gh: bool,
}

impl Default for PrSettings {
    fn default() -> Self {
        Self { use_gh: true }
    }
}

impl Settings {
    /// Load settings for `layout`, falling back to defaults when the file
    /// does not exist.
    pub fn load(layout: &WorkspaceLayout) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(&layout.config_path())?)
    }

    /// Whether lifecycle hooks should run, given the `--no-hooks` flag.
    pub fn hooks_enabled(&self, no_hooks: bool) -> bool {
        self.hooks.enabled && !no_hooks
    }
}
