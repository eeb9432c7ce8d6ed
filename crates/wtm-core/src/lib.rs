//! Core orchestration layer for the worktree manager
//!
//! Sits between the CLI and the layer-0 crates:
//!
//! ```text
//!        wtm-cli
//!           |
//!       wtm-core        workspace, config, templates, hooks
//!        /     \
//!   wtm-fs   wtm-git
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod hooks;
pub mod template;
pub mod workspace;

pub use config::{HookSettings, PrSettings, Settings};
pub use context::{WorktreeContext, infer_worktree_context};
pub use error::{Error, Result};
pub use hooks::{HookEvent, HookRun, extract_shebang, run_event, run_hook, run_hook_by_name};
pub use template::{TemplateData, process_templates, render};
pub use workspace::{
    AddPlan, AddTarget, Aftermath, Checkout, InitRequest, PrCheckout, RemovePlan, Workspace,
};
