//! Git layer for the worktree manager
//!
//! Wraps the shared bare repository, classifies user-supplied references
//! and resolves pull requests into local branches.

pub mod bare;
pub mod error;
pub mod gh;
pub mod helpers;
pub mod naming;
pub mod pr;
pub mod query;
pub mod reference;
pub mod remote;
pub mod worktree;

pub use bare::BareRepo;
pub use error::{Error, Result};
pub use gh::{GhCli, PrSummary};
pub use pr::{PrMetadata, PrResolution, PrTier, resolve_pr};
pub use query::RepositoryReferenceQuery;
pub use reference::{BranchPlan, ParsedReference, classify, plan_branch};
pub use remote::{RemoteSlug, github_clone_url, remote_slug_of};
pub use worktree::WorktreeInfo;
