//! Shared test utilities for the worktree manager workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git CLI fixtures: repositories with history and PR refs
//! - [`sandbox`]: [`Sandbox`] with an isolated `HOME` and an upstream repo

pub mod git;
pub mod sandbox;

pub use sandbox::Sandbox;
