//! Pull request resolution.
//!
//! Turns a PR number into a local branch using three tiers, tried in
//! order with an early return on the first success:
//!
//! ```text
//! 1. gh CLI     gh pr view <n> --repo <owner>/<repo> --json headRefName
//!               git fetch origin pull/<n>/head:<headRefName>
//! 2. refspec    git fetch origin pull/<n>/head:<desired>
//! 3. refspec    git fetch origin +refs/pull/<n>/head:refs/heads/<desired>
//! ```
//!
//! When the gh tier succeeds the local branch is named after the PR's real
//! head branch; the refspec tiers use the caller's desired name. Any
//! failure inside the gh tier falls through to the refspec tiers. Only the
//! exhaustion of both refspec tiers is reported, as
//! [`Error::PrFetchFailed`].

use std::fmt;

use crate::{Error, RepositoryReferenceQuery, Result, remote::RemoteSlug, remote_slug_of};

/// Source of PR metadata (the `gh` CLI in production).
pub trait PrMetadata {
    /// Whether the metadata tool can be run at all.
    fn tool_available(&self) -> bool;

    /// Head branch name of PR `number` in `slug`.
    fn query_head_branch(&self, slug: &RemoteSlug, number: u64) -> Result<String>;
}

/// Strategy that produced a [`PrResolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrTier {
    GhCli,
    Refspec,
}

impl fmt::Display for PrTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GhCli => write!(f, "gh-cli"),
            Self::Refspec => write!(f, "refspec"),
        }
    }
}

/// A fetched pull request.
///
/// `local_branch_name` exists as `refs/heads/<local_branch_name>` in the
/// repository once this value is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrResolution {
    pub local_branch_name: String,
    pub used_tier: PrTier,
}

/// Fetch PR `number` into a local branch.
///
/// `metadata` is `None` when the gh tier is disabled by configuration.
pub fn resolve_pr(
    query: &dyn RepositoryReferenceQuery,
    metadata: Option<&dyn PrMetadata>,
    number: u64,
    desired_branch: &str,
) -> Result<PrResolution> {
    if number == 0 || desired_branch.is_empty() {
        return Err(Error::InvalidReference {
            reference: format!("pr/{number} -> {desired_branch:?}"),
        });
    }

    if let Some(metadata) = metadata {
        match fetch_with_metadata(query, metadata, number) {
            Ok(head_branch) => {
                tracing::debug!(number, branch = %head_branch, "Fetched PR via gh");
                return Ok(PrResolution {
                    local_branch_name: head_branch,
                    used_tier: PrTier::GhCli,
                });
            }
            Err(e) => {
                tracing::debug!(number, error = %e, "gh tier failed, falling back to refspec");
            }
        }
    }

    fetch_with_refspec(query, number, desired_branch)?;
    Ok(PrResolution {
        local_branch_name: desired_branch.to_string(),
        used_tier: PrTier::Refspec,
    })
}

fn fetch_with_metadata(
    query: &dyn RepositoryReferenceQuery,
    metadata: &dyn PrMetadata,
    number: u64,
) -> Result<String> {
    if !metadata.tool_available() {
        return Err(Error::ToolMissing {
            program: "gh".into(),
        });
    }

    let url = query.origin_url()?.ok_or_else(|| Error::PrMetadataUnavailable {
        reason: "origin remote has no URL".into(),
    })?;
    let slug = remote_slug_of(&url).ok_or_else(|| Error::PrMetadataUnavailable {
        reason: format!("unsupported remote URL: {url}"),
    })?;

    let head_branch = metadata.query_head_branch(&slug, number)?;
    let head_branch = head_branch.trim();
    if head_branch.is_empty() {
        return Err(Error::PrMetadataUnavailable {
            reason: format!("PR #{number} metadata has no head branch"),
        });
    }

    query.fetch_refspec(&format!("pull/{number}/head:{head_branch}"))?;
    Ok(head_branch.to_string())
}

fn fetch_with_refspec(
    query: &dyn RepositoryReferenceQuery,
    number: u64,
    branch: &str,
) -> Result<()> {
    let primary = format!("pull/{number}/head:{branch}");
    match query.fetch_refspec(&primary) {
        Ok(()) => return Ok(()),
        Err(e) => tracing::debug!(refspec = %primary, error = %e, "Primary refspec failed"),
    }

    let alternate = format!("+refs/pull/{number}/head:refs/heads/{branch}");
    query.fetch_refspec(&alternate).map_err(|e| Error::PrFetchFailed {
        number,
        output: diagnostic_output(e),
    })
}

fn diagnostic_output(error: Error) -> String {
    match error {
        Error::GitCommand { output, .. } => output,
        other => other.to_string(),
    }
}
