//! Classification of user-supplied references.
//!
//! A single token from the command line is one of:
//!
//! ```text
//! pr/42             -> PullRequest { number: 42, hint: "" }
//! pr/42/my-review   -> PullRequest { number: 42, hint: "my-review" }
//! origin/develop    -> LocalOrRemoteBranch { local: "develop", start: "origin/develop" }
//! feature/auth      -> LocalOrRemoteBranch { local: "feature/auth", start: "" }
//! v1.2.0, a1b2c3d   -> LocalOrRemoteBranch { local: <token>, start: "" }
//! ```
//!
//! `pr/` is a reserved prefix: a malformed PR token is an error and never
//! degrades to a branch name. Only the `origin` remote is decomposed;
//! `upstream/main` is kept whole as a local branch candidate.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, RepositoryReferenceQuery, Result};

const PR_PREFIX: &str = "pr/";
const ORIGIN_PREFIX: &str = "origin/";

static PR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^pr/([0-9]+)(?:/([^/]+))?$").expect("PR pattern is a valid regex")
});

/// Result of classifying a raw reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReference {
    /// A branch, tag or commit-ish.
    LocalOrRemoteBranch {
        /// Branch name to use or create locally.
        local_name: String,
        /// Remote-tracking reference to branch from when `local_name` does
        /// not exist yet. Empty when the token carried no remote prefix.
        start_point: String,
    },
    /// A `pr/<number>[/<name>]` token.
    PullRequest {
        /// Always greater than zero.
        number: u64,
        /// User-chosen directory/branch name, possibly empty.
        custom_directory_hint: String,
    },
}

impl ParsedReference {
    /// The reference a new branch should start from: the start point when
    /// present, the local name otherwise. `None` for pull requests.
    pub fn base_ref(&self) -> Option<&str> {
        match self {
            Self::LocalOrRemoteBranch {
                local_name,
                start_point,
            } => Some(if start_point.is_empty() {
                local_name
            } else {
                start_point
            }),
            Self::PullRequest { .. } => None,
        }
    }
}

/// Classify a raw reference. Pure string analysis, never touches the
/// repository.
pub fn classify(reference: &str) -> Result<ParsedReference> {
    if reference.is_empty() {
        return Err(Error::InvalidReference {
            reference: reference.to_string(),
        });
    }

    if reference.starts_with(PR_PREFIX) {
        return classify_pr(reference);
    }

    if let Some(branch) = reference.strip_prefix(ORIGIN_PREFIX)
        && !branch.is_empty()
    {
        return Ok(ParsedReference::LocalOrRemoteBranch {
            local_name: branch.to_string(),
            start_point: reference.to_string(),
        });
    }

    Ok(ParsedReference::LocalOrRemoteBranch {
        local_name: reference.to_string(),
        start_point: String::new(),
    })
}

fn classify_pr(reference: &str) -> Result<ParsedReference> {
    let invalid = || Error::InvalidPrSyntax {
        reference: reference.to_string(),
    };

    let captures = PR_PATTERN.captures(reference).ok_or_else(invalid)?;
    let number: u64 = captures[1].parse().map_err(|_| invalid())?;
    if number == 0 {
        return Err(invalid());
    }

    let custom_directory_hint = captures
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Ok(ParsedReference::PullRequest {
        number,
        custom_directory_hint,
    })
}

/// How the worktree-creation step should be invoked for a branch reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPlan {
    /// Branch to check out in the new worktree.
    pub branch: String,
    /// When set, `branch` is created from this reference.
    pub start_point: Option<String>,
}

impl BranchPlan {
    fn existing(branch: &str) -> Self {
        Self {
            branch: branch.to_string(),
            start_point: None,
        }
    }

    fn create(branch: &str, start_point: impl Into<String>) -> Self {
        Self {
            branch: branch.to_string(),
            start_point: Some(start_point.into()),
        }
    }
}

/// Decide which branch a worktree gets for a branch-kind reference.
///
/// `new_branch` is the optional, explicitly requested branch name from the
/// caller. Pull request references are rejected; they go through
/// [`crate::resolve_pr`] instead.
pub fn plan_branch(
    parsed: &ParsedReference,
    new_branch: Option<&str>,
    query: &dyn RepositoryReferenceQuery,
) -> Result<BranchPlan> {
    let ParsedReference::LocalOrRemoteBranch {
        local_name,
        start_point,
    } = parsed
    else {
        return Err(Error::InvalidReference {
            reference: format!("{parsed:?}"),
        });
    };
    let base = parsed.base_ref().unwrap_or(local_name);

    if let Some(new_branch) = new_branch.filter(|b| !b.is_empty()) {
        if query.local_branch_exists(new_branch)? || query.remote_branch_exists(new_branch)? {
            return Ok(BranchPlan::existing(new_branch));
        }
        return Ok(BranchPlan::create(new_branch, base));
    }

    if query.local_branch_exists(local_name)? {
        return Ok(BranchPlan::existing(local_name));
    }

    if !start_point.is_empty() {
        return Ok(BranchPlan::create(local_name, start_point.as_str()));
    }

    if query.remote_branch_exists(local_name)? {
        return Ok(BranchPlan::create(
            local_name,
            format!("{ORIGIN_PREFIX}{local_name}"),
        ));
    }

    // Tags and commit-ishes: let git resolve the start point.
    tracing::debug!(reference = %local_name, "No branch found, branching from reference");
    Ok(BranchPlan::create(local_name, local_name.as_str()))
}
