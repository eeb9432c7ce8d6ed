//! GitHub CLI (`gh`) integration.

use std::process::Command;

use serde::Deserialize;

use crate::{Error, Result, helpers, pr::PrMetadata, remote::RemoteSlug};

/// Title and description of a pull request, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PrSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct HeadRef {
    #[serde(rename = "headRefName", default)]
    head_ref_name: String,
}

/// [`PrMetadata`] backed by the `gh` executable on `PATH`.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new("gh")
    }
}

impl GhCli {
    /// Use `program` instead of `gh` (a path or a name resolved on `PATH`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn pr_view(&self, slug: &RemoteSlug, number: u64, fields: &str) -> Result<String> {
        if !self.tool_available() {
            return Err(Error::ToolMissing {
                program: self.program.clone(),
            });
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(["pr", "view", &number.to_string(), "--repo", &slug.to_string()])
            .args(["--json", fields]);

        helpers::run(&mut cmd).map_err(|e| Error::PrMetadataUnavailable {
            reason: e.to_string(),
        })
    }

    /// Best-effort title/body lookup, trimmed.
    pub fn pr_summary(&self, slug: &RemoteSlug, number: u64) -> Result<PrSummary> {
        let json = self.pr_view(slug, number, "title,body")?;
        let summary: PrSummary = parse_json(&json)?;
        Ok(PrSummary {
            title: summary.title.trim().to_string(),
            body: summary.body.trim().to_string(),
        })
    }
}

impl PrMetadata for GhCli {
    fn tool_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn query_head_branch(&self, slug: &RemoteSlug, number: u64) -> Result<String> {
        let json = self.pr_view(slug, number, "headRefName")?;
        let head: HeadRef = parse_json(&json)?;
        Ok(head.head_ref_name)
    }
}

fn parse_json<T: for<'de> Deserialize<'de>>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| Error::PrMetadataUnavailable {
        reason: format!("failed to parse PR info: {e}"),
    })
}
