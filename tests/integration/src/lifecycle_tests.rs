//! Workspace lifecycle tests across wtm-fs, wtm-git and wtm-core
//!
//! Every test clones the sandbox upstream, which carries `main`,
//! `feature/auth`, `feature/login` and `refs/pull/42/head`.

use pretty_assertions::assert_eq;
use wtm_core::{AddTarget, InitRequest, Workspace};
use wtm_git::{
    BareRepo, BranchPlan, Error as GitError, PrMetadata, PrResolution, PrTier, RemoteSlug,
    RepositoryReferenceQuery, resolve_pr,
};
use wtm_test_utils::Sandbox;
use wtm_test_utils::git::{commit_on_branch, git, ref_target};
use wtm_test_utils::sandbox::{FEATURE_BRANCH, PR_NUMBER};

fn init(sandbox: &Sandbox) -> Workspace {
    let request = InitRequest {
        repo: sandbox.upstream_url(),
        directory: Some("project".to_string()),
        new: false,
    };
    Workspace::init(sandbox.root(), &request).unwrap()
}

/// The workspace's bare repository, presenting a GitHub origin so the gh
/// tier can derive a slug while fetches still hit the local upstream.
struct GithubOrigin<'a>(&'a BareRepo);

impl RepositoryReferenceQuery for GithubOrigin<'_> {
    fn local_branch_exists(&self, name: &str) -> wtm_git::Result<bool> {
        self.0.local_branch_exists(name)
    }

    fn remote_branch_exists(&self, name: &str) -> wtm_git::Result<bool> {
        self.0.remote_branch_exists(name)
    }

    fn fetch_refspec(&self, refspec: &str) -> wtm_git::Result<()> {
        self.0.fetch_refspec(refspec)
    }

    fn origin_url(&self) -> wtm_git::Result<Option<String>> {
        Ok(Some("git@github.com:octo/widgets.git".to_string()))
    }
}

/// gh stand-in with a fixed answer.
struct StubGh(Option<&'static str>);

impl PrMetadata for StubGh {
    fn tool_available(&self) -> bool {
        true
    }

    fn query_head_branch(&self, slug: &RemoteSlug, number: u64) -> wtm_git::Result<String> {
        assert_eq!(slug.to_string(), "octo/widgets");
        assert_eq!(number, PR_NUMBER);
        self.0
            .map(String::from)
            .ok_or_else(|| GitError::PrMetadataUnavailable {
                reason: "HTTP 502".into(),
            })
    }
}

#[test]
fn test_local_branch_reference() {
    let sandbox = Sandbox::new();
    let ws = init(&sandbox);

    let plan = ws.plan_add(FEATURE_BRANCH, None, None).unwrap();

    assert_eq!(
        plan.target,
        AddTarget::Branch(BranchPlan {
            branch: FEATURE_BRANCH.to_string(),
            start_point: None,
        })
    );
}

#[test]
fn test_remote_branch_reference_creates_tracking_branch() {
    let sandbox = Sandbox::new();
    let ws = init(&sandbox);
    commit_on_branch(&sandbox.upstream(), "develop", "dev.txt", "dev\n");
    git(&ws.layout().bare_dir().to_native(), &["fetch", "--quiet", "origin"]);

    let plan = ws.plan_add("origin/develop", None, None).unwrap();
    assert_eq!(plan.directory, "develop");
    assert_eq!(
        plan.target,
        AddTarget::Branch(BranchPlan {
            branch: "develop".to_string(),
            start_point: Some("origin/develop".to_string()),
        })
    );

    let checkout = ws.checkout(&plan, None).unwrap();

    assert_eq!(checkout.branch, "develop");
    sandbox.assert_file_contains("project/develop/dev.txt", "dev");
    let current = git(&sandbox.path("project/develop"), &["branch", "--show-current"]);
    assert_eq!(current, "develop");
}

#[test]
fn test_pull_request_with_directory_hint() {
    let sandbox = Sandbox::new();
    let ws = init(&sandbox);

    let plan = ws.plan_add("pr/42/my-review", None, None).unwrap();

    assert_eq!(plan.directory, "my-review");
    assert_eq!(
        plan.target,
        AddTarget::PullRequest {
            number: PR_NUMBER,
            desired_branch: "my-review".to_string(),
        }
    );
}

#[test]
fn test_pull_request_without_gh_uses_refspec() {
    let sandbox = Sandbox::new();
    let ws = init(&sandbox);

    let resolution = resolve_pr(ws.repo(), None, PR_NUMBER, "pr-42").unwrap();

    assert_eq!(
        resolution,
        PrResolution {
            local_branch_name: "pr-42".to_string(),
            used_tier: PrTier::Refspec,
        }
    );
    let bare = ws.layout().bare_dir().to_native();
    assert_eq!(ref_target(&bare, "refs/heads/pr-42"), Some(sandbox.pr_commit.clone()));
}

#[test]
fn test_pull_request_with_gh_uses_head_branch() {
    let sandbox = Sandbox::new();
    let ws = init(&sandbox);
    let query = GithubOrigin(ws.repo());

    let resolution = resolve_pr(
        &query,
        Some(&StubGh(Some("feature/contributor-fix"))),
        PR_NUMBER,
        "pr-42",
    )
    .unwrap();

    assert_eq!(
        resolution,
        PrResolution {
            local_branch_name: "feature/contributor-fix".to_string(),
            used_tier: PrTier::GhCli,
        }
    );
    let bare = ws.layout().bare_dir().to_native();
    assert_eq!(
        ref_target(&bare, "refs/heads/feature/contributor-fix"),
        Some(sandbox.pr_commit.clone())
    );
    assert!(!ws.repo().local_branch_exists("pr-42").unwrap());

    let path = ws.layout().worktree_path("contributor");
    ws.repo()
        .add_worktree("feature/contributor-fix", &path, None)
        .unwrap();
    sandbox.assert_exists("project/contributor/login.txt");
}

#[test]
fn test_pull_request_gh_failure_falls_back_to_refspec() {
    let sandbox = Sandbox::new();
    let ws = init(&sandbox);
    let query = GithubOrigin(ws.repo());

    let resolution = resolve_pr(&query, Some(&StubGh(None)), PR_NUMBER, "pr-42").unwrap();

    assert_eq!(resolution.used_tier, PrTier::Refspec);
    assert_eq!(resolution.local_branch_name, "pr-42");
}

#[test]
fn test_unknown_pull_request_reports_fetch_failure() {
    let sandbox = Sandbox::new();
    let ws = init(&sandbox);

    let err = resolve_pr(ws.repo(), None, 999, "pr-999").unwrap_err();

    assert!(matches!(err, GitError::PrFetchFailed { number: 999, .. }));
    assert!(!ws.repo().local_branch_exists("pr-999").unwrap());
}

#[test]
fn test_full_lifecycle() {
    let sandbox = Sandbox::new();
    let ws = init(&sandbox);
    sandbox.write("project/.worktree/files/NOTES.md.tmpl", "# {{ branch | upper }}\n");

    let main = ws.checkout_default_branch().unwrap();
    let aftermath = ws.populate(&main, true);
    assert_eq!(aftermath.files_written, 1);
    sandbox.assert_file_contains("project/main/NOTES.md", "# MAIN");

    let plan = ws.plan_add("pr/42", None, None).unwrap();
    let pr = ws.checkout(&plan, None).unwrap();
    ws.populate(&pr, true);
    sandbox.assert_file_contains("project/pr-42/NOTES.md", "# PR-42");

    let worktrees = ws.repo().list_worktrees().unwrap();
    let branches: Vec<_> = worktrees
        .iter()
        .filter(|w| !w.is_bare)
        .filter_map(|w| w.branch.clone())
        .collect();
    assert_eq!(branches, vec!["main".to_string(), "pr-42".to_string()]);
    assert!(worktrees.iter().any(|w| w.is_bare));

    // NOTES.md is untracked, so removal has to be forced.
    let remove = ws.plan_remove("pr-42", true, sandbox.root()).unwrap();
    let aftermath = ws.remove(&remove, true, true, true).unwrap();
    assert!(aftermath.branch_deleted);
    sandbox.assert_not_exists("project/pr-42");

    let remaining = ws.repo().list_worktrees().unwrap();
    assert_eq!(remaining.iter().filter(|w| !w.is_bare).count(), 1);
    assert!(!ws.repo().local_branch_exists("pr-42").unwrap());
}
