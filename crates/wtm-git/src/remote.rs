//! Remote URL parsing.

use std::fmt;

/// Owner and repository name of a GitHub remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSlug {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RemoteSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

const URL_PREFIXES: &[&str] = &[
    "git@github.com:",
    "https://github.com/",
    "http://github.com/",
];

/// Parse a GitHub remote URL into its owner/name slug.
///
/// Accepted shapes:
/// - `git@github.com:<owner>/<repo>[.git]`
/// - `https://github.com/<owner>/<repo>[.git]`
/// - `http://github.com/<owner>/<repo>[.git]`
pub fn remote_slug_of(url: &str) -> Option<RemoteSlug> {
    let url = url.trim();
    let path = URL_PREFIXES
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))?;
    let path = path.strip_suffix(".git").unwrap_or(path);

    let (owner, name) = path.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }

    Some(RemoteSlug {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// Expand GitHub shorthand into a clonable URL.
///
/// `owner/repo` and `owner/repo.git` become `git@github.com:owner/repo.git`;
/// anything that already looks like a URL (`http://`, `https://`, `git@`)
/// or a local path is returned unchanged.
pub fn github_clone_url(repo: &str) -> String {
    if repo.starts_with("http://") || repo.starts_with("https://") || repo.starts_with("git@") {
        return repo.to_string();
    }

    let is_shorthand = repo.matches('/').count() == 1
        && !repo.contains(':')
        && !repo.starts_with('/')
        && !repo.starts_with('.');
    if is_shorthand {
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        return format!("git@github.com:{repo}.git");
    }

    repo.to_string()
}
