//! Branch name to worktree directory name mapping

/// Directory name for a branch worktree.
///
/// `/` and `_` become `-`, anything else outside `[A-Za-z0-9-]` is dropped,
/// runs of dashes collapse to one and leading/trailing dashes are trimmed.
/// Case is preserved: `feat/User_Auth` -> `feat-User-Auth`.
pub fn worktree_directory(branch: &str) -> String {
    let mut result = String::with_capacity(branch.len());

    for c in branch.chars() {
        let mapped = match c {
            '/' | '_' | '-' => '-',
            c if c.is_ascii_alphanumeric() => c,
            _ => continue,
        };
        if mapped == '-' && (result.is_empty() || result.ends_with('-')) {
            continue;
        }
        result.push(mapped);
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Directory name for a pull request worktree: the hint, or `pr-<number>`.
pub fn pr_directory(number: u64, hint: &str) -> String {
    if hint.is_empty() {
        format!("pr-{number}")
    } else {
        hint.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worktree_directory_basic() {
        assert_eq!(worktree_directory("feature/auth"), "feature-auth");
        assert_eq!(worktree_directory("main"), "main");
    }

    #[test]
    fn test_worktree_directory_preserves_case() {
        assert_eq!(worktree_directory("feat/User_Auth"), "feat-User-Auth");
    }

    #[test]
    fn test_worktree_directory_drops_unsafe() {
        assert_eq!(worktree_directory("fix: crash!"), "fixcrash");
        assert_eq!(worktree_directory("v1.2.0"), "v120");
    }

    #[test]
    fn test_worktree_directory_collapses_and_trims() {
        assert_eq!(worktree_directory("//a__b--c//"), "a-b-c");
        assert_eq!(worktree_directory("---"), "");
    }

    #[test]
    fn test_pr_directory() {
        assert_eq!(pr_directory(42, ""), "pr-42");
        assert_eq!(pr_directory(42, "review"), "review");
    }
}
