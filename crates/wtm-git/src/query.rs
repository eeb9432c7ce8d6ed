//! Reference queries the classifier and PR resolver rely on.

use crate::Result;

/// Minimal view of a repository's refs.
///
/// Implemented by [`crate::BareRepo`]; tests substitute in-memory fakes.
pub trait RepositoryReferenceQuery {
    /// Does `refs/heads/<name>` exist?
    fn local_branch_exists(&self, name: &str) -> Result<bool>;

    /// Does `refs/remotes/origin/<name>` exist?
    fn remote_branch_exists(&self, name: &str) -> Result<bool>;

    /// Fetch `refspec` from `origin`, creating or updating the named local
    /// ref as a side effect.
    ///
    /// On failure the error carries the remote's diagnostic output.
    fn fetch_refspec(&self, refspec: &str) -> Result<()>;

    /// URL configured for `origin`, if any.
    fn origin_url(&self) -> Result<Option<String>>;
}
