use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// Repository hosting an import path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRoot {
    /// Version control system, e.g. `git`
    pub vcs: String,
    /// Clone URL
    pub repo: String,
    /// Import path prefix served by the repository
    pub root: String,
}

/// VcsResolver port for locating and fetching module sources
///
/// This port abstracts import path discovery and repository checkout so the
/// module scanner can be tested without network access.
#[async_trait]
pub trait VcsResolver: Send + Sync {
    /// Resolves the repository that serves an import path
    ///
    /// # Errors
    /// Returns an error if discovery fails or the VCS is not supported
    async fn repo_root_for_import_path(&self, import_path: &str) -> Result<RepoRoot>;

    /// Checks out a repository at a revision into an empty directory
    ///
    /// # Arguments
    /// * `repo` - Repository to fetch
    /// * `dir` - Target directory, must exist and be empty
    /// * `revision` - Tag, branch or commit to check out
    async fn create_at_rev(&self, repo: &RepoRoot, dir: &Path, revision: &str) -> Result<()>;
}
