use crate::ports::outbound::{RepoRoot, VcsResolver};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;

/// CachingVcsResolver wraps a VcsResolver and caches repository roots.
///
/// Module scans resolve every import path twice, once for the download and
/// once for the package's download location. The cache is thread-safe and
/// shared by the concurrent downloads. Checkouts are never cached.
pub struct CachingVcsResolver<R: VcsResolver> {
    inner: R,
    cache: Arc<DashMap<String, RepoRoot>>,
}

impl<R: VcsResolver> CachingVcsResolver<R> {
    /// Creates a new caching resolver wrapping the given inner resolver
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: VcsResolver> VcsResolver for CachingVcsResolver<R> {
    async fn repo_root_for_import_path(&self, import_path: &str) -> Result<RepoRoot> {
        if let Some(cached) = self.cache.get(import_path) {
            return Ok(cached.clone());
        }

        // Failures are not cached, a later lookup may succeed
        let root = self.inner.repo_root_for_import_path(import_path).await?;
        self.cache.insert(import_path.to_string(), root.clone());

        Ok(root)
    }

    async fn create_at_rev(&self, repo: &RepoRoot, dir: &Path, revision: &str) -> Result<()> {
        self.inner.create_at_rev(repo, dir, revision).await
    }
}
