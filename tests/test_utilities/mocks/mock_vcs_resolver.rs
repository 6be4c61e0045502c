use async_trait::async_trait;
use spdx_bom::ports::outbound::RepoRoot;
use spdx_bom::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Mock VcsResolver whose "clones" only contain a license file
///
/// Import paths without a configured license text fail to clone.
#[derive(Clone, Default)]
pub struct MockVcsResolver {
    licenses: HashMap<String, String>,
    pub checkouts: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockVcsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_license(mut self, import_path: &str, text: &str) -> Self {
        self.licenses
            .insert(import_path.to_string(), text.to_string());
        self
    }

    pub fn checkouts(&self) -> Vec<(String, String)> {
        let mut checkouts = self.checkouts.lock().unwrap().clone();
        checkouts.sort();
        checkouts
    }
}

#[async_trait]
impl VcsResolver for MockVcsResolver {
    async fn repo_root_for_import_path(&self, import_path: &str) -> Result<RepoRoot> {
        Ok(RepoRoot {
            vcs: "git".to_string(),
            repo: format!("https://{}", import_path),
            root: import_path.to_string(),
        })
    }

    async fn create_at_rev(&self, repo: &RepoRoot, dir: &Path, revision: &str) -> Result<()> {
        self.checkouts
            .lock()
            .unwrap()
            .push((repo.root.clone(), revision.to_string()));
        match self.licenses.get(&repo.root) {
            Some(text) => {
                std::fs::write(dir.join("LICENSE"), text)?;
                Ok(())
            }
            None => anyhow::bail!("repository {} not found", repo.repo),
        }
    }
}
