use crate::test_utilities::fixtures;
use async_trait::async_trait;
use spdx_bom::prelude::*;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Mock ImageRegistry that "pulls" a canned docker-archive for any reference
#[derive(Clone)]
pub struct MockImageRegistry {
    layers: Vec<Vec<(String, String)>>,
    pub pulled: Arc<Mutex<Vec<String>>>,
}

impl MockImageRegistry {
    /// Every pulled image gets these layers, each a list of (path, content)
    pub fn new(layers: Vec<Vec<(&str, &str)>>) -> Self {
        Self {
            layers: layers
                .into_iter()
                .map(|layer| {
                    layer
                        .into_iter()
                        .map(|(p, c)| (p.to_string(), c.to_string()))
                        .collect()
                })
                .collect(),
            pulled: Arc::default(),
        }
    }

    pub fn pulled(&self) -> Vec<String> {
        self.pulled.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageRegistry for MockImageRegistry {
    async fn pull_image_to_archive(
        &self,
        reference: &ImageReference,
        archive_path: &Path,
    ) -> Result<()> {
        self.pulled.lock().unwrap().push(reference.name());
        let layers: Vec<Vec<(&str, &str)>> = self
            .layers
            .iter()
            .map(|layer| layer.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect())
            .collect();
        fixtures::write_image_archive(archive_path, &reference.archive_tag(), &layers);
        Ok(())
    }
}
