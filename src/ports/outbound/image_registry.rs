use crate::sbom_generation::domain::ImageReference;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// ImageRegistry port for pulling container images
///
/// This port abstracts the registry protocol. Implementations write the pulled
/// image as a docker-archive tarball that the archive extractor can read.
#[async_trait]
pub trait ImageRegistry: Send + Sync {
    /// Pulls an image and writes it as a docker-archive tarball
    ///
    /// # Arguments
    /// * `reference` - Image to pull, by tag or by digest
    /// * `archive_path` - Destination of the tarball
    ///
    /// # Errors
    /// Returns an error if:
    /// - The registry cannot be reached or rejects the request
    /// - A downloaded blob does not match its digest
    /// - The archive cannot be written
    async fn pull_image_to_archive(
        &self,
        reference: &ImageReference,
        archive_path: &Path,
    ) -> Result<()>;
}
