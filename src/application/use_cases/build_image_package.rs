use crate::ports::outbound::{ArchiveExtractor, LayerAnalyzer, ProgressReporter};
use crate::sbom_generation::domain::archive_manifest::MANIFEST_FILE;
use crate::sbom_generation::domain::Package;
use crate::shared::error::SbomError;
use crate::shared::Result;
use anyhow::Context;
use std::path::Path;

/// ImagePackageBuilder - Turns a docker-archive tarball into a package tree
///
/// The image becomes one package named after its first repository tag, with
/// one sub-package per layer in manifest order. Borrows its collaborators so
/// the document use case can lend its own.
pub struct ImagePackageBuilder<'a, AE, LA, PR> {
    archive_extractor: &'a AE,
    layer_analyzer: &'a LA,
    progress_reporter: &'a PR,
}

impl<'a, AE, LA, PR> ImagePackageBuilder<'a, AE, LA, PR>
where
    AE: ArchiveExtractor,
    LA: LayerAnalyzer,
    PR: ProgressReporter,
{
    pub fn new(
        archive_extractor: &'a AE,
        layer_analyzer: &'a LA,
        progress_reporter: &'a PR,
    ) -> Self {
        Self {
            archive_extractor,
            layer_analyzer,
            progress_reporter,
        }
    }

    /// Builds the package tree of an image tarball
    ///
    /// # Arguments
    /// * `tar_path` - docker-archive tarball
    /// * `analyze_layers` - Run the layer analyzer on every layer
    ///
    /// # Errors
    /// Returns an error if the archive cannot be extracted, its manifest has no
    /// repository tag, or any layer fails to package or analyze
    pub fn package_from_image_tarball(
        &self,
        tar_path: &Path,
        analyze_layers: bool,
    ) -> Result<Package> {
        self.progress_reporter
            .report(&format!("📦 Extracting image archive: {}", tar_path.display()));

        // The extraction directory is removed when this guard drops
        let extract_dir = self.archive_extractor.extract_tarball_tmp(tar_path)?;
        let manifest = self
            .archive_extractor
            .read_archive_manifest(&extract_dir.path().join(MANIFEST_FILE))?;

        let tag = manifest.primary_tag().ok_or_else(|| SbomError::Extraction {
            path: tar_path.to_path_buf(),
            details: "archive manifest has no repository tag".to_string(),
        })?;
        let mut image = Package::new(tag);

        let total = manifest.layer_files.len();
        for (idx, layer_file) in manifest.layer_files.iter().enumerate() {
            let mut layer = self
                .archive_extractor
                .package_from_layer_tarball(layer_file, extract_dir.path())?;

            if analyze_layers {
                self.layer_analyzer
                    .analyze_layer(&extract_dir.path().join(layer_file), &mut layer)
                    .with_context(|| format!("analyzing layer {}", layer_file))?;
            }

            image.add_package(layer)?;
            self.progress_reporter
                .report_progress(idx + 1, total, Some(layer_file));
        }

        self.progress_reporter
            .report(&format!("✅ Image {} has {} layer(s)", tag, total));

        Ok(image)
    }
}
