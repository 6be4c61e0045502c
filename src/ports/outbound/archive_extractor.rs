use crate::sbom_generation::domain::{ArchiveManifest, Package};
use crate::shared::Result;
use std::path::Path;
use tempfile::TempDir;

/// ArchiveExtractor port for unpacking docker-archive tarballs
///
/// This port abstracts the archive handling needed to turn an image tarball
/// into a package tree: extraction, manifest parsing and layer packaging.
pub trait ArchiveExtractor: Send + Sync {
    /// Extracts a tarball into a fresh temporary directory
    ///
    /// Directory entries and overlay whiteout entries are skipped. Symbolic
    /// and hard links are written as copies of the file they point to.
    ///
    /// # Arguments
    /// * `tar_path` - Path to the tar archive
    ///
    /// # Returns
    /// A guard owning the temporary directory. The directory and its contents
    /// are removed when the guard is dropped.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The archive cannot be opened
    /// - Reading an entry fails mid-stream
    /// - An entry would be written outside the temporary directory
    /// - A link points outside the archive
    fn extract_tarball_tmp(&self, tar_path: &Path) -> Result<TempDir>;

    /// Reads the first entry of a docker-archive `manifest.json`
    ///
    /// # Errors
    /// Returns an error if the file is missing, is not valid JSON, or holds no entries
    fn read_archive_manifest(&self, manifest_path: &Path) -> Result<ArchiveManifest>;

    /// Builds the package describing one image layer
    ///
    /// # Arguments
    /// * `layer_file` - Layer path as listed in the manifest
    /// * `extract_dir` - Directory the image archive was extracted to
    ///
    /// # Returns
    /// A package whose checksums cover the layer content and whose name is
    /// the hex SHA1 of the `layer_file` path string
    fn package_from_layer_tarball(&self, layer_file: &str, extract_dir: &Path) -> Result<Package>;
}
