use crate::sbom_generation::domain::ClassifyResult;
use crate::shared::Result;
use std::path::{Path, PathBuf};

/// Type alias for a license scan result
///
/// Tuple of (recognized licenses, license candidate files that were not recognized)
pub type LicenseScan = (Vec<ClassifyResult>, Vec<PathBuf>);

/// LicenseClassifier port for detecting licenses in a directory tree
pub trait LicenseClassifier: Send + Sync {
    /// Scans a directory for license files and classifies them
    ///
    /// # Arguments
    /// * `dir` - Root of the tree to scan
    ///
    /// # Returns
    /// Recognized licenses, most relevant first, plus unrecognized candidates
    ///
    /// # Errors
    /// Returns an error if the directory cannot be walked
    fn read_licenses(&self, dir: &Path) -> Result<LicenseScan>;
}
