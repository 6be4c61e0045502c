use crate::sbom_generation::domain::Package;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// Default number of dependencies processed at once
pub const DEFAULT_SCAN_WORKERS: usize = 8;

/// Options for scanning a module's dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleScanOptions {
    /// Leave out dependencies marked `// indirect`
    pub only_direct_deps: bool,
    /// Download each dependency and classify its license
    pub scan_licenses: bool,
    /// Download again even if a local copy exists
    pub force_download: bool,
    /// Upper bound of concurrent downloads
    pub workers: usize,
}

impl Default for ModuleScanOptions {
    fn default() -> Self {
        Self {
            only_direct_deps: false,
            scan_licenses: true,
            force_download: false,
            workers: DEFAULT_SCAN_WORKERS,
        }
    }
}

/// DependencyScanner port for turning a source tree's dependencies into packages
#[async_trait]
pub trait DependencyScanner: Send + Sync {
    /// Whether `dir` holds a module this scanner understands
    fn detects(&self, dir: &Path) -> bool;

    /// Lists the module's dependencies as packages
    ///
    /// Failures for a single dependency are reported and skipped; only failures
    /// reading the module itself are returned as errors.
    async fn scan_dependencies(
        &self,
        module_dir: &Path,
        options: &ModuleScanOptions,
    ) -> Result<Vec<Package>>;
}
