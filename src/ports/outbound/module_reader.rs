use crate::shared::Result;
use std::path::Path;

/// ModuleReader port for reading Go module manifests
pub trait ModuleReader: Send + Sync {
    /// Reads the go.mod file of a module directory
    ///
    /// # Errors
    /// Returns an error if the go.mod file does not exist or cannot be read
    fn read_module_manifest(&self, module_dir: &Path) -> Result<String>;
}
