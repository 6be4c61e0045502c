use crate::sbom_generation::domain::Package;
use crate::shared::Result;
use std::path::Path;

/// LayerAnalyzer port for enriching image layer packages
///
/// Implementations inspect a layer tarball and add what they find, such as
/// installed OS packages or distribution metadata, to the layer's package.
pub trait LayerAnalyzer: Send + Sync {
    /// Analyzes a layer and enriches its package in place
    ///
    /// # Arguments
    /// * `layer_path` - Path to the (possibly gzip-compressed) layer tarball
    /// * `package` - The package describing the layer
    fn analyze_layer(&self, layer_path: &Path, package: &mut Package) -> Result<()>;
}
