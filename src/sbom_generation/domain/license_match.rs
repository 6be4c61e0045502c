use std::path::PathBuf;

/// A license file recognized by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyResult {
    /// Path of the file that was classified
    pub file: PathBuf,
    /// SPDX identifier of the recognized license
    pub license_id: String,
}

impl ClassifyResult {
    pub fn new(file: impl Into<PathBuf>, license_id: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            license_id: license_id.into(),
        }
    }
}
