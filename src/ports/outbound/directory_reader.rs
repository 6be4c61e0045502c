use crate::shared::Result;
use std::path::{Path, PathBuf};

/// Which files of a directory tree to leave out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// Extra gitignore-style patterns
    pub ignore_patterns: Vec<String>,
    /// Do not read the `.gitignore` file at the root of the tree
    pub skip_gitignore: bool,
}

/// DirectoryReader port for listing source trees
pub trait DirectoryReader: Send + Sync {
    /// Lists the regular files below a directory
    ///
    /// Symbolic links are skipped. Paths matching the filter are left out.
    ///
    /// # Returns
    /// Paths relative to `dir`, sorted
    ///
    /// # Errors
    /// Returns an error if the directory cannot be walked or a pattern is invalid
    fn directory_tree(&self, dir: &Path, filter: &DirectoryFilter) -> Result<Vec<PathBuf>>;
}
