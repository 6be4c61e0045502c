use crate::sbom_generation::domain::Document;
use crate::shared::Result;
use std::path::Path;

/// DocumentReader port for loading existing SPDX documents
///
/// This port abstracts reading a serialized document back into the owned
/// package and file tree.
pub trait DocumentReader {
    /// Reads and parses a document
    ///
    /// # Arguments
    /// * `path` - Path to the serialized document
    ///
    /// # Returns
    /// The document with its packages and files nested as its relationships describe
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read or is not a regular file
    /// - A line is not a `Tag: value` pair or a `<text>` block is left open
    /// - Two elements share an identifier
    fn read_document(&self, path: &Path) -> Result<Document>;
}
