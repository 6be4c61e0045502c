use crate::sbom_generation::domain::Document;
use crate::shared::Result;

/// SbomFormatter port for rendering documents
///
/// This port abstracts the output format of a finished document.
pub trait SbomFormatter {
    /// Renders a document
    ///
    /// # Arguments
    /// * `document` - The document to render, it is not modified
    ///
    /// # Returns
    /// The rendered document
    ///
    /// # Errors
    /// Returns an error if a derived value, such as a package verification
    /// code, cannot be computed
    fn format(&self, document: &Document) -> Result<String>;
}
