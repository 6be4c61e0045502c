use crate::adapters::outbound::formatters::OutlineFormatter;
use crate::application::dto::OutlineOptions;
use crate::ports::outbound::{DocumentReader, SbomFormatter};
use crate::shared::Result;
use anyhow::Context;
use std::path::Path;

/// OutlineDocumentUseCase - Draws the structure of an existing document
///
/// # Type Parameters
/// * `DR` - DocumentReader implementation
pub struct OutlineDocumentUseCase<DR> {
    document_reader: DR,
}

impl<DR: DocumentReader> OutlineDocumentUseCase<DR> {
    pub fn new(document_reader: DR) -> Self {
        Self { document_reader }
    }

    /// Reads the document at `path` and draws its package and file tree
    ///
    /// # Errors
    /// Returns an error if the document cannot be read or parsed
    pub fn execute(&self, path: &Path, options: OutlineOptions) -> Result<String> {
        let document = self
            .document_reader
            .read_document(path)
            .with_context(|| format!("opening document {}", path.display()))?;

        OutlineFormatter::new(options)
            .format(&document)
            .context("generating document outline")
    }
}
