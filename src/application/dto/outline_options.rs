/// OutlineOptions - Request DTO for drawing a document outline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutlineOptions {
    /// Levels drawn below the document, every level when unset
    pub depth: Option<usize>,
    /// Label nodes with SPDX identifiers instead of names
    pub spdx_ids: bool,
}
