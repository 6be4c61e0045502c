use crate::sbom_generation::domain::{Creator, Document};
use chrono::Utc;
use uuid::Uuid;

/// Tool name recorded as document creator
pub const TOOL_NAME: &str = "spdx-bom";

/// DocumentFactory service for creating new documents
///
/// Fills in the header: name, creator, and creation timestamp.
pub struct DocumentFactory;

impl DocumentFactory {
    /// Creates a new document stamped with the current time
    ///
    /// # Arguments
    /// * `name` - Document name, a `BOM-SPDX-<uuid>` name is generated when empty
    /// * `namespace` - Document namespace, kept as given
    /// * `creator_person` - Person recorded as creator, may be empty
    pub fn create(name: &str, namespace: &str, creator_person: &str) -> Document {
        let mut doc = Document::new();
        doc.name = if name.is_empty() {
            Self::generated_name()
        } else {
            name.to_string()
        };
        doc.namespace = namespace.to_string();
        doc.creator = Creator {
            person: creator_person.to_string(),
            tools: vec![Self::default_tool()],
        };
        doc.created = Utc::now();
        doc
    }

    /// Name used when none was provided
    pub fn generated_name() -> String {
        format!("BOM-SPDX-{}", Uuid::new_v4())
    }

    /// Tool identifier using the compile-time version from Cargo.toml
    pub fn default_tool() -> String {
        format!("{}-{}", TOOL_NAME, env!("CARGO_PKG_VERSION"))
    }
}
