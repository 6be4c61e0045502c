use super::entities::EntityMap;
use super::file::File;
use super::identifiers::DOCUMENT_ID;
use super::package::Package;
use crate::shared::Result;
use chrono::{DateTime, Utc};

pub const SPDX_VERSION: &str = "SPDX-2.2";
pub const DATA_LICENSE: &str = "CC0-1.0";

/// Who produced the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Creator {
    pub person: String,
    pub tools: Vec<String>,
}

/// Top-level SBOM: header fields plus described packages and independent files
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub version: String,
    pub data_license: String,
    pub name: String,
    pub namespace: String,
    pub creator: Creator,
    pub created: DateTime<Utc>,
    packages: EntityMap<Package>,
    files: EntityMap<File>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            id: DOCUMENT_ID.to_string(),
            version: SPDX_VERSION.to_string(),
            data_license: DATA_LICENSE.to_string(),
            name: String::new(),
            namespace: String::new(),
            creator: Creator::default(),
            created: Utc::now(),
            packages: EntityMap::new(),
            files: EntityMap::new(),
        }
    }

    /// Adds a top-level package, deriving its identifier if needed
    pub fn add_package(&mut self, mut package: Package) -> Result<()> {
        package.ensure_id()?;
        self.packages.insert(package, &format!("document {}", self.name))
    }

    /// Adds a file that belongs to no package.
    ///
    /// Its identifier is derived from the document name, so the name must be set first.
    pub fn add_file(&mut self, mut file: File) -> Result<()> {
        file.ensure_id(&self.name)?;
        self.files.insert(file, &format!("document {}", self.name))
    }

    pub fn packages(&self) -> &EntityMap<Package> {
        &self.packages
    }

    pub fn packages_mut(&mut self) -> &mut EntityMap<Package> {
        &mut self.packages
    }

    pub fn files(&self) -> &EntityMap<File> {
        &self.files
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
