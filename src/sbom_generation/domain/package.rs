use super::checksum::{digest_file, ChecksumAlgorithm, Checksums};
use super::entities::{EntityMap, SpdxElement};
use super::file::File;
use super::identifiers::package_id_from_name;
use crate::shared::Result;
use std::path::{Path, PathBuf};

/// Supplier or originator of a package. A person takes precedence over an organization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub person: String,
    pub organization: String,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.person.is_empty() && self.organization.is_empty()
    }

    /// Tag-value form, e.g. `Person: Jane Doe` or `Organization: Debian`
    pub fn to_spdx_value(&self) -> Option<String> {
        if !self.person.is_empty() {
            Some(format!("Person: {}", self.person))
        } else if !self.organization.is_empty() {
            Some(format!("Organization: {}", self.organization))
        } else {
            None
        }
    }
}

/// A package: an image, a layer, a source directory or a module dependency.
///
/// Packages own their files and sub-packages. Containment relationships are
/// derived from this tree when the document is rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub download_location: String,
    pub files_analyzed: bool,
    pub license_concluded: String,
    pub license_declared: String,
    pub license_info_from_files: String,
    pub license_comments: String,
    pub copyright_text: String,
    pub version: String,
    pub file_name: String,
    pub source_file: Option<PathBuf>,
    pub supplier: Contact,
    pub originator: Contact,
    pub checksum: Checksums,
    packages: EntityMap<Package>,
    files: EntityMap<File>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Derives the identifier from the name unless one is already set
    pub fn ensure_id(&mut self) -> Result<()> {
        if self.id.is_empty() {
            self.id = package_id_from_name(&self.name)?;
        }
        Ok(())
    }

    /// Attaches a sub-package, deriving its identifier if needed
    ///
    /// # Errors
    /// Returns an error if no identifier can be derived or it is already taken
    pub fn add_package(&mut self, mut package: Package) -> Result<()> {
        package.ensure_id()?;
        let container = format!("package {}", self.name);
        self.packages.insert(package, &container)
    }

    /// Attaches a file, deriving its identifier from this package's name if needed
    pub fn add_file(&mut self, mut file: File) -> Result<()> {
        file.ensure_id(&self.name)?;
        let container = format!("package {}", self.name);
        self.files.insert(file, &container)
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

    /// Reads the package's source file, setting checksums, source path and file name.
    ///
    /// `file_name` is `path` with the `work_dir` prefix removed.
    pub fn read_source_file(&mut self, path: &Path, work_dir: &Path) -> Result<()> {
        self.checksum = digest_file(path, ChecksumAlgorithm::PACKAGE_SOURCE)?;
        self.source_file = Some(path.to_path_buf());
        self.file_name = path
            .strip_prefix(work_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();
        Ok(())
    }
}

impl SpdxElement for Package {
    fn spdx_id(&self) -> &str {
        &self.id
    }
}
