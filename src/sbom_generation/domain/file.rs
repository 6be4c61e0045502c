use super::checksum::{digest_file, ChecksumAlgorithm, Checksums};
use super::entities::SpdxElement;
use super::identifiers::file_id_for;
use crate::shared::Result;
use std::path::{Component, Path, PathBuf};

/// A single file described in the document, either on its own or inside a package
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File {
    pub id: String,
    pub name: String,
    pub license_concluded: String,
    pub license_info_in_file: String,
    pub copyright_text: String,
    pub source_file: Option<PathBuf>,
    pub checksum: Checksums,
}

impl File {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reads a file from disk, setting its checksums, source path and name.
    ///
    /// The name is `path` relative to `work_dir` when given and the path is
    /// below it, otherwise the path as written. Names never start at the
    /// filesystem root.
    pub fn read_source_file(&mut self, path: &Path, work_dir: Option<&Path>) -> Result<()> {
        self.checksum = digest_file(path, ChecksumAlgorithm::FILE)?;
        self.source_file = Some(path.to_path_buf());

        let relative = work_dir
            .and_then(|dir| path.strip_prefix(dir).ok())
            .unwrap_or(path);
        let name: PathBuf = relative
            .components()
            .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
            .collect();
        self.name = name.to_string_lossy().into_owned();
        Ok(())
    }

    /// Builds a file from a path on disk
    pub fn from_path(path: &Path, work_dir: Option<&Path>) -> Result<Self> {
        let mut file = File::default();
        file.read_source_file(path, work_dir)?;
        Ok(file)
    }

    /// Sets the identifier from the containing element's name unless one is present
    pub fn ensure_id(&mut self, container_name: &str) -> Result<()> {
        if self.id.is_empty() {
            self.id = file_id_for(container_name, &self.name)?;
        }
        Ok(())
    }

    pub fn sha1(&self) -> Option<&str> {
        self.checksum.get(ChecksumAlgorithm::Sha1.as_str()).map(String::as_str)
    }
}

impl SpdxElement for File {
    fn spdx_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_source_file_trims_work_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        let path = dir.path().join("docs/README.md");
        fs::write(&path, "Hellow World").unwrap();

        let file = File::from_path(&path, Some(dir.path())).unwrap();
        assert_eq!(file.name, "docs/README.md");
        assert_eq!(file.sha1(), Some("5f341d31f6b6a8b15bc4e6704830bf37f99511d1"));
        assert_eq!(file.checksum.len(), 3);
        assert_eq!(file.source_file.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_read_source_file_strips_filesystem_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "a").unwrap();

        let file = File::from_path(&path, None).unwrap();
        assert!(!file.name.starts_with('/'));
        assert!(path.to_string_lossy().ends_with(&file.name));
        assert!(file.name.ends_with("a.txt"));

        let outside = File::from_path(&path, Some(Path::new("/nonexistent/work"))).unwrap();
        assert_eq!(outside.name, file.name);
    }

    #[test]
    fn test_read_source_file_keeps_relative_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let relative = dir.path().strip_prefix("/").unwrap().join("a.txt");
        let root_relative = Path::new("/").join(&relative);

        let file = File::from_path(&root_relative, Some(Path::new("/"))).unwrap();
        assert_eq!(file.name, relative.to_string_lossy());
    }

    #[test]
    fn test_ensure_id_keeps_existing() {
        let mut file = File::new("a.txt");
        file.id = "SPDXRef-File-custom".to_string();
        file.ensure_id("doc").unwrap();
        assert_eq!(file.id, "SPDXRef-File-custom");

        let mut other = File::new("a.txt");
        other.ensure_id("doc").unwrap();
        assert!(other.id.starts_with("SPDXRef-File-"));
    }
}
