use crate::ports::outbound::{DirectoryFilter, DirectoryReader, ModuleReader};
use crate::shared::error::SbomError;
use crate::shared::security::{validate_file_size, validate_regular_file, MAX_MANIFEST_SIZE};
use crate::shared::Result;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const GO_MOD: &str = "go.mod";
const GITIGNORE: &str = ".gitignore";
const GIT_DIR_PATTERN: &str = ".git/";

/// FileSystemReader adapter for reading module manifests and source trees
///
/// Implements both the ModuleReader and DirectoryReader ports.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    /// Safely read a text file: no symlinks, regular files only, bounded size
    fn safe_read_file(&self, path: &Path, file_type: &str) -> Result<String> {
        validate_regular_file(path, file_type)?;

        let metadata = fs::metadata(path)?;
        validate_file_size(metadata.len(), path, MAX_MANIFEST_SIZE)?;

        fs::read_to_string(path).map_err(|e| {
            SbomError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }

    /// Builds the ignore matcher for a tree, or `None` when nothing is ignored
    fn build_matcher(dir: &Path, filter: &DirectoryFilter) -> Result<Option<Gitignore>> {
        let mut builder = GitignoreBuilder::new(dir);
        let mut has_patterns = false;

        if !filter.skip_gitignore {
            let gitignore_file = dir.join(GITIGNORE);
            if gitignore_file.is_file() {
                if let Some(e) = builder.add(&gitignore_file) {
                    return Err(SbomError::validation(format!(
                        "invalid {}: {}",
                        gitignore_file.display(),
                        e
                    ))
                    .into());
                }
            }
            builder
                .add_line(None, GIT_DIR_PATTERN)
                .map_err(|e| SbomError::validation(e.to_string()))?;
            has_patterns = true;
        }

        for pattern in &filter.ignore_patterns {
            builder.add_line(None, pattern).map_err(|e| {
                SbomError::validation(format!("invalid ignore pattern '{}': {}", pattern, e))
            })?;
            has_patterns = true;
        }

        if !has_patterns {
            return Ok(None);
        }
        let matcher = builder
            .build()
            .map_err(|e| SbomError::validation(format!("building ignore rules: {}", e)))?;
        Ok(Some(matcher))
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleReader for FileSystemReader {
    fn read_module_manifest(&self, module_dir: &Path) -> Result<String> {
        let go_mod = module_dir.join(GO_MOD);

        if !go_mod.exists() {
            return Err(SbomError::FileReadError {
                path: go_mod,
                details: format!(
                    "{} does not exist in module directory \"{}\"",
                    GO_MOD,
                    module_dir.display()
                ),
            }
            .into());
        }

        self.safe_read_file(&go_mod, GO_MOD)
    }
}

impl DirectoryReader for FileSystemReader {
    fn directory_tree(&self, dir: &Path, filter: &DirectoryFilter) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(SbomError::FileReadError {
                path: dir.to_path_buf(),
                details: "not a directory".to_string(),
            }
            .into());
        }

        let matcher = Self::build_matcher(dir, filter)?;
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).follow_links(false) {
            let entry = entry.map_err(|e| SbomError::FileReadError {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                details: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = match entry.path().strip_prefix(dir) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => continue,
            };
            if let Some(matcher) = &matcher {
                if matcher
                    .matched_path_or_any_parents(&relative, false)
                    .is_ignore()
                {
                    continue;
                }
            }
            files.push(relative);
        }

        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, file.as_bytes()).unwrap();
        }
        dir
    }

    #[test]
    fn test_read_module_manifest_success() {
        let dir = tree(&["go.mod"]);
        let content = FileSystemReader::new()
            .read_module_manifest(dir.path())
            .unwrap();
        assert_eq!(content, "go.mod");
    }

    #[test]
    fn test_read_module_manifest_not_found() {
        let dir = TempDir::new().unwrap();
        let err = FileSystemReader::new()
            .read_module_manifest(dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("go.mod does not exist"));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_module_manifest_rejects_symlink() {
        let dir = tree(&["real/go.mod"]);
        std::os::unix::fs::symlink(dir.path().join("real/go.mod"), dir.path().join("go.mod"))
            .unwrap();

        let err = FileSystemReader::new()
            .read_module_manifest(dir.path())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SbomError>(),
            Some(SbomError::SecurityError { .. })
        ));
    }

    #[test]
    fn test_directory_tree_is_sorted_and_relative() {
        let dir = tree(&["src/main.go", "README.md", "go.mod"]);
        let files = FileSystemReader::new()
            .directory_tree(dir.path(), &DirectoryFilter::default())
            .unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("README.md"),
                PathBuf::from("go.mod"),
                PathBuf::from("src/main.go"),
            ]
        );
    }

    #[test]
    fn test_directory_tree_honors_gitignore() {
        let dir = tree(&["main.go", "build/out.bin", "debug.log", ".git/HEAD"]);
        fs::write(dir.path().join(".gitignore"), "build/\n*.log\n").unwrap();

        let files = FileSystemReader::new()
            .directory_tree(dir.path(), &DirectoryFilter::default())
            .unwrap();

        assert_eq!(
            files,
            vec![PathBuf::from(".gitignore"), PathBuf::from("main.go")]
        );
    }

    #[test]
    fn test_directory_tree_skip_gitignore() {
        let dir = tree(&["main.go", "debug.log"]);
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();

        let filter = DirectoryFilter {
            ignore_patterns: vec![],
            skip_gitignore: true,
        };
        let files = FileSystemReader::new()
            .directory_tree(dir.path(), &filter)
            .unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.contains(&PathBuf::from("debug.log")));
    }

    #[test]
    fn test_directory_tree_extra_patterns() {
        let dir = tree(&["main.go", "vendor/lib/lib.go", "docs/guide.md"]);
        let filter = DirectoryFilter {
            ignore_patterns: vec!["vendor/".to_string(), "*.md".to_string()],
            skip_gitignore: false,
        };

        let files = FileSystemReader::new()
            .directory_tree(dir.path(), &filter)
            .unwrap();

        assert_eq!(files, vec![PathBuf::from("main.go")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_tree_skips_symlinks() {
        let dir = tree(&["main.go"]);
        std::os::unix::fs::symlink(dir.path().join("main.go"), dir.path().join("link.go"))
            .unwrap();

        let files = FileSystemReader::new()
            .directory_tree(dir.path(), &DirectoryFilter::default())
            .unwrap();

        assert_eq!(files, vec![PathBuf::from("main.go")]);
    }

    #[test]
    fn test_directory_tree_missing_dir_fails() {
        let result = FileSystemReader::new()
            .directory_tree(Path::new("/nonexistent/tree"), &DirectoryFilter::default());
        assert!(result.is_err());
    }
}
