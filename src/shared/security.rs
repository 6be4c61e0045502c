use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Maximum size of text manifests read into memory (go.mod, manifest.json, os-release)
pub const MAX_MANIFEST_SIZE: u64 = 10 * 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Arguments
/// * `path` - The path to validate
/// * `file_description` - Description of the file (e.g., "go.mod", "manifest.json")
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| SbomError::FileReadError {
        path: path.to_path_buf(),
        details: format!("Failed to read {} metadata: {}", file_description, e),
    })?;

    if metadata.is_symlink() {
        return Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} is a symbolic link", file_description),
            hint: "Point the tool at the real file instead of a link".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(())
}

/// Validates that the manifest size stays within acceptable limits
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Validates that an archive entry path stays inside the extraction root
///
/// Absolute paths, drive prefixes and `..` components are rejected.
pub fn validate_archive_entry_path(entry_path: &Path) -> Result<()> {
    let escapes = entry_path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if escapes {
        return Err(escaping_entry(entry_path));
    }

    Ok(())
}

/// Resolves the target of an archive link entry to a path below the extraction root
///
/// Symbolic link targets are relative to the directory holding the link, hard
/// link targets to the archive root. `.` and `..` are resolved lexically.
///
/// # Errors
/// Returns `SbomError::SecurityError` when the target is absolute or climbs
/// above the extraction root
pub fn resolve_archive_link_target(
    entry_path: &Path,
    link_name: &Path,
    symbolic: bool,
) -> Result<PathBuf> {
    let joined = match entry_path.parent() {
        Some(parent) if symbolic => parent.join(link_name),
        _ => link_name.to_path_buf(),
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => resolved.push(part),
            Component::ParentDir if resolved.pop() => {}
            _ => return Err(escaping_entry(&joined)),
        }
    }

    validate_archive_entry_path(&resolved)?;
    Ok(resolved)
}

fn escaping_entry(path: &Path) -> anyhow::Error {
    SbomError::SecurityError {
        path: path.to_path_buf(),
        reason: "Archive entry escapes the extraction directory".to_string(),
        hint: "The archive may be corrupted or crafted; inspect it before use".to_string(),
    }
    .into()
}
