use crate::ports::outbound::ArchiveExtractor;
use crate::sbom_generation::domain::{ArchiveManifest, Package};
use crate::shared::error::SbomError;
use crate::shared::security::{
    resolve_archive_link_target, validate_archive_entry_path, validate_file_size,
    validate_regular_file, MAX_MANIFEST_SIZE,
};
use crate::shared::Result;
use sha1::{Digest, Sha1};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tar::Archive;
use tempfile::TempDir;

const EXTRACT_DIR_PREFIX: &str = "spdx-tar-extract-";

/// Prefix of overlay filesystem whiteout entries
const WHITEOUT_PREFIX: &str = ".wh.";

/// TarArchiveExtractor adapter for docker-archive tarballs
///
/// This adapter implements the ArchiveExtractor port using the `tar` crate.
/// Extraction is sequential and streams each entry straight to disk.
pub struct TarArchiveExtractor;

impl TarArchiveExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Writes every file and link entry below `dest`, returning how many were written
    ///
    /// Links are materialized as copies of their target once the whole stream
    /// has been read, since a target may appear after the link.
    fn unpack<R: Read>(reader: R, dest: &Path) -> Result<usize> {
        let mut archive = Archive::new(reader);
        let mut links: Vec<(PathBuf, PathBuf)> = Vec::new();
        let mut extracted = 0;

        for entry in archive.entries()? {
            let mut entry = entry?;
            let entry_type = entry.header().entry_type();
            if entry_type.is_dir() {
                continue;
            }

            let path = entry.path()?.into_owned();
            if Self::is_whiteout(&path) {
                continue;
            }
            validate_archive_entry_path(&path)?;

            if entry_type.is_symlink() || entry_type.is_hard_link() {
                let link_name = entry.link_name()?.ok_or_else(|| {
                    anyhow::anyhow!("link entry {} has no target", path.display())
                })?;
                let target =
                    resolve_archive_link_target(&path, &link_name, entry_type.is_symlink())?;
                links.push((path, target));
                continue;
            }

            // Devices, fifos and extension headers carry no file content
            if !(entry_type.is_file() || entry_type.is_contiguous()) {
                continue;
            }

            let target = dest.join(&path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut output = fs::File::create(&target)?;
            io::copy(&mut entry, &mut output)?;
            extracted += 1;
        }

        Ok(extracted + Self::copy_link_targets(dest, links)?)
    }

    /// Copies each link's target to the link's own path
    ///
    /// Chained links resolve over several passes. Links whose target never
    /// appears, or is a directory, are left out.
    fn copy_link_targets(dest: &Path, mut pending: Vec<(PathBuf, PathBuf)>) -> Result<usize> {
        let mut copied = 0;

        while !pending.is_empty() {
            let before = pending.len();
            let mut waiting = Vec::new();

            for (path, target) in pending {
                let source = dest.join(&target);
                if !source.is_file() {
                    waiting.push((path, target));
                    continue;
                }

                let link = dest.join(&path);
                if let Some(parent) = link.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(&source, &link)?;
                copied += 1;
            }

            if waiting.len() == before {
                break;
            }
            pending = waiting;
        }

        Ok(copied)
    }

    fn is_whiteout(path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().starts_with(WHITEOUT_PREFIX))
            .unwrap_or(false)
    }
}

impl Default for TarArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractor for TarArchiveExtractor {
    fn extract_tarball_tmp(&self, tar_path: &Path) -> Result<TempDir> {
        let file = fs::File::open(tar_path).map_err(|e| SbomError::Extraction {
            path: tar_path.to_path_buf(),
            details: format!("opening tarball: {}", e),
        })?;

        let tmp_dir = tempfile::Builder::new()
            .prefix(EXTRACT_DIR_PREFIX)
            .tempdir()
            .map_err(|e| SbomError::Extraction {
                path: tar_path.to_path_buf(),
                details: format!("creating temporary directory: {}", e),
            })?;

        Self::unpack(io::BufReader::new(file), tmp_dir.path()).map_err(|e| {
            SbomError::Extraction {
                path: tar_path.to_path_buf(),
                details: format!("{:#}", e),
            }
        })?;

        Ok(tmp_dir)
    }

    fn read_archive_manifest(&self, manifest_path: &Path) -> Result<ArchiveManifest> {
        let extraction_error = |details: String| SbomError::Extraction {
            path: manifest_path.to_path_buf(),
            details,
        };

        if !manifest_path.exists() {
            return Err(extraction_error("archive manifest not found".to_string()).into());
        }
        validate_regular_file(manifest_path, "manifest.json")?;
        let size = fs::metadata(manifest_path)?.len();
        validate_file_size(size, manifest_path, MAX_MANIFEST_SIZE)?;

        let content = fs::read_to_string(manifest_path)
            .map_err(|e| extraction_error(format!("reading archive manifest: {}", e)))?;

        ArchiveManifest::first_from_json(&content)
            .map_err(|e| extraction_error(format!("parsing archive manifest: {}", e)))?
            .ok_or_else(|| extraction_error("archive manifest has no entries".to_string()).into())
    }

    fn package_from_layer_tarball(&self, layer_file: &str, extract_dir: &Path) -> Result<Package> {
        validate_archive_entry_path(Path::new(layer_file))?;
        let layer_path = extract_dir.join(layer_file);
        if !layer_path.is_file() {
            return Err(SbomError::Extraction {
                path: layer_path,
                details: "layer listed in the manifest is missing from the archive".to_string(),
            }
            .into());
        }

        let mut package = Package::default();
        package.read_source_file(&layer_path, extract_dir)?;
        package.name = hex::encode(Sha1::digest(layer_file.as_bytes()));
        Ok(package)
    }
}
