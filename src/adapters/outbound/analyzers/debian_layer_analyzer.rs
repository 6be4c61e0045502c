use crate::ports::outbound::LayerAnalyzer;
use crate::sbom_generation::domain::identifiers::{package_id_from_name, NOASSERTION};
use crate::sbom_generation::domain::Package;
use crate::shared::error::SbomError;
use crate::shared::security::MAX_MANIFEST_SIZE;
use crate::shared::Result;
use flate2::read::GzDecoder;
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;
use tar::Archive;

const OS_RELEASE_PATHS: [&str; 2] = ["etc/os-release", "usr/lib/os-release"];
const DPKG_STATUS: &str = "var/lib/dpkg/status";
const DPKG_STATUS_DIR: &str = "var/lib/dpkg/status.d/";
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// An installed Debian package read from a dpkg status database
#[derive(Debug, Clone, PartialEq, Eq)]
struct DebPackage {
    name: String,
    version: String,
    maintainer: String,
}

impl DebPackage {
    /// Short digest of the raw name and version
    fn digest(&self) -> String {
        let digest = Sha1::digest(format!("{}={}", self.name, self.version).as_bytes());
        hex::encode(&digest[..4])
    }
}

/// Files of interest found while streaming a layer
#[derive(Debug, Default)]
struct LayerContents {
    os_release: HashMap<String, String>,
    dpkg_databases: Vec<String>,
}

/// DebianLayerAnalyzer adapter for Debian based image layers
///
/// Records the distribution from os-release as the layer's supplier and adds
/// every package installed by dpkg as a sub-package of the layer. Works on
/// plain and gzip-compressed layer tarballs.
pub struct DebianLayerAnalyzer;

impl DebianLayerAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn open_layer(layer_path: &Path) -> Result<Box<dyn Read>> {
        let mut magic = [0u8; 2];
        let mut head = fs::File::open(layer_path).map_err(|e| SbomError::FileReadError {
            path: layer_path.to_path_buf(),
            details: e.to_string(),
        })?;
        let is_gzip = head.read_exact(&mut magic).is_ok() && magic == GZIP_MAGIC;

        let file = BufReader::new(fs::File::open(layer_path)?);
        if is_gzip {
            Ok(Box::new(GzDecoder::new(file)))
        } else {
            Ok(Box::new(file))
        }
    }

    fn scan_layer(layer_path: &Path) -> Result<LayerContents> {
        let mut contents = LayerContents::default();
        let mut os_release_rank = usize::MAX;
        let mut archive = Archive::new(Self::open_layer(layer_path)?);

        for entry in archive.entries()? {
            let mut entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let path = entry.path()?.to_string_lossy().into_owned();
            let path = path.trim_start_matches("./").trim_start_matches('/').to_string();

            let rank = OS_RELEASE_PATHS.iter().position(|p| *p == path);
            let is_dpkg = path == DPKG_STATUS
                || (path.starts_with(DPKG_STATUS_DIR) && !path.ends_with(".md5sums"));
            if rank.is_none() && !is_dpkg {
                continue;
            }
            if entry.header().size()? > MAX_MANIFEST_SIZE {
                continue;
            }

            let mut text = String::new();
            if entry.read_to_string(&mut text).is_err() {
                continue;
            }

            match rank {
                Some(rank) if rank < os_release_rank => {
                    os_release_rank = rank;
                    contents.os_release = parse_os_release(&text);
                }
                Some(_) => {}
                None => contents.dpkg_databases.push(text),
            }
        }

        Ok(contents)
    }
}

impl Default for DebianLayerAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerAnalyzer for DebianLayerAnalyzer {
    fn analyze_layer(&self, layer_path: &Path, package: &mut Package) -> Result<()> {
        let contents = Self::scan_layer(layer_path).map_err(|e| SbomError::Extraction {
            path: layer_path.to_path_buf(),
            details: format!("analyzing layer: {:#}", e),
        })?;

        let distribution = contents
            .os_release
            .get("PRETTY_NAME")
            .or_else(|| contents.os_release.get("NAME"));
        if let Some(distribution) = distribution {
            package.supplier.organization = distribution.clone();
        }

        // Layer packages are named by a hash; a short prefix keeps ids unique across layers
        let layer_tag: String = package.name.chars().take(12).collect();
        for database in &contents.dpkg_databases {
            for deb in parse_dpkg_status(database) {
                let base_id = package_id_from_name(&format!(
                    "deb-{}-{}-{}",
                    layer_tag, deb.name, deb.version
                ))?;
                // Names that only differ in dropped characters get a digest suffix
                let id = match package.packages().get(&base_id) {
                    None => base_id,
                    Some(seen) if seen.name == deb.name && seen.version == deb.version => continue,
                    Some(_) => format!("{}-{}", base_id, deb.digest()),
                };
                if package.packages().contains(&id) {
                    continue;
                }

                let mut sub = Package::new(deb.name);
                sub.id = id;
                sub.version = deb.version;
                sub.supplier.person = deb.maintainer;
                sub.download_location = NOASSERTION.to_string();
                package.add_package(sub)?;
            }
        }

        Ok(())
    }
}

/// Parses `KEY=value` lines, unquoting values
fn parse_os_release(text: &str) -> HashMap<String, String> {
    text.lines()
        .filter_map(|line| line.trim().split_once('='))
        .filter(|(key, _)| !key.starts_with('#'))
        .map(|(key, value)| {
            (
                key.trim().to_string(),
                value.trim().trim_matches(['"', '\'']).to_string(),
            )
        })
        .collect()
}

/// Parses a dpkg status database into its installed packages.
///
/// Stanzas without a `Status` field (distroless `status.d` files) count as installed.
fn parse_dpkg_status(text: &str) -> Vec<DebPackage> {
    text.split("\n\n")
        .filter_map(|stanza| {
            let mut fields: HashMap<&str, &str> = HashMap::new();
            for line in stanza.lines() {
                if line.starts_with([' ', '\t']) {
                    continue;
                }
                if let Some((key, value)) = line.split_once(':') {
                    fields.insert(key.trim(), value.trim());
                }
            }

            let name = fields.get("Package").filter(|n| !n.is_empty())?;
            let installed = fields
                .get("Status")
                .map(|status| status.ends_with(" installed"))
                .unwrap_or(true);
            if !installed {
                return None;
            }

            Some(DebPackage {
                name: name.to_string(),
                version: fields.get("Version").unwrap_or(&"").to_string(),
                maintainer: fields.get("Maintainer").unwrap_or(&"").to_string(),
            })
        })
        .collect()
}
