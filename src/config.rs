//! Configuration file support for spdx-bom.
//!
//! Provides YAML-based configuration through `spdx-bom.config.yml` files,
//! including data structures, file loading, validation, and merging into
//! the generation options.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::application::dto::{DirectorySource, DocGenerateOptions};
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "spdx-bom.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub namespace: Option<String>,
    pub name: Option<String>,
    /// License declared for directories that do not name their own.
    pub license: Option<String>,
    pub creator: Option<CreatorConfig>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactConfig>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CreatorConfig {
    pub person: Option<String>,
    pub tool: Option<String>,
}

/// A source to describe.
#[derive(Debug, Deserialize)]
pub struct ArtifactConfig {
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub source: String,
    /// License declared for this directory artifact.
    pub license: Option<String>,
    /// Scan go.mod dependencies of this directory artifact.
    pub gomodules: Option<bool>,
}

/// Kinds of artifacts a config file can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactType {
    Image,
    DockerArchive,
    File,
    Directory,
}

impl ArtifactType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(ArtifactType::Image),
            "docker-archive" => Some(ArtifactType::DockerArchive),
            "file" => Some(ArtifactType::File),
            "directory" => Some(ArtifactType::Directory),
            _ => None,
        }
    }
}

impl ConfigFile {
    /// Merges the file into `options`. Values already set in `options` win.
    ///
    /// Artifacts are appended after the sources given on the command line.
    /// A directory artifact keeps its own `license` and `gomodules`.
    pub fn apply_to(&self, options: &mut DocGenerateOptions) {
        fill_if_empty(&mut options.namespace, &self.namespace);
        fill_if_empty(&mut options.name, &self.name);
        fill_if_empty(&mut options.license, &self.license);
        if let Some(creator) = &self.creator {
            fill_if_empty(&mut options.creator_person, &creator.person);
            fill_if_empty(&mut options.creator_tool, &creator.tool);
        }

        for artifact in &self.artifacts {
            // Types were checked when the file was loaded
            let Some(kind) = ArtifactType::parse(&artifact.artifact_type) else {
                continue;
            };
            match kind {
                ArtifactType::Image => options.images.push(artifact.source.clone()),
                ArtifactType::DockerArchive => {
                    options.tarballs.push(PathBuf::from(&artifact.source))
                }
                ArtifactType::File => options.files.push(PathBuf::from(&artifact.source)),
                ArtifactType::Directory => options.directories.push(DirectorySource {
                    path: PathBuf::from(&artifact.source),
                    license: artifact.license.clone().filter(|l| !l.is_empty()),
                    process_go_modules: artifact.gomodules,
                }),
            }
        }
    }
}

fn fill_if_empty(target: &mut String, value: &Option<String>) {
    if target.is_empty() {
        if let Some(value) = value {
            *target = value.clone();
        }
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    for (i, artifact) in config.artifacts.iter().enumerate() {
        if artifact.source.trim().is_empty() {
            bail!(
                "Invalid config: artifacts[{}].source must not be empty.\n\n\
                 💡 Hint: Each artifact needs a 'source' (an image reference or a path).",
                i
            );
        }
        if ArtifactType::parse(&artifact.artifact_type).is_none() {
            bail!(
                "Invalid config: artifacts[{}].type '{}' is not supported.\n\n\
                 💡 Hint: Use one of: image, docker-archive, file, directory.",
                i,
                artifact.artifact_type
            );
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
