use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::dto::{DocGenerateOptions, OutlineOptions};

/// Generate SPDX SBOMs from container images, archives, files and directories
#[derive(Parser, Debug)]
#[command(name = "spdx-bom")]
#[command(version)]
#[command(
    about = "Generate SPDX tag-value SBOMs from container images, archives, files and directories",
    long_about = None
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Existing directory to describe as a package
    #[arg(value_name = "DIR", value_parser = existing_directory)]
    pub positional_directories: Vec<PathBuf>,

    /// Image reference to pull and describe (repeatable)
    #[arg(short, long = "image", value_name = "REFERENCE", value_delimiter = ',')]
    pub images: Vec<String>,

    /// docker-archive tarball to describe (repeatable)
    #[arg(short, long = "tarball", value_name = "PATH", value_delimiter = ',')]
    pub tarballs: Vec<PathBuf>,

    /// File to describe on its own (repeatable)
    #[arg(short, long = "file", value_name = "PATH", value_delimiter = ',')]
    pub files: Vec<PathBuf>,

    /// Directory to describe as a package (repeatable)
    #[arg(short, long = "dirs", value_name = "PATH", value_delimiter = ',')]
    pub directories: Vec<PathBuf>,

    /// gitignore-style pattern of files to leave out of directories (repeatable)
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Do not read .gitignore files in directories
    #[arg(long)]
    pub no_gitignore: bool,

    /// Do not scan go.mod dependencies of directories
    #[arg(long)]
    pub no_gomod: bool,

    /// Only describe direct go.mod dependencies
    #[arg(long)]
    pub no_transient: bool,

    /// Document namespace
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Document name (defaults to BOM-SPDX-<uuid>)
    #[arg(long)]
    pub name: Option<String>,

    /// License declared for directory packages
    #[arg(short, long)]
    pub license: Option<String>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Analyze image layers for installed packages
    #[arg(short, long = "analyze-images")]
    pub analyze_images: bool,

    /// Path to a spdx-bom.config.yml file (discovered in the current directory otherwise)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Work with SPDX documents
    Document {
        #[command(subcommand)]
        command: DocumentCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocumentCommand {
    /// Draw the package and file tree of an SPDX tag-value document
    Outline(OutlineArgs),
}

#[derive(clap::Args, Debug)]
pub struct OutlineArgs {
    /// SPDX tag-value document to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Levels to draw below the document (unlimited when unset)
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Label tree nodes with SPDX identifiers instead of names
    #[arg(long)]
    pub spdx_ids: bool,
}

impl OutlineArgs {
    pub fn to_options(&self) -> OutlineOptions {
        OutlineOptions {
            depth: self.depth,
            spdx_ids: self.spdx_ids,
        }
    }
}

fn existing_directory(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("'{}' is not an existing directory", value))
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Converts the arguments into generation options.
    ///
    /// Positional directories follow the `--dirs` ones. The output file is
    /// left unset; the caller decides where output goes.
    pub fn to_options(&self) -> DocGenerateOptions {
        let directories = self
            .directories
            .iter()
            .chain(&self.positional_directories)
            .cloned();

        DocGenerateOptions::builder()
            .images(self.images.clone())
            .tarballs(self.tarballs.clone())
            .files(self.files.clone())
            .directories(directories)
            .ignore_patterns(self.ignore_patterns.clone())
            .no_gitignore(self.no_gitignore)
            .process_go_modules(!self.no_gomod)
            .only_direct_deps(self.no_transient)
            .namespace(self.namespace.clone().unwrap_or_default())
            .name(self.name.clone().unwrap_or_default())
            .license(self.license.clone().unwrap_or_default())
            .analyze_layers(self.analyze_images)
            .build()
    }
}
