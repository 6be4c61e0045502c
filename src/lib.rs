//! spdx-bom - SPDX SBOM generation tool
//!
//! This library generates SPDX 2.2 tag-value documents describing container
//! images, docker-archive tarballs, source directories and loose files,
//! following hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): The SPDX document model and pure services
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use spdx_bom::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<()> {
//! let module_scanner = GoModuleScanner::new(
//!     FileSystemReader::new(),
//!     TextLicenseClassifier::new(),
//!     CachingVcsResolver::new(GoVcsResolver::new()?),
//!     StderrProgressReporter::new(),
//! );
//! let use_case = GenerateDocumentUseCase::new(
//!     TarArchiveExtractor::new(),
//!     OciRegistryClient::new()?,
//!     DebianLayerAnalyzer::new(),
//!     TextLicenseClassifier::new(),
//!     FileSystemReader::new(),
//!     module_scanner,
//!     StderrProgressReporter::new(),
//! );
//!
//! let options = DocGenerateOptions::builder()
//!     .directories(vec![PathBuf::from(".")])
//!     .namespace("https://example.com/sbom")
//!     .build();
//! let doc = use_case.generate(options).await?;
//!
//! println!("{}", SpdxTagValueFormatter::new().format(&doc)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::analyzers::DebianLayerAnalyzer;
    pub use crate::adapters::outbound::archive::TarArchiveExtractor;
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{OutlineFormatter, SpdxTagValueFormatter};
    pub use crate::adapters::outbound::licensing::TextLicenseClassifier;
    pub use crate::adapters::outbound::network::{
        CachingVcsResolver, GoVcsResolver, OciRegistryClient,
    };
    pub use crate::adapters::outbound::parsers::SpdxTagValueParser;
    pub use crate::application::dto::{
        DirectorySource, DocGenerateOptions, ModuleScanOptions, OutlineOptions,
    };
    pub use crate::application::use_cases::{
        GenerateDocumentUseCase, GoModuleScanner, ImagePackageBuilder, OutlineDocumentUseCase,
    };
    pub use crate::ports::outbound::{
        ArchiveExtractor, DependencyScanner, DirectoryReader, DocumentReader, ImageRegistry,
        LayerAnalyzer, LicenseClassifier, ModuleReader, OutputPresenter, ProgressReporter,
        SbomFormatter, VcsResolver,
    };
    pub use crate::sbom_generation::domain::{Document, File, ImageReference, Package};
    pub use crate::sbom_generation::services::{DocumentFactory, VerificationCodeCalculator};
    pub use crate::shared::Result;
}
