pub mod archive_manifest;
pub mod checksum;
pub mod document;
pub mod entities;
pub mod file;
pub mod go_module;
pub mod identifiers;
pub mod image_reference;
pub mod license_match;
pub mod package;

pub use archive_manifest::ArchiveManifest;
pub use checksum::{ChecksumAlgorithm, Checksums};
pub use document::{Creator, Document};
pub use entities::{EntityMap, SpdxElement};
pub use file::File;
pub use go_module::{GoModFile, GoPackage, GoRequirement};
pub use image_reference::{ImageIdentifier, ImageReference};
pub use license_match::ClassifyResult;
pub use package::{Contact, Package};
