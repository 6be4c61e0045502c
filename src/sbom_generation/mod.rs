/// SBOM generation core - the SPDX document model and the pure services around it
pub mod domain;
pub mod services;
