/// Data Transfer Objects for application layer
///
/// DTOs carry requests from the command line and config file into the use
/// cases, keeping the domain layer isolated.
mod doc_generate_options;
mod outline_options;

pub use crate::ports::outbound::ModuleScanOptions;
pub use doc_generate_options::{DirectorySource, DocGenerateOptions, DocGenerateOptionsBuilder};
pub use outline_options::OutlineOptions;
