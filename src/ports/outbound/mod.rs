/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, registries, VCS hosts, console).
pub mod archive_extractor;
pub mod dependency_scanner;
pub mod directory_reader;
pub mod document_reader;
pub mod formatter;
pub mod image_registry;
pub mod layer_analyzer;
pub mod license_classifier;
pub mod module_reader;
pub mod output_presenter;
pub mod progress_reporter;
pub mod vcs_resolver;

pub use archive_extractor::ArchiveExtractor;
pub use dependency_scanner::{DependencyScanner, ModuleScanOptions, DEFAULT_SCAN_WORKERS};
pub use directory_reader::{DirectoryFilter, DirectoryReader};
pub use document_reader::DocumentReader;
pub use formatter::SbomFormatter;
pub use image_registry::ImageRegistry;
pub use layer_analyzer::LayerAnalyzer;
pub use license_classifier::{LicenseClassifier, LicenseScan};
pub use module_reader::ModuleReader;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use vcs_resolver::{RepoRoot, VcsResolver};
