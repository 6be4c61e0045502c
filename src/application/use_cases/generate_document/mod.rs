use crate::adapters::outbound::formatters::SpdxTagValueFormatter;
use crate::application::dto::{DirectorySource, DocGenerateOptions};
use crate::application::factories::{PresenterFactory, PresenterType};
use crate::application::use_cases::ImagePackageBuilder;
use crate::ports::outbound::{
    ArchiveExtractor, DependencyScanner, DirectoryFilter, DirectoryReader, ImageRegistry,
    LayerAnalyzer, LicenseClassifier, ModuleScanOptions, ProgressReporter, SbomFormatter,
};
use crate::sbom_generation::domain::{Document, File, ImageReference, Package};
use crate::sbom_generation::services::DocumentFactory;
use crate::shared::error::SbomError;
use crate::shared::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Namespace written when none was configured
pub const PLACEHOLDER_NAMESPACE: &str = "http://example.com/";

const DEFAULT_WORK_DIR: &str = "spdx-docbuilder";
const BUILD_DIR_PREFIX: &str = "doc-build-";

/// GenerateDocumentUseCase - Core use case for document generation
///
/// Describes images, docker-archive tarballs, directories and files in one
/// document, in that order. Generation fails on the first source that cannot
/// be described; the error names the source.
///
/// # Type Parameters
/// * `AE` - ArchiveExtractor implementation
/// * `IR` - ImageRegistry implementation
/// * `LA` - LayerAnalyzer implementation
/// * `LC` - LicenseClassifier implementation
/// * `DR` - DirectoryReader implementation
/// * `DS` - DependencyScanner implementation
/// * `PR` - ProgressReporter implementation
pub struct GenerateDocumentUseCase<AE, IR, LA, LC, DR, DS, PR> {
    archive_extractor: AE,
    image_registry: IR,
    layer_analyzer: LA,
    license_classifier: LC,
    directory_reader: DR,
    dependency_scanner: DS,
    progress_reporter: PR,
}

impl<AE, IR, LA, LC, DR, DS, PR> GenerateDocumentUseCase<AE, IR, LA, LC, DR, DS, PR>
where
    AE: ArchiveExtractor,
    IR: ImageRegistry,
    LA: LayerAnalyzer,
    LC: LicenseClassifier,
    DR: DirectoryReader,
    DS: DependencyScanner,
    PR: ProgressReporter,
{
    /// Creates a new GenerateDocumentUseCase with injected dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        archive_extractor: AE,
        image_registry: IR,
        layer_analyzer: LA,
        license_classifier: LC,
        directory_reader: DR,
        dependency_scanner: DS,
        progress_reporter: PR,
    ) -> Self {
        Self {
            archive_extractor,
            image_registry,
            layer_analyzer,
            license_classifier,
            directory_reader,
            dependency_scanner,
            progress_reporter,
        }
    }

    /// Generates a document describing every requested source
    ///
    /// # Arguments
    /// * `options` - Sources to describe and how to describe them
    ///
    /// # Returns
    /// The document. It is also rendered to `options.output_file` when set.
    ///
    /// # Errors
    /// Returns `SbomError::Validation` when no source was requested, and the
    /// first failure of any source otherwise
    pub async fn generate(&self, options: DocGenerateOptions) -> Result<Document> {
        // Step 1: Validate before touching anything
        if !options.has_sources() {
            return Err(SbomError::validation(
                "nothing to describe: specify at least one image, tarball, directory or file",
            )
            .into());
        }

        // Step 2: Scoped build directory, removed when this guard drops
        let build_dir = Self::create_build_dir(options.work_dir.as_deref())?;

        // Step 3: Document header
        let mut doc = self.create_document(&options);

        // Step 4: Images
        for image in &options.images {
            let package = self
                .package_from_image_reference(image, build_dir.path(), options.analyze_layers)
                .await
                .with_context(|| format!("processing image {}", image))?;
            doc.add_package(package)
                .with_context(|| format!("processing image {}", image))?;
        }

        // Step 5: Tarballs
        for tarball in &options.tarballs {
            self.image_builder()
                .package_from_image_tarball(tarball, options.analyze_layers)
                .and_then(|package| doc.add_package(package))
                .with_context(|| format!("processing tarball {}", tarball.display()))?;
        }

        // Step 6: Directories
        for source in &options.directories {
            let package = self
                .package_from_directory(source, &options)
                .await
                .with_context(|| format!("processing directory {}", source.path.display()))?;
            doc.add_package(package)
                .with_context(|| format!("processing directory {}", source.path.display()))?;
        }

        // Step 7: Files on their own, named relative to the working directory
        let cwd = std::env::current_dir().ok();
        for path in &options.files {
            File::from_path(path, cwd.as_deref())
                .and_then(|file| doc.add_file(file))
                .with_context(|| format!("processing file {}", path.display()))?;
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Document {} describes {} package(s) and {} file(s)",
            doc.name,
            doc.packages().len(),
            doc.files().len()
        ));

        // Step 8: Render to the requested file
        if let Some(output_file) = &options.output_file {
            self.write_document(&doc, output_file)?;
        }

        Ok(doc)
    }

    fn image_builder(&self) -> ImagePackageBuilder<'_, AE, LA, PR> {
        ImagePackageBuilder::new(
            &self.archive_extractor,
            &self.layer_analyzer,
            &self.progress_reporter,
        )
    }

    /// Creates the work directory if missing and a scoped build directory inside it
    fn create_build_dir(work_dir: Option<&Path>) -> Result<TempDir> {
        let work_dir = match work_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::temp_dir().join(DEFAULT_WORK_DIR),
        };
        std::fs::create_dir_all(&work_dir)
            .with_context(|| format!("creating work directory {}", work_dir.display()))?;

        let build_dir = tempfile::Builder::new()
            .prefix(BUILD_DIR_PREFIX)
            .tempdir_in(&work_dir)?;
        Ok(build_dir)
    }

    fn create_document(&self, options: &DocGenerateOptions) -> Document {
        let mut doc =
            DocumentFactory::create(&options.name, &options.namespace, &options.creator_person);
        if !options.creator_tool.is_empty() {
            doc.creator.tools.push(options.creator_tool.clone());
        }

        if doc.namespace.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Document namespace is empty, using placeholder {}",
                PLACEHOLDER_NAMESPACE
            ));
            doc.namespace = PLACEHOLDER_NAMESPACE.to_string();
        }
        doc
    }

    /// Pulls an image and builds its package tree
    async fn package_from_image_reference(
        &self,
        reference: &str,
        build_dir: &Path,
        analyze_layers: bool,
    ) -> Result<Package> {
        let reference = ImageReference::parse(reference)?;
        let archive_path = build_dir.join(format!("{}.tar", Uuid::new_v4()));

        self.progress_reporter
            .report(&format!("📥 Pulling image {}", reference.name()));
        self.image_registry
            .pull_image_to_archive(&reference, &archive_path)
            .await?;

        let mut package = self
            .image_builder()
            .package_from_image_tarball(&archive_path, analyze_layers)?;
        package.name = reference.repository().to_string();
        package.download_location = reference.name();
        package.version = reference.identifier_str().to_string();
        Ok(package)
    }

    /// Builds a package holding every file of a source tree
    ///
    /// The directory's own license and module settings take precedence over
    /// the document-wide ones.
    async fn package_from_directory(
        &self,
        source: &DirectorySource,
        options: &DocGenerateOptions,
    ) -> Result<Package> {
        let dir = source.path.as_path();
        self.progress_reporter
            .report(&format!("📖 Reading directory: {}", dir.display()));

        let filter = DirectoryFilter {
            ignore_patterns: options.ignore_patterns.clone(),
            skip_gitignore: options.no_gitignore,
        };
        let paths = self.directory_reader.directory_tree(dir, &filter)?;

        let mut package = Package::new(Self::directory_name(dir));
        package.files_analyzed = !paths.is_empty();

        let total = paths.len();
        for (idx, rel) in paths.iter().enumerate() {
            package.add_file(File::from_path(&dir.join(rel), Some(dir))?)?;
            self.progress_reporter
                .report_progress(idx + 1, total, Some(&rel.to_string_lossy()));
        }

        let (licenses, _unrecognized) = self.license_classifier.read_licenses(dir)?;
        if let Some(top) = licenses.first() {
            package.license_concluded = top.license_id.clone();
            package.license_info_from_files = top.license_id.clone();
        }
        package.license_declared = source
            .license
            .clone()
            .unwrap_or_else(|| options.license.clone());

        let process_go_modules = source
            .process_go_modules
            .unwrap_or(options.process_go_modules);
        if process_go_modules && self.dependency_scanner.detects(dir) {
            let scan_options = ModuleScanOptions {
                only_direct_deps: options.only_direct_deps,
                ..ModuleScanOptions::default()
            };
            let dependencies = self
                .dependency_scanner
                .scan_dependencies(dir, &scan_options)
                .await
                .context("scanning go.mod dependencies")?;
            for dependency in dependencies {
                package.add_package(dependency)?;
            }
        }

        Ok(package)
    }

    /// Last component of the directory, resolving `.` and `..`
    fn directory_name(dir: &Path) -> String {
        let resolved: PathBuf = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        resolved
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| resolved.to_string_lossy().into_owned())
    }

    fn write_document(&self, doc: &Document, output_file: &Path) -> Result<()> {
        let content = SpdxTagValueFormatter::new().format(doc)?;
        PresenterFactory::create(PresenterType::File(output_file.to_path_buf())).present(&content)?;

        self.progress_reporter.report_completion(&format!(
            "✅ Output written to: {}",
            output_file.display()
        ));
        Ok(())
    }
}
