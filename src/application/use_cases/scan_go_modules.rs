use crate::ports::outbound::{
    DependencyScanner, LicenseClassifier, ModuleReader, ModuleScanOptions, ProgressReporter,
    VcsResolver,
};
use crate::sbom_generation::domain::{GoModFile, GoPackage, Package};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

const GO_MOD: &str = "go.mod";
const SCAN_DIR_PREFIX: &str = "gomod-scanner-";
const DOWNLOAD_DIR_PREFIX: &str = "package-download-";

/// GoModuleScanner - Lists a Go module's dependencies as packages
///
/// Dependencies come from `go.mod`. When license scanning is on, each one is
/// cloned at its revision and its license files are classified, a bounded
/// number at a time. A dependency that fails to download or scan is reported
/// and keeps no license; the scan itself carries on.
///
/// # Type Parameters
/// * `MR` - ModuleReader implementation
/// * `LC` - LicenseClassifier implementation
/// * `VR` - VcsResolver implementation
/// * `PR` - ProgressReporter implementation
pub struct GoModuleScanner<MR, LC, VR, PR> {
    module_reader: MR,
    license_classifier: LC,
    vcs_resolver: VR,
    progress_reporter: PR,
}

impl<MR, LC, VR, PR> GoModuleScanner<MR, LC, VR, PR>
where
    MR: ModuleReader,
    LC: LicenseClassifier,
    VR: VcsResolver,
    PR: ProgressReporter,
{
    /// Creates a new GoModuleScanner with injected dependencies
    pub fn new(
        module_reader: MR,
        license_classifier: LC,
        vcs_resolver: VR,
        progress_reporter: PR,
    ) -> Self {
        Self {
            module_reader,
            license_classifier,
            vcs_resolver,
            progress_reporter,
        }
    }

    /// Reads and parses go.mod, returning the dependencies to describe
    fn read_dependencies(
        &self,
        module_dir: &Path,
        only_direct_deps: bool,
    ) -> Result<Vec<GoPackage>> {
        let content = self.module_reader.read_module_manifest(module_dir)?;
        let modfile = GoModFile::parse(&content)
            .with_context(|| format!("parsing {}", module_dir.join(GO_MOD).display()))?;

        let packages = modfile.packages(only_direct_deps);
        self.progress_reporter.report(&format!(
            "📖 Module {} has {} dependencies",
            modfile.module_path,
            packages.len()
        ));
        Ok(packages)
    }

    /// Downloads and classifies every dependency, keeping manifest order
    async fn scan_licenses(
        &self,
        packages: Vec<GoPackage>,
        scan_dir: &Path,
        options: &ModuleScanOptions,
    ) -> Vec<GoPackage> {
        let total = packages.len();
        let finished = AtomicUsize::new(0);
        let finished = &finished;

        self.progress_reporter
            .report("🔍 Downloading modules to scan their licenses...");

        let mut scanned: Vec<(usize, GoPackage)> = stream::iter(packages.into_iter().enumerate())
            .map(|(idx, mut pkg)| async move {
                if let Err(e) = self
                    .scan_package(&mut pkg, scan_dir, options.force_download)
                    .await
                {
                    self.progress_reporter.report_error(&format!(
                        "⚠️  Warning: Skipping license scan of {}@{}: {:#}",
                        pkg.import_path, pkg.revision, e
                    ));
                }
                let done = finished.fetch_add(1, Ordering::SeqCst) + 1;
                self.progress_reporter
                    .report_progress(done, total, Some(&pkg.import_path));
                (idx, pkg)
            })
            .buffer_unordered(options.workers.max(1))
            .collect()
            .await;

        scanned.sort_by_key(|(idx, _)| *idx);

        let licensed = scanned
            .iter()
            .filter(|(_, pkg)| !pkg.license_id.is_empty())
            .count();
        self.progress_reporter.report_completion(&format!(
            "✅ License scan complete: {} of {} modules licensed",
            licensed, total
        ));

        scanned.into_iter().map(|(_, pkg)| pkg).collect()
    }

    /// Downloads one dependency if needed and classifies its license
    async fn scan_package(&self, pkg: &mut GoPackage, scan_dir: &Path, force: bool) -> Result<()> {
        if force || !pkg.is_downloaded() {
            let repo = self
                .vcs_resolver
                .repo_root_for_import_path(&pkg.import_path)
                .await?;

            let dir = tempfile::Builder::new()
                .prefix(DOWNLOAD_DIR_PREFIX)
                .tempdir_in(scan_dir)?
                .keep();
            self.vcs_resolver
                .create_at_rev(&repo, &dir, &pkg.checkout_revision())
                .await
                .with_context(|| format!("creating local clone of {}", repo.repo))?;
            pkg.local_dir = Some(dir);
        }

        let Some(dir) = pkg.local_dir.as_deref() else {
            return Ok(());
        };
        let (licenses, _unrecognized) = self.license_classifier.read_licenses(dir)?;

        if licenses.len() > 1 {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} licenses found for {}, using {}",
                licenses.len(),
                pkg.import_path,
                licenses[0].license_id
            ));
        }
        if let Some(first) = licenses.first() {
            pkg.license_id = first.license_id.clone();
        }
        Ok(())
    }

    /// Converts a dependency into a package
    ///
    /// An unresolvable repository leaves the download location empty.
    async fn to_spdx_package(&self, pkg: &GoPackage) -> Package {
        let mut package = Package::new(pkg.import_path.clone());
        match self
            .vcs_resolver
            .repo_root_for_import_path(&pkg.import_path)
            .await
        {
            Ok(repo) => package.download_location = repo.repo,
            Err(e) => self.progress_reporter.report_error(&format!(
                "⚠️  Warning: No download location for {}: {:#}",
                pkg.import_path, e
            )),
        }
        package.version = pkg.revision.clone();
        package.license_concluded = pkg.license_id.clone();
        package
    }
}

#[async_trait]
impl<MR, LC, VR, PR> DependencyScanner for GoModuleScanner<MR, LC, VR, PR>
where
    MR: ModuleReader,
    LC: LicenseClassifier,
    VR: VcsResolver,
    PR: ProgressReporter,
{
    fn detects(&self, dir: &Path) -> bool {
        dir.join(GO_MOD).is_file()
    }

    async fn scan_dependencies(
        &self,
        module_dir: &Path,
        options: &ModuleScanOptions,
    ) -> Result<Vec<Package>> {
        // Step 1: Read the dependency list
        let mut packages = self.read_dependencies(module_dir, options.only_direct_deps)?;

        // Step 2: Download and classify licenses; downloads are removed when
        // the scan directory guard drops at the end of this call
        let scan_dir = tempfile::Builder::new().prefix(SCAN_DIR_PREFIX).tempdir()?;
        if options.scan_licenses && !packages.is_empty() {
            packages = self.scan_licenses(packages, scan_dir.path(), options).await;
        }

        // Step 3: Convert to packages
        let mut result = Vec::with_capacity(packages.len());
        for pkg in &packages {
            result.push(self.to_spdx_package(pkg).await);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::{LicenseScan, RepoRoot};
    use crate::sbom_generation::domain::ClassifyResult;
    use std::fs;
    use std::sync::Mutex;

    const GO_MOD_CONTENT: &str = "module example.com/app

go 1.21

require (
	github.com/good/one v1.0.0
	github.com/broken/two v0.0.0-20210101000000-abcdef123456
	github.com/good/three v2.0.0+incompatible // indirect
)
";

    struct StubModuleReader(String);

    impl ModuleReader for StubModuleReader {
        fn read_module_manifest(&self, _module_dir: &Path) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    /// Clones write a LICENSE marker; import paths under `github.com/broken` fail
    #[derive(Default)]
    struct StubResolver {
        checkouts: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl VcsResolver for StubResolver {
        async fn repo_root_for_import_path(&self, import_path: &str) -> Result<RepoRoot> {
            Ok(RepoRoot {
                vcs: "git".to_string(),
                repo: format!("https://{}", import_path),
                root: import_path.to_string(),
            })
        }

        async fn create_at_rev(&self, repo: &RepoRoot, dir: &Path, revision: &str) -> Result<()> {
            self.checkouts
                .lock()
                .unwrap()
                .push((repo.root.clone(), revision.to_string()));
            if repo.root.starts_with("github.com/broken") {
                anyhow::bail!("repository not found");
            }
            fs::write(dir.join("LICENSE"), &repo.root)?;
            Ok(())
        }
    }

    struct StubClassifier;

    impl LicenseClassifier for StubClassifier {
        fn read_licenses(&self, dir: &Path) -> Result<LicenseScan> {
            let license = dir.join("LICENSE");
            if license.is_file() {
                Ok((vec![ClassifyResult::new(license, "MIT")], vec![]))
            } else {
                Ok((vec![], vec![]))
            }
        }
    }

    #[derive(Default)]
    struct CapturingReporter {
        errors: Mutex<Vec<String>>,
    }

    impl ProgressReporter for CapturingReporter {
        fn report(&self, _message: &str) {}
        fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
        fn report_error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
        fn report_completion(&self, _message: &str) {}
    }

    type TestScanner =
        GoModuleScanner<StubModuleReader, StubClassifier, StubResolver, CapturingReporter>;

    fn scanner() -> TestScanner {
        GoModuleScanner::new(
            StubModuleReader(GO_MOD_CONTENT.to_string()),
            StubClassifier,
            StubResolver::default(),
            CapturingReporter::default(),
        )
    }

    #[tokio::test]
    async fn test_failed_download_leaves_others_licensed() {
        let scanner = scanner();
        let packages = scanner
            .scan_dependencies(Path::new("."), &ModuleScanOptions::default())
            .await
            .unwrap();

        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["github.com/good/one", "github.com/broken/two", "github.com/good/three"]
        );
        assert_eq!(packages[0].license_concluded, "MIT");
        assert_eq!(packages[1].license_concluded, "");
        assert_eq!(packages[2].license_concluded, "MIT");

        let errors = scanner.progress_reporter.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("github.com/broken/two"));
    }

    #[tokio::test]
    async fn test_packages_carry_version_and_location() {
        let scanner = scanner();
        let packages = scanner
            .scan_dependencies(Path::new("."), &ModuleScanOptions::default())
            .await
            .unwrap();

        assert_eq!(packages[0].version, "v1.0.0");
        assert_eq!(packages[0].download_location, "https://github.com/good/one");
        assert_eq!(
            packages[1].version,
            "v0.0.0-20210101000000-abcdef123456"
        );
    }

    #[tokio::test]
    async fn test_checkout_uses_resolved_revisions() {
        let scanner = scanner();
        scanner
            .scan_dependencies(Path::new("."), &ModuleScanOptions::default())
            .await
            .unwrap();

        let mut checkouts = scanner.vcs_resolver.checkouts.lock().unwrap().clone();
        checkouts.sort();
        assert_eq!(
            checkouts,
            vec![
                ("github.com/broken/two".to_string(), "abcdef123456".to_string()),
                ("github.com/good/one".to_string(), "v1.0.0".to_string()),
                ("github.com/good/three".to_string(), "v2.0.0".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_only_direct_deps() {
        let scanner = scanner();
        let options = ModuleScanOptions {
            only_direct_deps: true,
            ..ModuleScanOptions::default()
        };
        let packages = scanner
            .scan_dependencies(Path::new("."), &options)
            .await
            .unwrap();

        assert_eq!(packages.len(), 2);
        assert!(packages.iter().all(|p| p.name != "github.com/good/three"));
    }

    #[tokio::test]
    async fn test_without_license_scan_nothing_is_downloaded() {
        let scanner = scanner();
        let options = ModuleScanOptions {
            scan_licenses: false,
            ..ModuleScanOptions::default()
        };
        let packages = scanner
            .scan_dependencies(Path::new("."), &options)
            .await
            .unwrap();

        assert_eq!(packages.len(), 3);
        assert!(packages.iter().all(|p| p.license_concluded.is_empty()));
        assert!(scanner.vcs_resolver.checkouts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_worker_keeps_order() {
        let scanner = scanner();
        let options = ModuleScanOptions {
            workers: 1,
            ..ModuleScanOptions::default()
        };
        let packages = scanner
            .scan_dependencies(Path::new("."), &options)
            .await
            .unwrap();
        assert_eq!(packages[2].name, "github.com/good/three");
    }

    #[test]
    fn test_detects_go_module() {
        let dir = tempfile::TempDir::new().unwrap();
        let scanner = scanner();
        assert!(!scanner.detects(dir.path()));

        fs::write(dir.path().join("go.mod"), GO_MOD_CONTENT).unwrap();
        assert!(scanner.detects(dir.path()));
    }
}
