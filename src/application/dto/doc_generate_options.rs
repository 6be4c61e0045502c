use std::path::PathBuf;

/// A source directory with its own overrides of the document-wide settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySource {
    pub path: PathBuf,
    /// Declared license, the document-wide `license` when unset
    pub license: Option<String>,
    /// Module scanning switch, the document-wide `process_go_modules` when unset
    pub process_go_modules: Option<bool>,
}

impl DirectorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            license: None,
            process_go_modules: None,
        }
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn with_go_modules(mut self, process: bool) -> Self {
        self.process_go_modules = Some(process);
        self
    }
}

impl From<PathBuf> for DirectorySource {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

/// DocGenerateOptions - Request DTO for the document generation use case
///
/// Lists the sources to describe (images, tarballs, directories, files) and
/// how to describe them. At least one source is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocGenerateOptions {
    /// docker-archive tarballs
    pub tarballs: Vec<PathBuf>,
    /// Files described on their own
    pub files: Vec<PathBuf>,
    /// Image references pulled from a registry
    pub images: Vec<String>,
    /// Source directories
    pub directories: Vec<DirectorySource>,
    /// Where to write the rendered document
    pub output_file: Option<PathBuf>,
    pub namespace: String,
    pub name: String,
    pub creator_person: String,
    /// Extra tool recorded next to this one as creator
    pub creator_tool: String,
    /// License declared for directory packages without their own
    pub license: String,
    /// Run the layer analyzer on every image layer
    pub analyze_layers: bool,
    /// Scan go.mod dependencies of directories without their own setting
    pub process_go_modules: bool,
    /// Leave out `// indirect` module dependencies
    pub only_direct_deps: bool,
    /// Extra gitignore-style patterns for directories
    pub ignore_patterns: Vec<String>,
    /// Do not read `.gitignore` in directories
    pub no_gitignore: bool,
    /// Parent of the scoped build directory, `<tmp>/spdx-docbuilder` when unset
    pub work_dir: Option<PathBuf>,
}

impl Default for DocGenerateOptions {
    fn default() -> Self {
        Self {
            tarballs: Vec::new(),
            files: Vec::new(),
            images: Vec::new(),
            directories: Vec::new(),
            output_file: None,
            namespace: String::new(),
            name: String::new(),
            creator_person: String::new(),
            creator_tool: String::new(),
            license: String::new(),
            analyze_layers: false,
            process_go_modules: true,
            only_direct_deps: false,
            ignore_patterns: Vec::new(),
            no_gitignore: false,
            work_dir: None,
        }
    }
}

impl DocGenerateOptions {
    pub fn builder() -> DocGenerateOptionsBuilder {
        DocGenerateOptionsBuilder::default()
    }

    /// Whether any source was requested
    pub fn has_sources(&self) -> bool {
        !(self.tarballs.is_empty()
            && self.files.is_empty()
            && self.images.is_empty()
            && self.directories.is_empty())
    }
}

/// Builder for [`DocGenerateOptions`]
#[derive(Debug, Default)]
pub struct DocGenerateOptionsBuilder {
    options: DocGenerateOptions,
}

impl DocGenerateOptionsBuilder {
    pub fn tarballs(mut self, tarballs: Vec<PathBuf>) -> Self {
        self.options.tarballs = tarballs;
        self
    }

    pub fn files(mut self, files: Vec<PathBuf>) -> Self {
        self.options.files = files;
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.options.images = images;
        self
    }

    pub fn directories<I, D>(mut self, directories: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DirectorySource>,
    {
        self.options.directories = directories.into_iter().map(Into::into).collect();
        self
    }

    pub fn output_file(mut self, output_file: Option<PathBuf>) -> Self {
        self.options.output_file = output_file;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.options.namespace = namespace.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = name.into();
        self
    }

    pub fn creator_person(mut self, person: impl Into<String>) -> Self {
        self.options.creator_person = person.into();
        self
    }

    pub fn creator_tool(mut self, tool: impl Into<String>) -> Self {
        self.options.creator_tool = tool.into();
        self
    }

    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.options.license = license.into();
        self
    }

    pub fn analyze_layers(mut self, analyze: bool) -> Self {
        self.options.analyze_layers = analyze;
        self
    }

    pub fn process_go_modules(mut self, process: bool) -> Self {
        self.options.process_go_modules = process;
        self
    }

    pub fn only_direct_deps(mut self, only_direct: bool) -> Self {
        self.options.only_direct_deps = only_direct;
        self
    }

    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }

    pub fn no_gitignore(mut self, no_gitignore: bool) -> Self {
        self.options.no_gitignore = no_gitignore;
        self
    }

    pub fn work_dir(mut self, work_dir: Option<PathBuf>) -> Self {
        self.options.work_dir = work_dir;
        self
    }

    pub fn build(self) -> DocGenerateOptions {
        self.options
    }
}
