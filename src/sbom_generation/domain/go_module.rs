use crate::shared::error::SbomError;
use crate::shared::Result;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Matches pseudo-versions such as `v0.0.0-20210101000000-abcdef123456`
static PSEUDO_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v\d+\.\d+\.\d+-[0-9.]+-([a-f0-9]+)$").expect("pseudo-version pattern is valid")
});

const INCOMPATIBLE_SUFFIX: &str = "+incompatible";

/// A `require` entry of a go.mod file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoRequirement {
    pub path: String,
    pub version: String,
    pub indirect: bool,
}

/// The parts of a go.mod file needed to list dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoModFile {
    pub module_path: String,
    pub requirements: Vec<GoRequirement>,
}

#[derive(Clone, Copy, PartialEq)]
enum Block {
    None,
    Require,
    Other,
}

impl GoModFile {
    /// Parses a go.mod file leniently.
    ///
    /// Only `module` and `require` directives are interpreted. Other directives
    /// and blocks are skipped. A trailing `// indirect` comment marks a
    /// requirement as indirect.
    pub fn parse(content: &str) -> Result<Self> {
        let mut modfile = GoModFile::default();
        let mut block = Block::None;

        for (number, raw_line) in content.lines().enumerate() {
            let (code, comment) = match raw_line.find("//") {
                Some(pos) => (&raw_line[..pos], raw_line[pos + 2..].trim()),
                None => (raw_line, ""),
            };
            let code = code.trim();
            if code.is_empty() {
                continue;
            }
            let indirect = comment.split(';').any(|c| c.trim() == "indirect");

            match block {
                Block::Require | Block::Other if code == ")" => {
                    block = Block::None;
                }
                Block::Require => {
                    modfile
                        .requirements
                        .push(Self::parse_requirement(code, indirect, number + 1)?);
                }
                Block::Other => {}
                Block::None => {
                    let (directive, rest) = code
                        .split_once(char::is_whitespace)
                        .map(|(d, r)| (d, r.trim()))
                        .unwrap_or((code, ""));

                    match (directive, rest) {
                        ("module", path) => modfile.module_path = unquote(path).to_string(),
                        ("require", "(") => block = Block::Require,
                        ("require", entry) => modfile
                            .requirements
                            .push(Self::parse_requirement(entry, indirect, number + 1)?),
                        (_, "(") => block = Block::Other,
                        _ => {}
                    }
                }
            }
        }

        Ok(modfile)
    }

    fn parse_requirement(entry: &str, indirect: bool, line: usize) -> Result<GoRequirement> {
        let mut fields = entry.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(path), Some(version)) => Ok(GoRequirement {
                path: unquote(path).to_string(),
                version: unquote(version).to_string(),
                indirect,
            }),
            _ => Err(SbomError::validation(format!(
                "go.mod line {}: malformed require entry '{}'",
                line, entry
            ))
            .into()),
        }
    }

    /// Dependencies as packages, optionally dropping indirect ones
    pub fn packages(&self, only_direct_deps: bool) -> Vec<GoPackage> {
        self.requirements
            .iter()
            .filter(|r| !(only_direct_deps && r.indirect))
            .map(|r| GoPackage::new(&r.path, &r.version))
            .collect()
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

/// Derives the VCS revision to check out for a module version.
///
/// Pseudo-versions resolve to their commit hash. A `+incompatible` suffix is
/// dropped so the remaining tag can be checked out.
pub fn revision_for_version(version: &str) -> String {
    let version = version.strip_suffix(INCOMPATIBLE_SUFFIX).unwrap_or(version);
    match PSEUDO_VERSION.captures(version) {
        Some(caps) => caps[1].to_string(),
        None => version.to_string(),
    }
}

/// A Go module dependency being scanned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoPackage {
    pub import_path: String,
    pub revision: String,
    pub local_dir: Option<PathBuf>,
    pub license_id: String,
}

impl GoPackage {
    pub fn new(import_path: &str, version: &str) -> Self {
        Self {
            import_path: import_path.to_string(),
            revision: version.to_string(),
            local_dir: None,
            license_id: String::new(),
        }
    }

    /// Revision handed to the VCS when cloning
    pub fn checkout_revision(&self) -> String {
        revision_for_version(&self.revision)
    }

    /// Whether a usable local copy already exists
    pub fn is_downloaded(&self) -> bool {
        self.local_dir.as_ref().is_some_and(|dir| dir.is_dir())
    }
}
