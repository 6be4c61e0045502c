use crate::ports::outbound::DocumentReader;
use crate::sbom_generation::domain::identifiers::{NOASSERTION, NONE};
use crate::sbom_generation::domain::{Checksums, Contact, Document, File, Package};
use crate::shared::error::SbomError;
use crate::shared::security::{validate_file_size, validate_regular_file};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Maximum size of a document read into memory
const MAX_DOCUMENT_SIZE: u64 = 100 * 1024 * 1024;

const TEXT_OPEN: &str = "<text>";
const TEXT_CLOSE: &str = "</text>";

/// A package or file read from the document, not yet placed in the tree
enum Element {
    Package(Package),
    File(File),
}

/// `Relationship: <from> <kind> <to>`
struct Relationship {
    from: String,
    kind: String,
    to: String,
}

/// Everything read from the document body, in document order
#[derive(Default)]
struct Elements {
    slots: Vec<Option<Element>>,
    index: HashMap<String, usize>,
    relationships: Vec<Relationship>,
}

impl Elements {
    fn push(&mut self, element: Element) -> usize {
        self.slots.push(Some(element));
        self.slots.len() - 1
    }

    /// Records the identifier of the element at `slot`
    fn set_id(&mut self, slot: usize, id: String, source: &Path) -> Result<()> {
        if self.index.contains_key(&id) {
            return Err(SbomError::DuplicateIdentifier {
                id,
                container: format!("document {}", source.display()),
            }
            .into());
        }
        match self.slots.get_mut(slot) {
            Some(Some(Element::Package(package))) => package.id = id.clone(),
            Some(Some(Element::File(file))) => file.id = id.clone(),
            _ => return Ok(()),
        }
        self.index.insert(id, slot);
        Ok(())
    }

    /// Removes the element at `slot` along with everything it contains
    fn take_subtree(
        &mut self,
        slot: usize,
        children: &HashMap<String, Vec<usize>>,
    ) -> Result<Option<Element>> {
        let Some(mut element) = self.slots.get_mut(slot).and_then(Option::take) else {
            return Ok(None);
        };

        if let Element::Package(package) = &mut element {
            for &child in children.get(&package.id).into_iter().flatten() {
                match self.take_subtree(child, children)? {
                    Some(Element::Package(sub)) => package.add_package(sub)?,
                    Some(Element::File(file)) => package.add_file(file)?,
                    None => {}
                }
            }
        }

        Ok(Some(element))
    }
}

/// SpdxTagValueParser adapter reading SPDX 2.2 tag-value documents
///
/// The package and file tree is rebuilt from `DESCRIBES` and `CONTAINS`
/// relationships. Elements no relationship reaches are attached to the
/// document. Other relationship types are ignored, as are unknown tags.
/// Placeholders written for empty fields (`NOASSERTION`, and `NONE` for
/// download locations) read back as empty.
pub struct SpdxTagValueParser;

impl SpdxTagValueParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a tag-value document
    ///
    /// # Arguments
    /// * `text` - The document
    /// * `source` - Where the text came from, used in error messages
    pub fn parse(&self, text: &str, source: &Path) -> Result<Document> {
        let mut doc = Document::new();
        let mut elements = Elements::default();
        let mut current: Option<usize> = None;
        let mut lines = text.lines().enumerate();

        while let Some((idx, line)) = lines.next() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (tag, value) = line.split_once(':').ok_or_else(|| {
                parse_error(source, line_no, format!("expected 'Tag: value', found '{}'", line))
            })?;
            let tag = tag.trim();
            let mut value = value.trim().to_string();

            if value.starts_with(TEXT_OPEN) && !value.contains(TEXT_CLOSE) {
                loop {
                    let Some((_, next)) = lines.next() else {
                        return Err(parse_error(source, line_no, "unterminated <text> block"));
                    };
                    value.push('\n');
                    value.push_str(next);
                    if next.contains(TEXT_CLOSE) {
                        break;
                    }
                }
            }

            let applied = match tag {
                "PackageName" => {
                    current = Some(elements.push(Element::Package(Package::new(value))));
                    Ok(())
                }
                "FileName" => {
                    current = Some(elements.push(Element::File(File::new(value))));
                    Ok(())
                }
                "Relationship" => {
                    parse_relationship(&value).map(|r| elements.relationships.push(r))
                }
                "SPDXID" => match current {
                    Some(slot) => {
                        elements.set_id(slot, value, source)?;
                        Ok(())
                    }
                    None => {
                        doc.id = value;
                        Ok(())
                    }
                },
                _ => match current.and_then(|slot| elements.slots.get_mut(slot)) {
                    Some(Some(Element::Package(package))) => apply_package_tag(package, tag, value),
                    Some(Some(Element::File(file))) => apply_file_tag(file, tag, value),
                    _ => apply_header_tag(&mut doc, tag, value),
                },
            };
            applied.map_err(|details| parse_error(source, line_no, details))?;
        }

        Self::assemble(&mut doc, elements)?;
        Ok(doc)
    }

    /// Nests the parsed elements and attaches the roots to the document
    fn assemble(doc: &mut Document, mut elements: Elements) -> Result<()> {
        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        let mut roots: Vec<usize> = Vec::new();
        let mut placed = vec![false; elements.slots.len()];

        for relationship in &elements.relationships {
            let Some(&to) = elements.index.get(&relationship.to) else {
                continue;
            };
            match relationship.kind.as_str() {
                "DESCRIBES" if relationship.from == doc.id => roots.push(to),
                "CONTAINS" if elements.index.contains_key(&relationship.from) => children
                    .entry(relationship.from.clone())
                    .or_default()
                    .push(to),
                _ => continue,
            }
            placed[to] = true;
        }
        roots.extend((0..placed.len()).filter(|&slot| !placed[slot]));

        // Elements only reachable through a containment cycle come last
        roots.extend(0..elements.slots.len());

        for slot in roots {
            match elements.take_subtree(slot, &children)? {
                Some(Element::Package(package)) => doc.add_package(package)?,
                Some(Element::File(file)) => doc.add_file(file)?,
                None => {}
            }
        }
        Ok(())
    }
}

impl Default for SpdxTagValueParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentReader for SpdxTagValueParser {
    fn read_document(&self, path: &Path) -> Result<Document> {
        validate_regular_file(path, "SPDX document")?;
        let size = fs::metadata(path)?.len();
        validate_file_size(size, path, MAX_DOCUMENT_SIZE)?;

        let text = fs::read_to_string(path).map_err(|e| SbomError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        self.parse(&text, path)
    }
}

fn parse_error(source: &Path, line: usize, details: impl Into<String>) -> anyhow::Error {
    SbomError::Parse {
        path: source.to_path_buf(),
        line,
        details: details.into(),
    }
    .into()
}

type TagResult = std::result::Result<(), String>;

fn apply_header_tag(doc: &mut Document, tag: &str, value: String) -> TagResult {
    match tag {
        "SPDXVersion" => doc.version = value,
        "DataLicense" => doc.data_license = value,
        "DocumentName" => doc.name = value,
        "DocumentNamespace" => doc.namespace = value,
        "Creator" => match value.split_once(':') {
            Some(("Person", person)) => doc.creator.person = person.trim().to_string(),
            Some(("Tool", tool)) => doc.creator.tools.push(tool.trim().to_string()),
            _ => {}
        },
        "Created" => {
            doc.created = DateTime::parse_from_rfc3339(&value)
                .map_err(|e| format!("invalid Created timestamp '{}': {}", value, e))?
                .with_timezone(&Utc);
        }
        _ => {}
    }
    Ok(())
}

fn apply_package_tag(package: &mut Package, tag: &str, value: String) -> TagResult {
    match tag {
        "PackageChecksum" => add_checksum(&mut package.checksum, &value)?,
        "PackageDownloadLocation" => package.download_location = unless_placeholder(value, NONE),
        "FilesAnalyzed" => {
            package.files_analyzed = value
                .parse()
                .map_err(|_| format!("FilesAnalyzed must be true or false, found '{}'", value))?;
        }
        "PackageLicenseConcluded" => {
            package.license_concluded = unless_placeholder(value, NOASSERTION)
        }
        "PackageLicenseDeclared" => {
            package.license_declared = unless_placeholder(value, NOASSERTION)
        }
        "PackageLicenseInfoFromFiles" => package.license_info_from_files = value,
        "PackageLicenseComments" => package.license_comments = unwrap_text(value),
        "PackageCopyrightText" => {
            package.copyright_text = unwrap_text(unless_placeholder(value, NOASSERTION))
        }
        "PackageVersion" => package.version = value,
        "PackageFileName" => package.file_name = value,
        "PackageSupplier" => package.supplier = parse_contact(&value),
        "PackageOriginator" => package.originator = parse_contact(&value),
        // Derived from the files when rendering
        "PackageVerificationCode" => {}
        _ => {}
    }
    Ok(())
}

fn apply_file_tag(file: &mut File, tag: &str, value: String) -> TagResult {
    match tag {
        "FileChecksum" => add_checksum(&mut file.checksum, &value)?,
        "LicenseConcluded" => file.license_concluded = unless_placeholder(value, NOASSERTION),
        "LicenseInfoInFile" => file.license_info_in_file = unless_placeholder(value, NOASSERTION),
        "FileCopyrightText" => {
            file.copyright_text = unwrap_text(unless_placeholder(value, NOASSERTION))
        }
        _ => {}
    }
    Ok(())
}

fn parse_relationship(value: &str) -> std::result::Result<Relationship, String> {
    match value.split_whitespace().collect::<Vec<_>>().as_slice() {
        [from, kind, to] => Ok(Relationship {
            from: from.to_string(),
            kind: kind.to_string(),
            to: to.to_string(),
        }),
        _ => Err(format!("expected '<id> <type> <id>' relationship, found '{}'", value)),
    }
}

/// `SHA256: <hex>`
fn add_checksum(checksums: &mut Checksums, value: &str) -> TagResult {
    let (algorithm, digest) = value
        .split_once(':')
        .ok_or_else(|| format!("expected 'ALGORITHM: digest' checksum, found '{}'", value))?;
    checksums.insert(algorithm.trim().to_string(), digest.trim().to_string());
    Ok(())
}

fn parse_contact(value: &str) -> Contact {
    let mut contact = Contact::default();
    match value.split_once(':') {
        Some(("Person", person)) => contact.person = person.trim().to_string(),
        Some(("Organization", organization)) => {
            contact.organization = organization.trim().to_string()
        }
        _ => {}
    }
    contact
}

fn unless_placeholder(value: String, placeholder: &str) -> String {
    if value == placeholder {
        String::new()
    } else {
        value
    }
}

fn unwrap_text(value: String) -> String {
    match value
        .strip_prefix(TEXT_OPEN)
        .and_then(|inner| inner.strip_suffix(TEXT_CLOSE))
    {
        Some(inner) => inner.to_string(),
        None => value,
    }
}
