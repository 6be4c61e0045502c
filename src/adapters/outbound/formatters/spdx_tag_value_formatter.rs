use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::document::DATA_LICENSE;
use crate::sbom_generation::domain::identifiers::{NOASSERTION, NONE};
use crate::sbom_generation::domain::{Document, File, Package};
use crate::sbom_generation::services::VerificationCodeCalculator;
use crate::shared::Result;
use anyhow::Context;

/// Timestamp layout of the `Created` header field
const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Banner opening the list of files that belong to no package
const FILES_BANNER: &str = "##### Files independent of packages\n\n";

/// SpdxTagValueFormatter adapter for the SPDX 2.2 tag-value format
///
/// Rendering never modifies the document. Package verification codes are
/// computed on the fly, which is the only step that can fail.
pub struct SpdxTagValueFormatter;

impl SpdxTagValueFormatter {
    pub fn new() -> Self {
        Self
    }

    fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
        if value.is_empty() {
            placeholder
        } else {
            value
        }
    }

    fn text_or_noassertion(value: &str) -> String {
        if value.is_empty() {
            NOASSERTION.to_string()
        } else {
            format!("<text>{}</text>", value)
        }
    }

    fn push_field(output: &mut String, tag: &str, value: &str) {
        output.push_str(&format!("{}: {}\n", tag, value));
    }

    fn push_optional_field(output: &mut String, tag: &str, value: &str) {
        if !value.is_empty() {
            Self::push_field(output, tag, value);
        }
    }
}

impl Default for SpdxTagValueFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper methods for rendering sections
impl SpdxTagValueFormatter {
    /// Renders the document header, skipping empty fields
    fn render_header(&self, output: &mut String, doc: &Document) {
        Self::push_optional_field(output, "SPDXVersion", &doc.version);
        Self::push_field(
            output,
            "DataLicense",
            Self::or_placeholder(&doc.data_license, DATA_LICENSE),
        );
        Self::push_optional_field(output, "SPDXID", &doc.id);
        Self::push_optional_field(output, "DocumentName", &doc.name);
        Self::push_optional_field(output, "DocumentNamespace", &doc.namespace);
        if !doc.creator.person.is_empty() {
            Self::push_field(output, "Creator", &format!("Person: {}", doc.creator.person));
        }
        for tool in &doc.creator.tools {
            Self::push_field(output, "Creator", &format!("Tool: {}", tool));
        }
        Self::push_field(
            output,
            "Created",
            &doc.created.format(CREATED_FORMAT).to_string(),
        );
        output.push('\n');
    }

    /// Renders one file block followed by a blank line
    fn render_file(&self, output: &mut String, file: &File) {
        Self::push_optional_field(output, "FileName", &file.name);
        Self::push_optional_field(output, "SPDXID", &file.id);
        for (algorithm, digest) in &file.checksum {
            Self::push_field(output, "FileChecksum", &format!("{}: {}", algorithm, digest));
        }
        Self::push_field(
            output,
            "LicenseConcluded",
            Self::or_placeholder(&file.license_concluded, NOASSERTION),
        );
        Self::push_field(
            output,
            "LicenseInfoInFile",
            Self::or_placeholder(&file.license_info_in_file, NOASSERTION),
        );
        Self::push_field(
            output,
            "FileCopyrightText",
            &Self::text_or_noassertion(&file.copyright_text),
        );
        output.push('\n');
    }

    /// Renders a package, its files and its sub-packages depth-first
    fn render_package(&self, output: &mut String, pkg: &Package) -> Result<()> {
        let verification_code = VerificationCodeCalculator::compute(pkg)
            .with_context(|| format!("rendering package {}", pkg.name))?;

        output.push_str(&format!("##### Package: {}\n\n", pkg.name));
        Self::push_optional_field(output, "PackageName", &pkg.name);
        Self::push_optional_field(output, "SPDXID", &pkg.id);
        for (algorithm, digest) in &pkg.checksum {
            Self::push_field(
                output,
                "PackageChecksum",
                &format!("{}: {}", algorithm, digest),
            );
        }
        Self::push_field(
            output,
            "PackageDownloadLocation",
            Self::or_placeholder(&pkg.download_location, NONE),
        );
        Self::push_field(output, "FilesAnalyzed", &pkg.files_analyzed.to_string());
        if let Some(code) = verification_code {
            Self::push_field(output, "PackageVerificationCode", &code);
        }
        Self::push_field(
            output,
            "PackageLicenseConcluded",
            Self::or_placeholder(&pkg.license_concluded, NOASSERTION),
        );
        Self::push_optional_field(output, "PackageFileName", &pkg.file_name);
        Self::push_optional_field(
            output,
            "PackageLicenseInfoFromFiles",
            &pkg.license_info_from_files,
        );
        Self::push_optional_field(output, "PackageVersion", &pkg.version);
        if let Some(supplier) = pkg.supplier.to_spdx_value() {
            Self::push_field(output, "PackageSupplier", &supplier);
        }
        if let Some(originator) = pkg.originator.to_spdx_value() {
            Self::push_field(output, "PackageOriginator", &originator);
        }
        Self::push_field(
            output,
            "PackageLicenseDeclared",
            Self::or_placeholder(&pkg.license_declared, NOASSERTION),
        );
        if !pkg.license_comments.is_empty() {
            Self::push_field(
                output,
                "PackageLicenseComments",
                &format!("<text>{}</text>", pkg.license_comments),
            );
        }
        Self::push_field(
            output,
            "PackageCopyrightText",
            &Self::text_or_noassertion(&pkg.copyright_text),
        );
        output.push('\n');

        for file in pkg.files() {
            self.render_file(output, file);
            output.push_str(&format!("Relationship: {} CONTAINS {}\n\n", pkg.id, file.id));
        }

        for sub in pkg.packages() {
            self.render_package(output, sub)?;
            output.push_str(&format!("Relationship: {} CONTAINS {}\n\n", pkg.id, sub.id));
        }

        Ok(())
    }
}

impl SbomFormatter for SpdxTagValueFormatter {
    fn format(&self, document: &Document) -> Result<String> {
        let mut output = String::new();

        self.render_header(&mut output, document);

        if !document.files().is_empty() {
            output.push_str(FILES_BANNER);
            for file in document.files() {
                self.render_file(&mut output, file);
            }
            for file in document.files() {
                output.push_str(&format!(
                    "Relationship: {} DESCRIBES {}\n\n",
                    document.id, file.id
                ));
            }
        }

        for pkg in document.packages() {
            self.render_package(&mut output, pkg)?;
            output.push_str(&format!(
                "Relationship: {} DESCRIBES {}\n\n",
                document.id, pkg.id
            ));
        }

        Ok(output)
    }
}
