use crate::application::dto::OutlineOptions;
use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::{Document, EntityMap, File, Package};
use crate::shared::Result;

const BRANCH: &str = "├ ";
const LAST_BRANCH: &str = "└ ";
const INDENT: &str = "│  ";
const LAST_INDENT: &str = "   ";

/// A tree node, files before packages like the tag-value output
enum Node<'a> {
    File(&'a File),
    Package(&'a Package),
}

fn child_nodes<'a>(
    files: &'a EntityMap<File>,
    packages: &'a EntityMap<Package>,
) -> Vec<Node<'a>> {
    files
        .iter()
        .map(Node::File)
        .chain(packages.iter().map(Node::Package))
        .collect()
}

/// OutlineFormatter adapter drawing the package and file tree of a document
///
/// ```text
/// 📂 SPDX Document app-bom
///  ├ DESCRIBES FILE notes.txt
///  └ DESCRIBES PACKAGE app@1.0
///     ├ CONTAINS FILE LICENSE
///     └ CONTAINS PACKAGE 4f1c2a...
/// ```
pub struct OutlineFormatter {
    options: OutlineOptions,
}

impl OutlineFormatter {
    pub fn new(options: OutlineOptions) -> Self {
        Self { options }
    }

    fn package_label(&self, package: &Package) -> String {
        if self.options.spdx_ids {
            package.id.clone()
        } else if package.version.is_empty() {
            package.name.clone()
        } else {
            format!("{}@{}", package.name, package.version)
        }
    }

    fn file_label<'a>(&self, file: &'a File) -> &'a str {
        if self.options.spdx_ids {
            &file.id
        } else {
            &file.name
        }
    }

    fn draw(
        &self,
        output: &mut String,
        nodes: Vec<Node<'_>>,
        relationship: &str,
        prefix: &str,
        level: usize,
    ) {
        if self.options.depth.is_some_and(|depth| level > depth) {
            return;
        }

        let count = nodes.len();
        for (idx, node) in nodes.into_iter().enumerate() {
            let (branch, indent) = if idx + 1 == count {
                (LAST_BRANCH, LAST_INDENT)
            } else {
                (BRANCH, INDENT)
            };

            match node {
                Node::File(file) => output.push_str(&format!(
                    "{}{}{} FILE {}\n",
                    prefix,
                    branch,
                    relationship,
                    self.file_label(file)
                )),
                Node::Package(package) => {
                    output.push_str(&format!(
                        "{}{}{} PACKAGE {}\n",
                        prefix,
                        branch,
                        relationship,
                        self.package_label(package)
                    ));
                    self.draw(
                        output,
                        child_nodes(package.files(), package.packages()),
                        "CONTAINS",
                        &format!("{}{}", prefix, indent),
                        level + 1,
                    );
                }
            }
        }
    }
}

impl SbomFormatter for OutlineFormatter {
    fn format(&self, document: &Document) -> Result<String> {
        let title = if self.options.spdx_ids {
            &document.id
        } else {
            &document.name
        };
        let mut output = format!("📂 SPDX Document {}\n", title);

        self.draw(
            &mut output,
            child_nodes(document.files(), document.packages()),
            "DESCRIBES",
            " ",
            1,
        );
        Ok(output)
    }
}
