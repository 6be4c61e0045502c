use crate::ports::outbound::{LicenseClassifier, LicenseScan};
use crate::sbom_generation::domain::ClassifyResult;
use crate::shared::error::SbomError;
use crate::shared::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// License texts larger than this are not classified
const MAX_LICENSE_FILE_SIZE: u64 = 1024 * 1024;

static LICENSE_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(un)?(licen[cs]e|copying)([._-].*)?$").expect("license file pattern is valid")
});

/// A license recognized by key phrases in its normalized text
struct LicenseRule {
    id: &'static str,
    all_of: &'static [&'static str],
    none_of: &'static [&'static str],
}

/// Checked in order; the first matching rule wins
const LICENSE_RULES: &[LicenseRule] = &[
    LicenseRule {
        id: "Apache-2.0",
        all_of: &["apache license", "version 2.0"],
        none_of: &[],
    },
    LicenseRule {
        id: "MPL-2.0",
        all_of: &["mozilla public license version 2.0"],
        none_of: &[],
    },
    LicenseRule {
        id: "LGPL-3.0",
        all_of: &["gnu lesser general public license version 3"],
        none_of: &[],
    },
    LicenseRule {
        id: "LGPL-2.1",
        all_of: &["gnu lesser general public license version 2.1"],
        none_of: &[],
    },
    LicenseRule {
        id: "GPL-3.0",
        all_of: &["gnu general public license version 3"],
        none_of: &[],
    },
    LicenseRule {
        id: "GPL-2.0",
        all_of: &["gnu general public license version 2"],
        none_of: &[],
    },
    LicenseRule {
        id: "ISC",
        all_of: &["permission to use copy modify and or distribute this software for any purpose"],
        none_of: &[],
    },
    LicenseRule {
        id: "MIT",
        all_of: &["permission is hereby granted free of charge"],
        none_of: &[],
    },
    LicenseRule {
        id: "BSD-3-Clause",
        all_of: &["redistribution and use in source and binary forms", "neither the name"],
        none_of: &[],
    },
    LicenseRule {
        id: "BSD-2-Clause",
        all_of: &["redistribution and use in source and binary forms"],
        none_of: &["neither the name"],
    },
    LicenseRule {
        id: "Unlicense",
        all_of: &["free and unencumbered software released into the public domain"],
        none_of: &[],
    },
    LicenseRule {
        id: "CC0-1.0",
        all_of: &["cc0 1.0 universal"],
        none_of: &[],
    },
];

/// TextLicenseClassifier adapter matching license files by key phrases
///
/// Candidate files are found by name (`LICENSE`, `COPYING`, `LICENCE.md`, ...).
/// Their text is lowercased and reduced to words before matching, so line
/// wrapping and punctuation do not matter. Results closest to the scanned
/// root come first.
pub struct TextLicenseClassifier;

impl TextLicenseClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Lowercases and keeps only words, single-spaced
    fn normalize(text: &str) -> String {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '.'))
            .map(|word| word.trim_matches('.'))
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns the SPDX identifier of a license text, if recognized
    pub fn classify_text(text: &str) -> Option<&'static str> {
        let normalized = Self::normalize(text);
        LICENSE_RULES
            .iter()
            .find(|rule| {
                rule.all_of.iter().all(|p| normalized.contains(p))
                    && !rule.none_of.iter().any(|p| normalized.contains(p))
            })
            .map(|rule| rule.id)
    }

    fn is_license_file_name(path: &Path) -> bool {
        path.file_name()
            .map(|name| LICENSE_FILE_NAME.is_match(&name.to_string_lossy()))
            .unwrap_or(false)
    }

    /// Candidate license files below `dir`, shallowest first
    fn candidates(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut found: Vec<(usize, PathBuf)> = Vec::new();
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || e.file_name() != ".git");

        for entry in walker {
            let entry = entry.map_err(|e| SbomError::FileReadError {
                path: dir.to_path_buf(),
                details: format!("walking tree for license files: {}", e),
            })?;
            if entry.file_type().is_file() && Self::is_license_file_name(entry.path()) {
                found.push((entry.depth(), entry.into_path()));
            }
        }

        found.sort();
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }
}

impl Default for TextLicenseClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LicenseClassifier for TextLicenseClassifier {
    fn read_licenses(&self, dir: &Path) -> Result<LicenseScan> {
        let mut licenses = Vec::new();
        let mut unknown = Vec::new();

        for path in Self::candidates(dir)? {
            let too_large = fs::metadata(&path)
                .map(|m| m.len() > MAX_LICENSE_FILE_SIZE)
                .unwrap_or(true);
            if too_large {
                unknown.push(path);
                continue;
            }

            let text = match fs::read(&path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(_) => {
                    unknown.push(path);
                    continue;
                }
            };

            match Self::classify_text(&text) {
                Some(id) => licenses.push(ClassifyResult::new(path, id)),
                None => unknown.push(path),
            }
        }

        Ok((licenses, unknown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MIT_TEXT: &str = "MIT License

Copyright (c) 2020 Example

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction.
";

    const APACHE_TEXT: &str = "
                                 Apache License
                           Version 2.0, January 2004
                        http://www.apache.org/licenses/
";

    const BSD3_TEXT: &str = "Redistribution and use in source and binary forms, with or without
modification, are permitted provided that the following conditions are met:
   * Neither the name of Google Inc. nor the names of its
contributors may be used to endorse or promote products derived from
this software without specific prior written permission.
";

    const BSD2_TEXT: &str = "Redistribution and use in source and binary forms, with or without
modification, are permitted provided that the following conditions are met:
1. Redistributions of source code must retain the above copyright notice.
";

    #[test]
    fn test_classify_common_licenses() {
        assert_eq!(TextLicenseClassifier::classify_text(MIT_TEXT), Some("MIT"));
        assert_eq!(
            TextLicenseClassifier::classify_text(APACHE_TEXT),
            Some("Apache-2.0")
        );
        assert_eq!(
            TextLicenseClassifier::classify_text(BSD3_TEXT),
            Some("BSD-3-Clause")
        );
        assert_eq!(
            TextLicenseClassifier::classify_text(BSD2_TEXT),
            Some("BSD-2-Clause")
        );
    }

    #[test]
    fn test_classify_gpl_family() {
        assert_eq!(
            TextLicenseClassifier::classify_text(
                "GNU LESSER GENERAL PUBLIC LICENSE\n Version 3, 29 June 2007"
            ),
            Some("LGPL-3.0")
        );
        assert_eq!(
            TextLicenseClassifier::classify_text(
                "GNU GENERAL PUBLIC LICENSE\nVersion 3, 29 June 2007\n... use the GNU Lesser General Public License instead"
            ),
            Some("GPL-3.0")
        );
        assert_eq!(
            TextLicenseClassifier::classify_text(
                "GNU GENERAL PUBLIC LICENSE\n Version 2, June 1991"
            ),
            Some("GPL-2.0")
        );
    }

    #[test]
    fn test_classify_unknown_text() {
        assert_eq!(
            TextLicenseClassifier::classify_text("All rights reserved."),
            None
        );
    }

    #[test]
    fn test_license_file_names() {
        for name in [
            "LICENSE",
            "license.md",
            "LICENCE.txt",
            "COPYING",
            "UNLICENSE",
            "LICENSE-MIT",
        ] {
            assert!(
                TextLicenseClassifier::is_license_file_name(Path::new(name)),
                "{} should be a license file",
                name
            );
        }
        for name in ["main.go", "licensed.go", "README.md"] {
            assert!(!TextLicenseClassifier::is_license_file_name(Path::new(name)));
        }
    }

    #[test]
    fn test_read_licenses_orders_by_depth() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("vendor/dep")).unwrap();
        fs::write(dir.path().join("vendor/dep/LICENSE"), MIT_TEXT).unwrap();
        fs::write(dir.path().join("LICENSE"), APACHE_TEXT).unwrap();
        fs::write(dir.path().join("COPYING"), "Proprietary, do not share").unwrap();
        fs::write(dir.path().join("main.go"), "package main").unwrap();

        let (licenses, unknown) = TextLicenseClassifier::new()
            .read_licenses(dir.path())
            .unwrap();

        let ids: Vec<&str> = licenses.iter().map(|l| l.license_id.as_str()).collect();
        assert_eq!(ids, vec!["Apache-2.0", "MIT"]);
        assert_eq!(licenses[0].file, dir.path().join("LICENSE"));
        assert_eq!(unknown, vec![dir.path().join("COPYING")]);
    }

    #[test]
    fn test_read_licenses_empty_tree() {
        let dir = TempDir::new().unwrap();
        let (licenses, unknown) = TextLicenseClassifier::new()
            .read_licenses(dir.path())
            .unwrap();
        assert!(licenses.is_empty());
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_read_licenses_missing_dir_fails() {
        assert!(TextLicenseClassifier::new()
            .read_licenses(Path::new("/nonexistent/module"))
            .is_err());
    }
}
