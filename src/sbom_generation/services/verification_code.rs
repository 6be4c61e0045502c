use crate::sbom_generation::domain::Package;
use crate::shared::error::SbomError;
use crate::shared::Result;
use sha1::{Digest, Sha1};

/// VerificationCodeCalculator derives package verification codes
///
/// The code is the hex SHA1 of the package files' SHA1 digests, sorted as
/// strings and concatenated. It does not depend on the order files were added.
pub struct VerificationCodeCalculator;

impl VerificationCodeCalculator {
    /// Computes the verification code of a package
    ///
    /// # Returns
    /// `None` when the package was not file-analyzed
    ///
    /// # Errors
    /// Returns `SbomError::Render` if the package has no files or any file lacks a SHA1
    pub fn compute(package: &Package) -> Result<Option<String>> {
        if !package.files_analyzed {
            return Ok(None);
        }

        if package.files().is_empty() {
            return Err(SbomError::Render {
                entity: format!("package {}", package.id),
                details: "files were analyzed but the package has no files".to_string(),
            }
            .into());
        }

        let mut digests = Vec::with_capacity(package.files().len());
        for file in package.files() {
            let sha1 = file.sha1().ok_or_else(|| SbomError::Render {
                entity: format!("package {}", package.id),
                details: format!("file {} has no SHA1 checksum", file.name),
            })?;
            digests.push(sha1);
        }
        digests.sort_unstable();

        Ok(Some(Self::code_for(&digests)))
    }

    fn code_for(sorted_digests: &[&str]) -> String {
        let mut hasher = Sha1::new();
        for digest in sorted_digests {
            hasher.update(digest.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
