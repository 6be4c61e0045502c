use crate::shared::error::SbomError;
use crate::shared::Result;
use sha1::{Digest, Sha1};

/// Identifier of the document itself
pub const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";

pub const PACKAGE_ID_PREFIX: &str = "SPDXRef-Package-";
pub const FILE_ID_PREFIX: &str = "SPDXRef-File-";

/// Placeholder for fields whose value was not determined
pub const NOASSERTION: &str = "NOASSERTION";
pub const NONE: &str = "NONE";

/// Derives a package identifier from a package name.
///
/// Every character outside `[A-Za-z0-9-]` is dropped and the remainder is
/// prefixed with `SPDXRef-Package-`.
///
/// # Errors
/// Returns a validation error when nothing of the name survives.
pub fn package_id_from_name(name: &str) -> Result<String> {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    if sanitized.is_empty() {
        return Err(SbomError::validation(format!(
            "unable to derive a package identifier from name '{}'",
            name
        ))
        .into());
    }

    Ok(format!("{}{}", PACKAGE_ID_PREFIX, sanitized))
}

/// Derives a file identifier from the containing element's name and the file name.
///
/// The identifier is the hex SHA1 of `"<container>:<file>"`, so the same file
/// name yields different identifiers under different packages.
pub fn file_id_for(container_name: &str, file_name: &str) -> Result<String> {
    if file_name.is_empty() {
        return Err(SbomError::validation(
            "unable to derive a file identifier: file has no name",
        )
        .into());
    }
    if container_name.is_empty() {
        return Err(SbomError::validation(format!(
            "unable to derive an identifier for file '{}': containing element has no name",
            file_name
        ))
        .into());
    }

    let digest = Sha1::digest(format!("{}:{}", container_name, file_name).as_bytes());
    Ok(format!("{}{}", FILE_ID_PREFIX, hex::encode(digest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_id_keeps_alphanumerics_and_hyphens() {
        assert_eq!(
            package_id_from_name("nginx").unwrap(),
            "SPDXRef-Package-nginx"
        );
        assert_eq!(
            package_id_from_name("k8s.gcr.io/kube-apiserver-amd64:v1.22.0").unwrap(),
            "SPDXRef-Package-k8sgcriokube-apiserver-amd64v1220"
        );
        assert_eq!(
            package_id_from_name("github.com/pkg/errors").unwrap(),
            "SPDXRef-Package-githubcompkgerrors"
        );
    }

    #[test]
    fn test_package_id_rejects_names_without_valid_characters() {
        let err = package_id_from_name("./:_").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SbomError>(),
            Some(SbomError::Validation { .. })
        ));
        assert!(package_id_from_name("").is_err());
    }

    #[test]
    fn test_file_id_is_sha1_of_container_and_name() {
        let id = file_id_for("doc", "README.md").unwrap();
        let expected = hex::encode(Sha1::digest(b"doc:README.md"));
        assert_eq!(id, format!("SPDXRef-File-{}", expected));
        assert_eq!(id.len(), FILE_ID_PREFIX.len() + 40);
    }

    #[test]
    fn test_file_id_depends_on_container() {
        let a = file_id_for("package-a", "LICENSE").unwrap();
        let b = file_id_for("package-b", "LICENSE").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_file_id_requires_names() {
        assert!(file_id_for("", "LICENSE").is_err());
        assert!(file_id_for("doc", "").is_err());
    }
}
